use super::*;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    for var in [
        "WJ_WEB_UI_BASE_URL",
        "WJ_WEB_UI_WS_URL",
        "WJ_WORKER_INSTANCE",
        "WJ_POOL_DIR",
        "WJ_ISOTOVIDEO_POLL_MS",
        "WJ_LIVELOG_FRAME_MS",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_are_used_when_no_file_or_env_is_present() {
    clear_env();
    let settings = Settings::from_file_and_env(None).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
#[serial]
fn file_values_are_loaded() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"web_ui_base_url = "http://openqa.example""#).unwrap();
    writeln!(file, "worker_instance = 3").unwrap();
    let settings = Settings::from_file_and_env(Some(file.path())).unwrap();
    assert_eq!(settings.web_ui_base_url, "http://openqa.example");
    assert_eq!(settings.worker_instance, 3);
    assert_eq!(settings.pool_dir, Settings::default().pool_dir);
}

#[test]
#[serial]
fn missing_file_path_falls_back_to_defaults() {
    clear_env();
    let settings = Settings::from_file_and_env(Some(Path::new("/nonexistent/wj-worker.toml"))).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
#[serial]
fn env_overrides_take_precedence_over_the_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "worker_instance = 3").unwrap();
    std::env::set_var("WJ_WORKER_INSTANCE", "7");
    std::env::set_var("WJ_ISOTOVIDEO_POLL_MS", "250");

    let settings = Settings::from_file_and_env(Some(file.path())).unwrap();

    assert_eq!(settings.worker_instance, 7);
    assert_eq!(settings.isotovideo_poll_interval(), Duration::from_millis(250));
    clear_env();
}

#[test]
#[serial]
fn malformed_toml_is_a_parse_error() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "this is not valid toml").unwrap();
    let error = Settings::from_file_and_env(Some(file.path())).unwrap_err();
    assert!(matches!(error, SettingsError::Parse { .. }));
}
