use super::*;

#[test]
fn starts_with_no_current_job() {
    let context = WorkerContext::new(Settings::default());
    assert_eq!(context.current_job_id(), None);
}

#[test]
fn current_job_id_round_trips() {
    let context = WorkerContext::new(Settings::default());
    context.set_current_job_id(Some(42));
    assert_eq!(context.current_job_id(), Some(42));
    context.set_current_job_id(None);
    assert_eq!(context.current_job_id(), None);
}

#[test]
fn instance_and_pool_dir_come_from_settings() {
    let settings = Settings { worker_instance: 9, ..Settings::default() };
    let pool_dir = settings.pool_dir.clone();
    let context = WorkerContext::new(settings);
    assert_eq!(context.instance, 9);
    assert_eq!(context.pool.path(), pool_dir);
}
