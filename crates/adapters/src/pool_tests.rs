use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn prepare_for_run_removes_stale_autoinst_log_and_creates_worker_log() {
    let dir = tempdir().unwrap();
    let pool = PoolDirectory::new(dir.path());
    tokio::fs::write(dir.path().join("autoinst-log.txt"), b"stale").await.unwrap();

    pool.prepare_for_run().await.unwrap();

    assert!(!dir.path().join("autoinst-log.txt").exists());
    assert!(dir.path().join("worker-log.txt").exists());
}

#[tokio::test]
async fn prepare_for_run_is_fine_with_no_prior_run() {
    let dir = tempdir().unwrap();
    let pool = PoolDirectory::new(dir.path());

    pool.prepare_for_run().await.unwrap();

    assert!(dir.path().join("worker-log.txt").exists());
}

#[tokio::test]
async fn test_order_defaults_to_empty_when_absent() {
    let dir = tempdir().unwrap();
    let pool = PoolDirectory::new(dir.path());
    assert_eq!(pool.test_order().await, Vec::<serde_json::Value>::new());
}

#[tokio::test]
async fn test_order_reads_the_seeded_file() {
    let dir = tempdir().unwrap();
    let testresults = dir.path().join("testresults");
    tokio::fs::create_dir_all(&testresults).await.unwrap();
    tokio::fs::write(testresults.join("test_order.json"), br#"[{"name":"boot"}]"#).await.unwrap();

    let pool = PoolDirectory::new(dir.path());
    let order = pool.test_order().await;

    assert_eq!(order, vec![serde_json::json!({ "name": "boot" })]);
}
