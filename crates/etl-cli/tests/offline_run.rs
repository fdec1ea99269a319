//! 오프라인 설정으로 전체 명령 흐름 검증.

use etl_cli::commands::{
    load::load_file,
    run::{run_pipeline, RunConfig},
    transform::{transform_file, write_json},
    Context,
};
use etl_core::AppConfig;

fn offline_context(dir: &std::path::Path) -> Context {
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.join("batches");
    Context::from_config(&config, true).unwrap()
}

#[tokio::test]
async fn test_offline_run_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = offline_context(dir.path());

    let summary = run_pipeline(
        &ctx,
        RunConfig {
            tickers: "AAPL, GOOGL".to_string(),
            period: Some("1mo".to_string()),
            batch_id: Some("offline".to_string()),
            show_progress: false,
        },
    )
    .await
    .unwrap();
    assert!(summary.failures.is_empty());
    assert_eq!(summary.receipt.rows_loaded, 10);

    // 적재된 배치를 파일로 내보낸 뒤 다시 변환하면 내용이 그대로 유지된다
    let stored = ctx.store.retrieve("offline").await.unwrap();
    let export = dir.path().join("export.json");
    write_json(&stored, Some(&export)).unwrap();

    let (again, stats) = transform_file(&export, Some("again".to_string())).unwrap();
    assert_eq!(again.data, stored);
    assert_eq!(stats.duplicates_removed, 0);

    let receipt = load_file(&ctx, &export, Some("again".to_string()))
        .await
        .unwrap();
    assert_eq!(receipt.rows_loaded, 10);
    assert_eq!(
        ctx.store.list().await.unwrap(),
        vec!["again".to_string(), "offline".to_string()]
    );
}
