//! 파일 적재 명령.

use std::path::Path;

use anyhow::{bail, Result};
use etl_core::{resolve_batch_id, StoreReceipt};
use tracing::info;

use super::transform::read_rows;
use super::Context;

/// JSON 파일을 배치로 저장합니다.
pub async fn load_file(
    ctx: &Context,
    input: &Path,
    batch_id: Option<String>,
) -> Result<StoreReceipt> {
    if input.extension().and_then(|e| e.to_str()) != Some("json") {
        bail!("Only .json files are supported.");
    }

    let rows = read_rows(input)?;
    let batch_id = resolve_batch_id(batch_id);
    let receipt = ctx.store.store(&batch_id, &rows).await?;

    info!(
        batch_id = %receipt.batch_id,
        rows = receipt.rows_loaded,
        "Batch loaded from {}",
        input.display()
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use etl_data::{Extractor, FileBatchStore, StaticSource};

    fn context(dir: &Path) -> Context {
        Context::new(
            Extractor::new(Arc::new(StaticSource::new())),
            Arc::new(FileBatchStore::new(dir.join("batches")).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let input = dir.path().join("rows.json");
        std::fs::write(&input, r#"[{"Ticker":"AAPL"},{"Ticker":"MSFT"}]"#).unwrap();

        let receipt = load_file(&ctx, &input, Some("cli-1".to_string()))
            .await
            .unwrap();
        assert_eq!(receipt.batch_id, "cli-1");
        assert_eq!(receipt.rows_loaded, 2);
        assert_eq!(ctx.store.list().await.unwrap(), vec!["cli-1".to_string()]);
    }

    #[tokio::test]
    async fn test_load_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let input = dir.path().join("rows.csv");
        std::fs::write(&input, "[]").unwrap();

        let err = load_file(&ctx, &input, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Only .json files are supported.");
    }
}
