//! 파일 기반 배치 저장소.
//!
//! 배치마다 `batch_{id}.json` 파일 하나에 들여쓰기된 JSON 배열로 저장합니다.
//! 쓰기는 같은 디렉토리의 임시 파일에 기록한 뒤 rename으로 교체합니다.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use etl_core::{validate_batch_id, Row, StoreReceipt};
use tracing::{debug, info, instrument};

use super::BatchStore;
use crate::error::{DataError, Result};

const FILE_PREFIX: &str = "batch_";
const FILE_SUFFIX: &str = ".json";

/// 파일 기반 배치 저장소.
#[derive(Debug, Clone)]
pub struct FileBatchStore {
    data_dir: PathBuf,
}

impl FileBatchStore {
    /// 저장소를 생성합니다. 디렉토리가 없으면 만듭니다.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            DataError::Io(format!(
                "failed to create data dir {}: {}",
                data_dir.display(),
                e
            ))
        })?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 배치 ID에 대응하는 파일 경로.
    pub fn path_for(&self, batch_id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}{}{}", FILE_PREFIX, batch_id, FILE_SUFFIX))
    }

    fn batch_id_from_file_name(name: &str) -> Option<&str> {
        name.strip_prefix(FILE_PREFIX)?
            .strip_suffix(FILE_SUFFIX)
            .filter(|id| validate_batch_id(id).is_ok())
    }
}

fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

#[async_trait]
impl BatchStore for FileBatchStore {
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn store(&self, batch_id: &str, rows: &[Row]) -> Result<StoreReceipt> {
        validate_batch_id(batch_id)?;

        let contents = serde_json::to_vec_pretty(rows)?;
        let path = self.path_for(batch_id);
        let dir = self.data_dir.clone();
        let target = path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &contents))
            .await
            .map_err(|e| DataError::Internal(format!("store task failed: {}", e)))??;

        info!(batch_id, rows = rows.len(), path = %path.display(), "Batch stored");
        Ok(StoreReceipt {
            batch_id: batch_id.to_string(),
            rows_loaded: rows.len(),
            file_path: path.display().to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(id) = name.to_str().and_then(Self::batch_id_from_file_name) {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        debug!(count = ids.len(), "Batches listed");
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn retrieve(&self, batch_id: &str) -> Result<Vec<Row>> {
        validate_batch_id(batch_id)?;

        let path = self.path_for(batch_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::NotFound(format!("Batch '{}' not found", batch_id)));
            }
            Err(e) => return Err(e.into()),
        };

        let rows: Vec<Row> = serde_json::from_slice(&bytes)?;
        debug!(batch_id, rows = rows.len(), "Batch retrieved");
        Ok(rows)
    }

    async fn health_check(&self) -> Result<()> {
        let meta = tokio::fs::metadata(&self.data_dir).await?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(DataError::Io(format!(
                "{} is not a directory",
                self.data_dir.display()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_mapping() {
        assert_eq!(
            FileBatchStore::batch_id_from_file_name("batch_abc-1.json"),
            Some("abc-1")
        );
        assert_eq!(FileBatchStore::batch_id_from_file_name("notes.json"), None);
        assert_eq!(FileBatchStore::batch_id_from_file_name("batch_x.txt"), None);
        assert_eq!(FileBatchStore::batch_id_from_file_name("batch_.json"), None);
    }

    #[test]
    fn test_path_for() {
        let store = FileBatchStore {
            data_dir: PathBuf::from("/data"),
        };
        assert_eq!(store.path_for("b1"), PathBuf::from("/data/batch_b1.json"));
    }
}
