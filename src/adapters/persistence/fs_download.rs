//! Implements DownloadPort. Writes exported payloads into a directory as `<name>.csv`.

use crate::domain::DomainError;
use crate::ports::DownloadPort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// File-system download target.
pub struct FsDownload {
    base_dir: PathBuf,
}

impl FsDownload {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, suggested_name: &str) -> PathBuf {
        // Path separators in poll titles would escape the export directory.
        let name: String = suggested_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.base_dir.join(format!("{}.csv", name))
    }
}

#[async_trait::async_trait]
impl DownloadPort for FsDownload {
    async fn save(&self, payload: &str, suggested_name: &str) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DomainError::Export(format!("Failed to create export dir: {}", e)))?;
        let path = self.file_path(suggested_name);
        fs::write(&path, payload)
            .await
            .map_err(|e| DomainError::Export(format!("Failed to write export: {}", e)))?;
        info!(path = %path.display(), bytes = payload.len(), "export written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let download = FsDownload::new(dir.path().join("exports"));

        let path = download
            .save("1 participant\r\nAda", "Lunch/Dinner-202401011200")
            .await
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "Lunch_Dinner-202401011200.csv");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "1 participant\r\nAda"
        );
    }
}
