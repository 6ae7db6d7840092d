use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Stores output files under a base directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        Ok(tokio::fs::read(full_path).await?)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested"));

        storage
            .write_file("schedule.json", b"{\"ok\":true}")
            .await
            .unwrap();

        let data = storage.read_file("schedule.json").await.unwrap();
        assert_eq!(data, b"{\"ok\":true}");
        assert!(temp_dir.path().join("nested/schedule.json").exists());
    }

    #[test]
    fn test_second_write_replaces_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        tokio_test::block_on(storage.write_file("schedule.json", b"old")).unwrap();
        tokio_test::block_on(storage.write_file("schedule.json", b"new")).unwrap();

        let data = std::fs::read(temp_dir.path().join("schedule.json")).unwrap();
        assert_eq!(data, b"new");
        assert_eq!(storage.base_path(), temp_dir.path());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = storage.read_file("missing.json").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::EtlError::IoError(_)));
    }
}
