use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Files on the local disk, relative to a base directory.
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
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = fs::read(self.locate(path))?;
        Ok(data)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.locate(path);
        let parent = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        // 先寫入同目錄的暫存檔，完成後再原子性地取代目標檔
        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(data)?;
        staged.as_file().sync_all()?;
        staged.persist(&full_path).map_err(|e| e.error)?;
        Ok(())
    }

    fn locate(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}
