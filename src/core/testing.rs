//! In-memory doubles shared by the core unit tests.

use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{HierarchyError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct MemoryStorage {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn put_raw(&self, path: &str, data: &[u8]) {
        self.files
            .borrow_mut()
            .insert(PathBuf::from(path), data.to_vec());
    }

    pub fn put_json(&self, path: &str, value: &serde_json::Value) {
        self.put_raw(path, &serde_json::to_vec(value).unwrap());
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(Path::new(path)).cloned()
    }
}

impl Storage for MemoryStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            HierarchyError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ))
        })
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(HierarchyError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only storage",
            )));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn locate(&self, path: &Path) -> PathBuf {
        Path::new("memory").join(path)
    }
}

pub struct TestConfig {
    pub categories: PathBuf,
    pub assemblies: PathBuf,
    pub parts: PathBuf,
    pub output: PathBuf,
    pub description: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            categories: PathBuf::from("categories.json"),
            assemblies: PathBuf::from("assemblies.json"),
            parts: PathBuf::from("parts.json"),
            output: PathBuf::from("master_hierarchy.json"),
            description: crate::domain::model::DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl ConfigProvider for TestConfig {
    fn categories_path(&self) -> &Path {
        &self.categories
    }

    fn assemblies_path(&self) -> &Path {
        &self.assemblies
    }

    fn parts_path(&self) -> &Path {
        &self.parts
    }

    fn output_path(&self) -> &Path {
        &self.output
    }

    fn description(&self) -> &str {
        &self.description
    }
}
