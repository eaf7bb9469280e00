use crate::domain::model::{BuildReport, SourceData};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Replaces `path` with `data` only once all of `data` has been written.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    /// Where `path` actually lives, for diagnostics.
    fn locate(&self, path: &Path) -> PathBuf;
}

pub trait ConfigProvider {
    fn categories_path(&self) -> &Path;
    fn assemblies_path(&self) -> &Path;
    fn parts_path(&self) -> &Path;
    fn output_path(&self) -> &Path;
    fn description(&self) -> &str;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<SourceData>;
    fn transform(&self, data: SourceData) -> Result<BuildReport>;
    fn load(&self, report: &BuildReport) -> Result<String>;
}
