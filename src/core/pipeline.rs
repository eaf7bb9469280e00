use crate::core::{assembler, loader, writer};
use crate::domain::model::{BuildReport, Metadata, SourceData};
use crate::domain::ports::{Clock, ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;

/// Extract = load the three catalogs, transform = resolve and assemble,
/// load = write the master hierarchy.
pub struct HierarchyPipeline<S: Storage, C: ConfigProvider, K: Clock> {
    storage: S,
    config: C,
    clock: K,
}

impl<S: Storage, C: ConfigProvider, K: Clock> HierarchyPipeline<S, C, K> {
    pub fn new(storage: S, config: C, clock: K) -> Self {
        Self {
            storage,
            config,
            clock,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage, C: ConfigProvider, K: Clock> Pipeline for HierarchyPipeline<S, C, K> {
    fn extract(&self) -> Result<SourceData> {
        loader::load_sources(&self.storage, &self.config)
    }

    fn transform(&self, data: SourceData) -> Result<BuildReport> {
        // 時間戳記只在建構開始時取一次
        let metadata = Metadata::new(self.clock.now(), self.config.description());
        Ok(assembler::build_hierarchy(&data, metadata))
    }

    fn load(&self, report: &BuildReport) -> Result<String> {
        writer::write_document(&self.storage, self.config.output_path(), &report.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{MemoryStorage, TestConfig};
    use crate::utils::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn pipeline(storage: MemoryStorage) -> HierarchyPipeline<MemoryStorage, TestConfig, FixedClock> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());
        HierarchyPipeline::new(storage, TestConfig::default(), clock)
    }

    #[test]
    fn test_extract_transform_load() {
        let storage = MemoryStorage::new();
        storage.put_json(
            "categories.json",
            &json!({"categories": {"C1": {"name": "N", "description": "D", "subcategories": {
                "S1": {"name": "SN", "description": "SD", "assembly_refs": ["A1"]}
            }}}}),
        );
        storage.put_json("assemblies.json", &json!({}));
        storage.put_json("parts.json", &json!({}));
        let pipeline = pipeline(storage);

        let data = pipeline.extract().unwrap();
        let report = pipeline.transform(data).unwrap();
        let location = pipeline.load(&report).unwrap();

        assert!(location.ends_with("master_hierarchy.json"));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("A1"));

        let written: Value =
            serde_json::from_slice(&pipeline.storage.get("master_hierarchy.json").unwrap()).unwrap();
        assert_eq!(written["metadata"]["generation_timestamp"], json!("2024-12-31T23:59:59.000000Z"));
        assert_eq!(written["hierarchy"]["C1"]["subcategories"]["S1"]["assemblies"], json!([]));
    }

    #[test]
    fn test_description_comes_from_config() {
        let storage = MemoryStorage::new();
        let mut pipeline = pipeline(storage);
        pipeline.config.description = "Clean station catalog".to_string();

        let report = pipeline.transform(SourceData::default()).unwrap();

        assert_eq!(report.document.metadata.description, "Clean station catalog");
        assert!(report.document.hierarchy.is_empty());
    }
}
