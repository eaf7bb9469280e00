use crate::domain::model::{Record, SourceData};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{HierarchyError, Result, SourceKind};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

/// Reads all three inputs. Any missing or unparseable source aborts the load.
pub fn load_sources<S: Storage, C: ConfigProvider>(storage: &S, config: &C) -> Result<SourceData> {
    let categories_root = read_json(storage, SourceKind::Categories, config.categories_path())?;
    let assemblies = read_json(storage, SourceKind::Assemblies, config.assemblies_path())?;
    let parts = read_json(storage, SourceKind::Parts, config.parts_path())?;

    let categories = categories_container(storage, config.categories_path(), categories_root)?;
    let assemblies = into_catalog(storage, SourceKind::Assemblies, config.assemblies_path(), assemblies)?;
    let parts = into_catalog(storage, SourceKind::Parts, config.parts_path(), parts)?;

    tracing::debug!(
        "Loaded {} categories, {} assemblies, {} parts",
        categories.len(),
        assemblies.len(),
        parts.len()
    );

    Ok(SourceData {
        categories,
        assemblies,
        parts,
    })
}

fn read_json<S: Storage>(storage: &S, kind: SourceKind, path: &Path) -> Result<Value> {
    tracing::debug!("Reading {} from {}", kind, storage.locate(path).display());

    let bytes = match storage.read_file(path) {
        Ok(bytes) => bytes,
        Err(HierarchyError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
            return Err(HierarchyError::SourceNotFound {
                kind,
                path: storage.locate(path),
            });
        }
        Err(e) => return Err(e),
    };

    serde_json::from_slice(&bytes).map_err(|e| HierarchyError::MalformedSource {
        kind,
        path: storage.locate(path),
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}

/// The category file nests its records one level down, under `categories`.
fn categories_container<S: Storage>(storage: &S, path: &Path, root: Value) -> Result<Record> {
    let mut root = match root {
        Value::Object(map) => map,
        other => {
            return Err(HierarchyError::InvalidSourceShape {
                kind: SourceKind::Categories,
                path: storage.locate(path),
                message: format!("expected a JSON object at the top level, found {}", json_type(&other)),
            });
        }
    };

    let found_keys: Vec<String> = root.keys().cloned().collect();
    match root.remove("categories") {
        Some(Value::Object(categories)) => Ok(categories),
        _ => Err(HierarchyError::MissingCategoriesContainer { found_keys }),
    }
}

fn into_catalog<S: Storage>(storage: &S, kind: SourceKind, path: &Path, root: Value) -> Result<Record> {
    match root {
        Value::Object(map) => Ok(map),
        other => Err(HierarchyError::InvalidSourceShape {
            kind,
            path: storage.locate(path),
            message: format!("expected a JSON object keyed by identifier, found {}", json_type(&other)),
        }),
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{MemoryStorage, TestConfig};
    use serde_json::json;

    fn storage_with(categories: Value, assemblies: Value, parts: Value) -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.put_json("categories.json", &categories);
        storage.put_json("assemblies.json", &assemblies);
        storage.put_json("parts.json", &parts);
        storage
    }

    #[test]
    fn test_load_sources_keeps_file_order() {
        let storage = storage_with(
            json!({"categories": {"Z": {"name": "z"}, "A": {"name": "a"}, "M": {"name": "m"}}}),
            json!({"A1": {}}),
            json!({}),
        );

        let data = load_sources(&storage, &TestConfig::default()).unwrap();

        let ids: Vec<&str> = data.categories.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["Z", "A", "M"]);
        assert!(data.assemblies.contains_key("A1"));
        assert!(data.parts.is_empty());
    }

    #[test]
    fn test_missing_assemblies_source_is_fatal() {
        let storage = MemoryStorage::new();
        storage.put_json("categories.json", &json!({"categories": {}}));
        storage.put_json("parts.json", &json!({}));

        let err = load_sources(&storage, &TestConfig::default()).unwrap_err();

        match err {
            HierarchyError::SourceNotFound { kind, path } => {
                assert_eq!(kind, SourceKind::Assemblies);
                assert!(path.ends_with("assemblies.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_parts_source_reports_position() {
        let storage = MemoryStorage::new();
        storage.put_json("categories.json", &json!({"categories": {}}));
        storage.put_json("assemblies.json", &json!({}));
        storage.put_raw("parts.json", b"{\n  \"P1\": {\n");

        let err = load_sources(&storage, &TestConfig::default()).unwrap_err();

        match err {
            HierarchyError::MalformedSource { kind, line, .. } => {
                assert_eq!(kind, SourceKind::Parts);
                assert!(line >= 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_categories_container_lists_found_keys() {
        let storage = storage_with(json!({"version": 2, "cats": {}}), json!({}), json!({}));

        let err = load_sources(&storage, &TestConfig::default()).unwrap_err();

        match err {
            HierarchyError::MissingCategoriesContainer { found_keys } => {
                assert_eq!(found_keys, vec!["version".to_string(), "cats".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_categories_container_of_wrong_type_is_fatal() {
        let storage = storage_with(json!({"categories": ["C1"]}), json!({}), json!({}));

        let err = load_sources(&storage, &TestConfig::default()).unwrap_err();
        assert!(matches!(err, HierarchyError::MissingCategoriesContainer { .. }));
    }

    #[test]
    fn test_catalog_must_be_an_object() {
        let storage = storage_with(json!({"categories": {}}), json!([{"id": "A1"}]), json!({}));

        let err = load_sources(&storage, &TestConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            HierarchyError::InvalidSourceShape {
                kind: SourceKind::Assemblies,
                ..
            }
        ));
    }
}
