use crate::domain::model::HierarchyDocument;
use crate::domain::ports::Storage;
use crate::utils::error::{HierarchyError, Result};
use std::path::Path;

/// Serializes the whole document with two-space indentation.
pub fn render(document: &HierarchyDocument) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(document)?)
}

/// The document is fully rendered before the destination is touched, so a
/// failure leaves any previous output in place.
pub fn write_document<S: Storage>(storage: &S, path: &Path, document: &HierarchyDocument) -> Result<String> {
    let data = render(document)?;
    let location = storage.locate(path);

    tracing::debug!("Writing {} bytes to {}", data.len(), location.display());
    storage
        .write_file(path, &data)
        .map_err(|e| HierarchyError::OutputWriteError {
            path: location.clone(),
            message: e.to_string(),
        })?;

    Ok(location.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemoryStorage;
    use crate::domain::model::Metadata;
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;

    fn document() -> HierarchyDocument {
        HierarchyDocument {
            metadata: Metadata::new(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), "test"),
            hierarchy: IndexMap::new(),
        }
    }

    #[test]
    fn test_render_uses_two_space_indent() {
        let text = String::from_utf8(render(&document()).unwrap()).unwrap();

        assert_eq!(
            text,
            "{\n  \"metadata\": {\n    \"generation_timestamp\": \"2025-06-01T00:00:00.000000Z\",\n    \"description\": \"test\"\n  },\n  \"hierarchy\": {}\n}"
        );
    }

    #[test]
    fn test_write_document_returns_location() {
        let storage = MemoryStorage::new();

        let location = write_document(&storage, Path::new("out.json"), &document()).unwrap();

        assert_eq!(location, "memory/out.json");
        assert!(storage.get("out.json").is_some());
    }

    #[test]
    fn test_write_failure_is_reported_as_output_error() {
        let storage = MemoryStorage::failing_writes();
        storage.put_raw("out.json", b"previous build");

        let err = write_document(&storage, Path::new("out.json"), &document()).unwrap_err();

        assert!(matches!(err, HierarchyError::OutputWriteError { .. }));
        assert_eq!(storage.get("out.json"), Some(b"previous build".to_vec()));
    }
}
