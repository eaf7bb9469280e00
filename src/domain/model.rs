use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_DESCRIPTION: &str =
    "Master hierarchy of categories, subcategories, assemblies, and parts.";

/// Sortable UTC timestamp with microseconds and a trailing `Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A raw input record, keyed exactly as in the source file.
pub type Record = Map<String, Value>;

/// The three normalized inputs after loading.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    /// Contents of the `categories` container, in file order.
    pub categories: Record,
    pub assemblies: Record,
    pub parts: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyDocument {
    pub metadata: Metadata,
    pub hierarchy: IndexMap<String, CategoryNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub generation_timestamp: String,
    pub description: String,
}

impl Metadata {
    pub fn new(generated_at: DateTime<Utc>, description: impl Into<String>) -> Self {
        Self {
            generation_timestamp: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub name: Value,
    pub description: Value,
    pub subcategories: IndexMap<String, SubcategoryNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryNode {
    pub name: Value,
    pub description: Value,
    pub assemblies: Vec<AssemblyNode>,
}

/// `can_order` and `is_kit` stay `None` when the catalog omits them and are
/// written as `null`, never as `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyNode {
    pub id: Value,
    pub name: Value,
    #[serde(rename = "type")]
    pub kind: Value,
    pub can_order: Option<Value>,
    pub is_kit: Option<Value>,
    pub status: Value,
    pub components: Vec<ComponentNode>,
}

/// One row of an assembly's bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentNode {
    Resolved(ResolvedComponent),
    Unresolved(UnresolvedComponent),
}

impl ComponentNode {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ComponentNode::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedComponent {
    pub part_id: Value,
    pub name: Value,
    pub manufacturer_part_number: Value,
    pub manufacturer_info: Value,
    #[serde(rename = "type")]
    pub kind: Value,
    pub status: Value,
    pub quantity: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedComponent {
    pub part_id: Value,
    pub quantity: Value,
    pub error: String,
}

/// Why a part reference could not be turned into a full component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    NotFound,
    Incomplete { missing: &'static str },
    NotAnObject,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NotFound => write!(f, "not found"),
            UnresolvedReason::Incomplete { missing } => write!(f, "incomplete: missing {}", missing),
            UnresolvedReason::NotAnObject => write!(f, "incomplete: part record is not an object"),
        }
    }
}

/// Outcome for a node that is dropped from the tree when it cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Present(T),
    Skipped(SkipReason),
}

impl<T> Resolution<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Resolution::Present(value) => Some(value),
            Resolution::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingField(&'static str),
    NotFound,
    NotAnObject,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing key: '{}'", field),
            SkipReason::NotFound => write!(f, "not found"),
            SkipReason::NotAnObject => write!(f, "record is not an object"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Category,
    Subcategory,
    Assembly,
    Component,
    Part,
}

/// A recoverable per-record problem. Never aborts the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildWarning {
    pub entity: EntityKind,
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub categories: usize,
    pub subcategories: usize,
    pub assemblies: usize,
    pub components: usize,
    pub unresolved_components: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub document: HierarchyDocument,
    pub warnings: Vec<BuildWarning>,
    pub stats: BuildStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// `None` for a dry run.
    pub output_path: Option<String>,
    pub stats: BuildStats,
    pub warnings: Vec<BuildWarning>,
}

impl RunSummary {
    /// Single-line JSON report of the run, for the end-of-run log entry.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Renders an identifier for log messages without JSON quoting for strings.
pub fn display_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_metadata_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        let metadata = Metadata::new(at, DEFAULT_DESCRIPTION);

        assert_eq!(metadata.generation_timestamp, "2024-03-05T07:08:09.000000Z");
        assert_eq!(metadata.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_unresolved_component_has_exactly_three_keys() {
        let node = ComponentNode::Unresolved(UnresolvedComponent {
            part_id: json!("P1"),
            quantity: json!(3),
            error: UnresolvedReason::NotFound.to_string(),
        });

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"part_id": "P1", "quantity": 3, "error": "not found"}));
    }

    #[test]
    fn test_absent_flags_serialize_as_null() {
        let node = AssemblyNode {
            id: json!("A1"),
            name: json!("Frame"),
            kind: json!("assembly"),
            can_order: None,
            is_kit: Some(json!(true)),
            status: json!("active"),
            components: vec![],
        };

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["can_order"], Value::Null);
        assert_eq!(value["is_kit"], json!(true));
        assert_eq!(value["type"], json!("assembly"));
    }

    #[test]
    fn test_run_summary_reports_warnings_as_json() {
        let summary = RunSummary {
            output_path: None,
            stats: BuildStats {
                categories: 1,
                warnings: 1,
                ..BuildStats::default()
            },
            warnings: vec![BuildWarning {
                entity: EntityKind::Subcategory,
                id: "S1".to_string(),
                message: "Skipping subcategory 'S1'".to_string(),
            }],
        };

        let value: Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["output_path"], Value::Null);
        assert_eq!(value["stats"]["categories"], json!(1));
        assert_eq!(
            value["warnings"],
            json!([{"entity": "subcategory", "id": "S1", "message": "Skipping subcategory 'S1'"}])
        );
    }

    #[test]
    fn test_display_id_strips_string_quotes() {
        assert_eq!(display_id(&json!("A1")), "A1");
        assert_eq!(display_id(&json!(42)), "42");
    }
}
