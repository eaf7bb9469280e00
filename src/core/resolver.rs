//! Reference resolution: turns the normalized category tree into nested,
//! denormalized nodes.
//!
//! Categories, subcategories, assemblies and component entries that cannot be
//! built are dropped ([`Resolution::Skipped`]). A component whose part cannot be
//! resolved is kept as an error-marked node instead. Every drop or error marker
//! is recorded as a [`BuildWarning`] and logged; nothing here aborts the build.

use crate::core::loader::json_type;
use crate::domain::model::{
    display_id, AssemblyNode, BuildWarning, CategoryNode, ComponentNode, EntityKind, Record,
    Resolution, ResolvedComponent, SkipReason, SubcategoryNode, UnresolvedComponent,
    UnresolvedReason,
};
use indexmap::IndexMap;
use serde_json::Value;

const CATEGORY_FIELDS: [&str; 2] = ["name", "description"];
const SUBCATEGORY_FIELDS: [&str; 2] = ["name", "description"];
const ASSEMBLY_FIELDS: [&str; 3] = ["name", "type", "status"];
const COMPONENT_FIELDS: [&str; 2] = ["part_id", "quantity"];
const PART_FIELDS: [&str; 5] = [
    "name",
    "manufacturer_part_number",
    "manufacturer_info",
    "type",
    "status",
];

static NULL: Value = Value::Null;

/// Looks up `fields` in order and stops at the first one that is absent.
fn required<'r, const N: usize>(
    record: &'r Record,
    fields: [&'static str; N],
) -> Result<[&'r Value; N], &'static str> {
    let mut values = [&NULL; N];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = record.get(field).ok_or(field)?;
    }
    Ok(values)
}

pub struct Resolver<'a> {
    assemblies: &'a Record,
    parts: &'a Record,
    warnings: Vec<BuildWarning>,
}

impl<'a> Resolver<'a> {
    pub fn new(assemblies: &'a Record, parts: &'a Record) -> Self {
        Self {
            assemblies,
            parts,
            warnings: Vec::new(),
        }
    }

    pub fn into_warnings(self) -> Vec<BuildWarning> {
        self.warnings
    }

    pub fn resolve_category(&mut self, category_id: &str, record: &Value) -> Resolution<CategoryNode> {
        let Some(record) = record.as_object() else {
            return self.skip(
                EntityKind::Category,
                category_id,
                SkipReason::NotAnObject,
                format!("Skipping category '{}': record is {}", category_id, json_type(record)),
            );
        };

        let [name, description] = match required(record, CATEGORY_FIELDS) {
            Ok(values) => values,
            Err(field) => {
                return self.skip(
                    EntityKind::Category,
                    category_id,
                    SkipReason::MissingField(field),
                    format!("Skipping category '{}' due to missing key: '{}'", category_id, field),
                );
            }
        };

        let mut subcategories = IndexMap::new();
        let owner = format!("category '{}'", category_id);
        if let Some(children) = self.object_container(EntityKind::Category, category_id, &owner, record, "subcategories") {
            for (subcategory_id, subcategory) in children {
                if let Resolution::Present(node) =
                    self.resolve_subcategory(category_id, subcategory_id, subcategory)
                {
                    subcategories.insert(subcategory_id.clone(), node);
                }
            }
        }

        Resolution::Present(CategoryNode {
            name: name.clone(),
            description: description.clone(),
            subcategories,
        })
    }

    pub fn resolve_subcategory(
        &mut self,
        category_id: &str,
        subcategory_id: &str,
        record: &Value,
    ) -> Resolution<SubcategoryNode> {
        let Some(record) = record.as_object() else {
            return self.skip(
                EntityKind::Subcategory,
                subcategory_id,
                SkipReason::NotAnObject,
                format!(
                    "Skipping subcategory '{}' in category '{}': record is {}",
                    subcategory_id,
                    category_id,
                    json_type(record)
                ),
            );
        };

        let [name, description] = match required(record, SUBCATEGORY_FIELDS) {
            Ok(values) => values,
            Err(field) => {
                return self.skip(
                    EntityKind::Subcategory,
                    subcategory_id,
                    SkipReason::MissingField(field),
                    format!(
                        "Skipping subcategory '{}' in category '{}' due to missing key: '{}'",
                        subcategory_id, category_id, field
                    ),
                );
            }
        };

        let mut assemblies = Vec::new();
        let owner = format!("subcategory '{}'", subcategory_id);
        if let Some(refs) = self.array_container(EntityKind::Subcategory, subcategory_id, &owner, record, "assembly_refs") {
            for assembly_ref in refs {
                if let Resolution::Present(node) = self.resolve_assembly(subcategory_id, assembly_ref) {
                    assemblies.push(node);
                }
            }
        }

        Resolution::Present(SubcategoryNode {
            name: name.clone(),
            description: description.clone(),
            assemblies,
        })
    }

    /// Resolves one entry of a subcategory's `assembly_refs`.
    pub fn resolve_assembly(&mut self, subcategory_id: &str, assembly_ref: &Value) -> Resolution<AssemblyNode> {
        let assembly_id = display_id(assembly_ref);
        let catalog: &'a Record = self.assemblies;

        let Some(record) = assembly_ref.as_str().and_then(|key| catalog.get(key)) else {
            return self.skip(
                EntityKind::Assembly,
                assembly_id.clone(),
                SkipReason::NotFound,
                format!(
                    "Assembly ID '{}' found in subcategory '{}' but not in assemblies catalog. Skipping.",
                    assembly_id, subcategory_id
                ),
            );
        };

        let Some(record) = record.as_object() else {
            return self.skip(
                EntityKind::Assembly,
                assembly_id.clone(),
                SkipReason::NotAnObject,
                format!(
                    "Skipping assembly '{}' in subcategory '{}': record is {}",
                    assembly_id,
                    subcategory_id,
                    json_type(record)
                ),
            );
        };

        let [name, kind, status] = match required(record, ASSEMBLY_FIELDS) {
            Ok(values) => values,
            Err(field) => {
                return self.skip(
                    EntityKind::Assembly,
                    assembly_id.clone(),
                    SkipReason::MissingField(field),
                    format!(
                        "Skipping assembly '{}' in subcategory '{}' due to missing key: '{}'",
                        assembly_id, subcategory_id, field
                    ),
                );
            }
        };

        let mut components = Vec::new();
        let owner = format!("assembly '{}'", assembly_id);
        if let Some(entries) = self.array_container(EntityKind::Assembly, &assembly_id, &owner, record, "components") {
            for entry in entries {
                if let Resolution::Present(node) = self.resolve_component_entry(&assembly_id, entry) {
                    components.push(node);
                }
            }
        }

        Resolution::Present(AssemblyNode {
            id: assembly_ref.clone(),
            name: name.clone(),
            kind: kind.clone(),
            can_order: record.get("can_order").cloned(),
            is_kit: record.get("is_kit").cloned(),
            status: status.clone(),
            components,
        })
    }

    /// A malformed entry is skipped. A well-formed entry always yields a node,
    /// resolved or error-marked.
    pub fn resolve_component_entry(&mut self, assembly_id: &str, entry: &Value) -> Resolution<ComponentNode> {
        let Some(fields) = entry.as_object() else {
            return self.skip(
                EntityKind::Component,
                assembly_id,
                SkipReason::NotAnObject,
                format!(
                    "Skipping component in assembly '{}': entry is {}: {}",
                    assembly_id,
                    json_type(entry),
                    entry
                ),
            );
        };

        match required(fields, COMPONENT_FIELDS) {
            Ok([part_id, quantity]) => Resolution::Present(self.resolve_part(assembly_id, part_id, quantity)),
            Err(field) => self.skip(
                EntityKind::Component,
                assembly_id,
                SkipReason::MissingField(field),
                format!(
                    "Skipping component in assembly '{}' due to missing key: '{}' in component data: {}",
                    assembly_id, field, entry
                ),
            ),
        }
    }

    pub fn resolve_part(&mut self, assembly_id: &str, part_id: &Value, quantity: &Value) -> ComponentNode {
        let catalog: &'a Record = self.parts;
        let part_key = display_id(part_id);

        let Some(record) = part_id.as_str().and_then(|key| catalog.get(key)) else {
            self.warn(
                EntityKind::Part,
                part_key.clone(),
                format!(
                    "Part ID '{}' referenced by assembly '{}' not found in parts catalog",
                    part_key, assembly_id
                ),
            );
            return unresolved(part_id, quantity, UnresolvedReason::NotFound);
        };

        let Some(details) = record.as_object() else {
            self.warn(
                EntityKind::Part,
                part_key.clone(),
                format!(
                    "Part '{}' in assembly '{}' is {} in the parts catalog",
                    part_key,
                    assembly_id,
                    json_type(record)
                ),
            );
            return unresolved(part_id, quantity, UnresolvedReason::NotAnObject);
        };

        match required(details, PART_FIELDS) {
            Ok([name, manufacturer_part_number, manufacturer_info, kind, status]) => {
                ComponentNode::Resolved(ResolvedComponent {
                    part_id: part_id.clone(),
                    name: name.clone(),
                    manufacturer_part_number: manufacturer_part_number.clone(),
                    manufacturer_info: manufacturer_info.clone(),
                    kind: kind.clone(),
                    status: status.clone(),
                    quantity: quantity.clone(),
                })
            }
            Err(field) => {
                self.warn(
                    EntityKind::Part,
                    part_key.clone(),
                    format!(
                        "Part '{}' in assembly '{}' is incomplete (missing key: '{}') in part data: {}",
                        part_key, assembly_id, field, record
                    ),
                );
                unresolved(part_id, quantity, UnresolvedReason::Incomplete { missing: field })
            }
        }
    }

    /// An absent container is empty. One of the wrong type is treated as empty
    /// and reported.
    fn object_container<'r>(
        &mut self,
        entity: EntityKind,
        id: &str,
        owner: &str,
        record: &'r Record,
        key: &str,
    ) -> Option<&'r Record> {
        match record.get(key)? {
            Value::Object(children) => Some(children),
            other => {
                self.warn(
                    entity,
                    id,
                    format!("Ignoring '{}' of {}: expected an object, found {}", key, owner, json_type(other)),
                );
                None
            }
        }
    }

    fn array_container<'r>(
        &mut self,
        entity: EntityKind,
        id: &str,
        owner: &str,
        record: &'r Record,
        key: &str,
    ) -> Option<&'r Vec<Value>> {
        match record.get(key)? {
            Value::Array(items) => Some(items),
            other => {
                self.warn(
                    entity,
                    id,
                    format!("Ignoring '{}' of {}: expected an array, found {}", key, owner, json_type(other)),
                );
                None
            }
        }
    }

    fn skip<T>(
        &mut self,
        entity: EntityKind,
        id: impl Into<String>,
        reason: SkipReason,
        message: String,
    ) -> Resolution<T> {
        self.warn(entity, id, message);
        Resolution::Skipped(reason)
    }

    fn warn(&mut self, entity: EntityKind, id: impl Into<String>, message: String) {
        tracing::warn!("⚠️ {}", message);
        self.warnings.push(BuildWarning {
            entity,
            id: id.into(),
            message,
        });
    }
}

fn unresolved(part_id: &Value, quantity: &Value, reason: UnresolvedReason) -> ComponentNode {
    ComponentNode::Unresolved(UnresolvedComponent {
        part_id: part_id.clone(),
        quantity: quantity.clone(),
        error: reason.to_string(),
    })
}
