use crate::core::resolver::Resolver;
use crate::domain::model::{
    BuildReport, BuildStats, CategoryNode, HierarchyDocument, Metadata, Resolution, SourceData,
};
use indexmap::IndexMap;

/// Collects resolved categories into the output tree as they are produced.
#[derive(Debug)]
pub struct HierarchyAssembler {
    metadata: Metadata,
    hierarchy: IndexMap<String, CategoryNode>,
    stats: BuildStats,
}

impl HierarchyAssembler {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            hierarchy: IndexMap::new(),
            stats: BuildStats::default(),
        }
    }

    pub fn add_category(&mut self, category_id: &str, resolution: Resolution<CategoryNode>) {
        let Resolution::Present(node) = resolution else {
            return;
        };

        self.stats.categories += 1;
        for subcategory in node.subcategories.values() {
            self.stats.subcategories += 1;
            for assembly in &subcategory.assemblies {
                self.stats.assemblies += 1;
                self.stats.components += assembly.components.len();
                self.stats.unresolved_components += assembly
                    .components
                    .iter()
                    .filter(|c| !c.is_resolved())
                    .count();
            }
        }

        self.hierarchy.insert(category_id.to_string(), node);
    }

    pub fn finish(self, resolver: Resolver<'_>) -> BuildReport {
        let warnings = resolver.into_warnings();
        let stats = BuildStats {
            warnings: warnings.len(),
            ..self.stats
        };

        BuildReport {
            document: HierarchyDocument {
                metadata: self.metadata,
                hierarchy: self.hierarchy,
            },
            warnings,
            stats,
        }
    }
}

/// Resolves every category in source order and assembles the document in the
/// same walk.
pub fn build_hierarchy(sources: &SourceData, metadata: Metadata) -> BuildReport {
    let mut resolver = Resolver::new(&sources.assemblies, &sources.parts);
    let mut assembler = HierarchyAssembler::new(metadata);

    for (category_id, record) in &sources.categories {
        let resolution = resolver.resolve_category(category_id, record);
        assembler.add_category(category_id, resolution);
    }

    assembler.finish(resolver)
}
