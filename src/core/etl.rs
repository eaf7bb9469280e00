use crate::core::Pipeline;
use crate::domain::model::{BuildReport, RunSummary};
use crate::utils::error::Result;

pub struct HierarchyEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> HierarchyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Builds and writes the master hierarchy.
    pub fn run(&self) -> Result<RunSummary> {
        let report = self.build()?;

        tracing::info!("Writing master hierarchy...");
        let output_path = self.pipeline.load(&report)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path: Some(output_path),
            stats: report.stats,
            warnings: report.warnings,
        })
    }

    /// Builds the hierarchy without writing anything.
    pub fn run_dry(&self) -> Result<RunSummary> {
        let report = self.build()?;
        tracing::info!("Dry run: output not written");

        Ok(RunSummary {
            output_path: None,
            stats: report.stats,
            warnings: report.warnings,
        })
    }

    fn build(&self) -> Result<BuildReport> {
        tracing::info!("Loading source catalogs...");
        let sources = self.pipeline.extract()?;
        tracing::info!(
            "Loaded {} categories, {} assemblies, {} parts",
            sources.categories.len(),
            sources.assemblies.len(),
            sources.parts.len()
        );

        tracing::info!("Resolving hierarchy...");
        let report = self.pipeline.transform(sources)?;
        let stats = &report.stats;
        tracing::info!(
            "Resolved {} categories, {} subcategories, {} assemblies, {} components ({} unresolved), {} warnings",
            stats.categories,
            stats.subcategories,
            stats.assemblies,
            stats.components,
            stats.unresolved_components,
            stats.warnings
        );

        Ok(report)
    }
}
