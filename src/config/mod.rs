pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_DESCRIPTION;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_RESOURCES_DIR: &str = "resources";
pub const DEFAULT_CATEGORIES_FILE: &str = "categories.json";
pub const DEFAULT_ASSEMBLIES_FILE: &str = "assemblies.json";
pub const DEFAULT_PARTS_FILE: &str = "parts.json";
pub const DEFAULT_OUTPUT_FILE: &str = "master_hierarchy.json";

/// Values given explicitly on the command line. `None` falls back to the TOML
/// file and then to the built-in default.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub resources_dir: Option<String>,
    pub categories: Option<String>,
    pub assemblies: Option<String>,
    pub parts: Option<String>,
    pub output: Option<String>,
    pub description: Option<String>,
    pub verbose: bool,
    pub json_logs: bool,
}

/// Fully merged settings for one build.
#[derive(Debug, Clone)]
pub struct HierarchyConfig {
    /// Relative input and output paths are resolved against this directory.
    pub resources_dir: PathBuf,
    pub categories: PathBuf,
    pub assemblies: PathBuf,
    pub parts: PathBuf,
    pub output: PathBuf,
    pub description: String,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self::merge(ConfigOverrides::default(), TomlConfig::default())
    }
}

impl HierarchyConfig {
    pub fn merge(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        let pick = |cli: Option<String>, toml: Option<String>, default: &str| {
            cli.or(toml).unwrap_or_else(|| default.to_string())
        };

        Self {
            resources_dir: PathBuf::from(pick(
                overrides.resources_dir,
                file.inputs.resources_dir,
                DEFAULT_RESOURCES_DIR,
            )),
            categories: PathBuf::from(pick(
                overrides.categories,
                file.inputs.categories,
                DEFAULT_CATEGORIES_FILE,
            )),
            assemblies: PathBuf::from(pick(
                overrides.assemblies,
                file.inputs.assemblies,
                DEFAULT_ASSEMBLIES_FILE,
            )),
            parts: PathBuf::from(pick(overrides.parts, file.inputs.parts, DEFAULT_PARTS_FILE)),
            output: PathBuf::from(pick(overrides.output, file.output.path, DEFAULT_OUTPUT_FILE)),
            description: pick(
                overrides.description,
                file.output.description,
                DEFAULT_DESCRIPTION,
            ),
            log_level: file.logging.level,
            verbose: overrides.verbose,
            json_logs: overrides.json_logs || file.logging.json.unwrap_or(false),
        }
    }
}

impl ConfigProvider for HierarchyConfig {
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

impl Validate for HierarchyConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("inputs.resources_dir", &self.resources_dir)?;
        for (field, path) in [
            ("inputs.categories", &self.categories),
            ("inputs.assemblies", &self.assemblies),
            ("inputs.parts", &self.parts),
            ("output.path", &self.output),
        ] {
            validation::validate_path(field, path)?;
            validation::validate_file_extension(field, path, &["json"])?;
        }
        validation::validate_non_empty_string("output.description", &self.description)?;

        let resolve = |path: &Path| validation::normalize_lexically(&self.resources_dir.join(path));
        let output = resolve(self.output.as_path());
        if [&self.categories, &self.assemblies, &self.parts]
            .into_iter()
            .any(|input| resolve(input.as_path()) == output)
        {
            return Err(crate::utils::error::HierarchyError::InvalidConfigValueError {
                field: "output.path".to_string(),
                value: self.output.display().to_string(),
                reason: "Output would overwrite one of the input files".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "master-hierarchy")]
#[command(about = "Builds the master hierarchy of categories, assemblies and parts")]
pub struct CliConfig {
    /// Directory that relative input and output paths are resolved against
    #[arg(long)]
    pub resources_dir: Option<String>,

    /// Category taxonomy file
    #[arg(long)]
    pub categories: Option<String>,

    /// Assembly catalog file
    #[arg(long)]
    pub assemblies: Option<String>,

    /// Parts catalog file
    #[arg(long)]
    pub parts: Option<String>,

    /// Output file for the master hierarchy
    #[arg(short, long)]
    pub output: Option<String>,

    /// Description written into the output metadata
    #[arg(long)]
    pub description: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Resolve everything but do not write the output file
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the command line with the optional TOML file.
    pub fn into_config(self) -> Result<HierarchyConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let overrides = ConfigOverrides {
            resources_dir: self.resources_dir,
            categories: self.categories,
            assemblies: self.assemblies,
            parts: self.parts,
            output: self.output,
            description: self.description,
            verbose: self.verbose,
            json_logs: self.json_logs,
        };

        Ok(HierarchyConfig::merge(overrides, file))
    }
}
