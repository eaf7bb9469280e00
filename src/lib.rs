pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, HierarchyConfig};

pub use core::{etl::HierarchyEngine, pipeline::HierarchyPipeline};
pub use domain::model::{BuildWarning, HierarchyDocument, RunSummary};
pub use utils::clock::{FixedClock, SystemClock};
pub use utils::error::{HierarchyError, Result};
