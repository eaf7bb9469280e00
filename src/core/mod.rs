pub mod assembler;
pub mod etl;
pub mod loader;
pub mod pipeline;
pub mod resolver;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{BuildReport, SourceData};
pub use crate::domain::ports::{Clock, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
