pub mod config;
pub mod error;
pub mod fetch;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod sheet;
pub mod sheets;
pub mod table;

pub use error::PipelineError;
pub use pipeline::{Pipeline, RunReport};
pub use sheet::SheetMatrix;
pub use table::FinalRecord;

#[cfg(test)]
pub(crate) mod testutil;
