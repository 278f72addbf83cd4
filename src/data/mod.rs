//! Data module - CSV loading and export table processing

mod loader;
mod processor;
pub mod schema;
mod selection;
mod tables;

#[cfg(test)]
pub(crate) mod fixtures;

pub use loader::{DataLoader, DataSource, LoaderError};
pub use processor::{ExportProcessor, ProcessorError};
pub use selection::StateSelection;
pub use tables::{CategoryTotals, LongExportTable, StateTotal, WideExportTable};
