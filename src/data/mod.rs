//! Data module - CSV loading, cleaning, and the in-memory metadata table

mod cleaner;
mod loader;
mod model;

pub use cleaner::Cleaner;
pub use loader::{DataLoader, LoaderError};
pub use model::{CleanedView, MetadataTable, PaperRecord, RawPaper, YearRange};
