pub mod cleaner;
pub mod etl;
pub mod formatter;
pub mod projector;
pub mod sizing;

pub use crate::domain::model::{
    CatalogRecord, CleanedRecord, PublicRecord, RawRecord, RunSummary, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RemoteCatalogSync, Storage};
pub use crate::utils::error::Result;
