pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::record_store::JsonRecordStore;
pub use adapters::storage::LocalStorage;
pub use adapters::sync::{select_catalog_sync, NoopCatalogSync};
pub use app::pipelines::CatalogPipeline;
pub use config::{PipelineConfig, SyncSettings};
pub use core::etl::EtlEngine;
pub use utils::error::{CatalogError, Result};
