pub mod catalog_pipeline;

pub use catalog_pipeline::CatalogPipeline;
