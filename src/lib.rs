pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::catalog::{HttpCatalogSource, StorageCatalogSource};
pub use adapters::supplier::{SupplierClient, SupplierSettings};
pub use app::pipelines::{CatalogSyncPipeline, PagePipeline};
pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{engine::StorefrontEngine, filter::CatalogFilter, page::Page, render::SectionRenderer};
pub use utils::error::{Result, StorefrontError};
