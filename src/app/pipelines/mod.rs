pub mod page_pipeline;
pub mod sync_pipeline;

pub use page_pipeline::{PagePipeline, RenderedPage};
pub use sync_pipeline::{CatalogSyncPipeline, SyncEntry, SyncedCatalog};
