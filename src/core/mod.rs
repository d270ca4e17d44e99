pub mod engine;
pub mod filter;
pub mod page;
pub mod render;

pub use crate::domain::model::{
    Catalog, Category, CategoryGroup, GalleryImage, MatchMode, Price, Product, ProductId,
    RenderOptions, SectionRequest,
};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
