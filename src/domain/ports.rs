use crate::domain::model::{Catalog, RenderOptions, SectionRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the product catalog comes from. Every call fetches a fresh copy.
pub trait CatalogSource: Send + Sync {
    fn fetch_catalog(&self) -> impl std::future::Future<Output = Result<Catalog>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn template_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn section_requests(&self) -> Result<Vec<SectionRequest>>;
    fn render_options(&self) -> RenderOptions;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}
