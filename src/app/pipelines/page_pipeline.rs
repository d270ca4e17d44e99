use crate::core::page::Page;
use crate::core::render::{RenderOutcome, SectionRenderer};
use crate::core::{CatalogSource, ConfigProvider, Pipeline, Storage};
use crate::utils::error::{Result, StorefrontError};

/// The page after every configured section has been rendered.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: Page,
    pub outcomes: Vec<(String, RenderOutcome)>,
}

impl RenderedPage {
    pub fn missing_sections(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == RenderOutcome::MissingTarget)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn product_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                RenderOutcome::Rendered { products } => *products,
                RenderOutcome::MissingTarget => 0,
            })
            .sum()
    }
}

/// Reads the page template, renders every section, writes the page.
pub struct PagePipeline<S: Storage, C: ConfigProvider, K: CatalogSource> {
    storage: S,
    config: C,
    renderer: SectionRenderer<K>,
}

impl<S: Storage, C: ConfigProvider, K: CatalogSource> PagePipeline<S, C, K> {
    pub fn new(storage: S, config: C, source: K) -> Self {
        let renderer = SectionRenderer::new(source, config.render_options());
        Self {
            storage,
            config,
            renderer,
        }
    }

    pub fn renderer(&self) -> &SectionRenderer<K> {
        &self.renderer
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, K: CatalogSource> Pipeline for PagePipeline<S, C, K> {
    type Extracted = Page;
    type Transformed = RenderedPage;

    async fn extract(&self) -> Result<Page> {
        let path = self.config.template_path();
        tracing::debug!("Reading page template {}", path);

        let bytes = self.storage.read_file(path).await?;
        let html = String::from_utf8(bytes).map_err(|e| StorefrontError::ProcessingError {
            message: format!("Template {} is not UTF-8: {}", path, e),
        })?;
        Ok(Page::new(html))
    }

    async fn transform(&self, mut page: Page) -> Result<RenderedPage> {
        let requests = self.config.section_requests()?;
        let mut outcomes = Vec::with_capacity(requests.len());

        for request in &requests {
            let outcome = self.renderer.render(&mut page, request).await;
            outcomes.push((request.section_id.clone(), outcome));
        }

        let rendered = RenderedPage { page, outcomes };
        let missing = rendered.missing_sections();
        if !missing.is_empty() {
            tracing::warn!("Sections missing from the template: {}", missing.join(", "));
        }

        let failures = self.renderer.catalog_filter().failure_count();
        if failures > 0 {
            tracing::warn!(
                "Catalog could not be loaded for {} of {} sections; they were rendered empty",
                failures,
                requests.len()
            );
        }

        tracing::info!(
            "Rendered {} sections with {} product cards",
            rendered.outcomes.len() - missing.len(),
            rendered.product_count()
        );
        Ok(rendered)
    }

    async fn load(&self, result: RenderedPage) -> Result<String> {
        let path = self.config.output_file();
        let html = result.page.into_string();

        tracing::debug!("Writing page ({} bytes) to {}", html.len(), path);
        self.storage.write_file(path, html.as_bytes()).await?;
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Catalog, Category, MatchMode, RenderOptions, SectionRequest};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, contents: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), contents.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                StorefrontError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        sections: Vec<SectionRequest>,
    }

    impl ConfigProvider for MockConfig {
        fn template_path(&self) -> &str {
            "index.html"
        }

        fn output_file(&self) -> &str {
            "dist/index.html"
        }

        fn section_requests(&self) -> Result<Vec<SectionRequest>> {
            Ok(self.sections.clone())
        }

        fn render_options(&self) -> RenderOptions {
            RenderOptions::default()
        }
    }

    struct StaticSource;

    impl CatalogSource for StaticSource {
        async fn fetch_catalog(&self) -> Result<Catalog> {
            Catalog::from_json(
                r#"{
                    "1": {"id": 1, "name": "Kettle", "price": 20000, "categories": ["kitchen", "top_seller"]},
                    "2": {"id": 2, "name": "Lamp", "price": 15000, "categories": ["illumination"]}
                }"#,
            )
        }
    }

    fn section(id: &str, categories: &[&str]) -> SectionRequest {
        SectionRequest {
            section_id: id.to_string(),
            title: id.to_uppercase(),
            subtitle: String::new(),
            categories: categories.iter().copied().map(Category::from).collect(),
            mode: MatchMode::Union,
        }
    }

    const TEMPLATE: &str =
        r#"<body><section id="kitchen"></section><section id="top"></section></body>"#;

    #[tokio::test]
    async fn test_extract_reads_template() {
        let storage = MockStorage::with_file("index.html", TEMPLATE);
        let config = MockConfig { sections: vec![] };
        let pipeline = PagePipeline::new(storage, config, StaticSource);

        let page = pipeline.extract().await.unwrap();
        assert_eq!(page.as_str(), TEMPLATE);
    }

    #[tokio::test]
    async fn test_extract_missing_template() {
        let storage = MockStorage::with_file("other.html", TEMPLATE);
        let pipeline = PagePipeline::new(storage, MockConfig { sections: vec![] }, StaticSource);

        assert!(matches!(
            pipeline.extract().await.unwrap_err(),
            StorefrontError::IoError(_)
        ));
    }

    #[tokio::test]
    async fn test_transform_renders_sections_in_order() {
        let storage = MockStorage::with_file("index.html", TEMPLATE);
        let config = MockConfig {
            sections: vec![
                section("kitchen", &["kitchen"]),
                section("garden", &["gifts"]),
                section("top", &["top_seller", "illumination"]),
            ],
        };
        let pipeline = PagePipeline::new(storage, config, StaticSource);

        let page = pipeline.extract().await.unwrap();
        let rendered = pipeline.transform(page).await.unwrap();

        assert_eq!(
            rendered.outcomes,
            vec![
                ("kitchen".to_string(), RenderOutcome::Rendered { products: 1 }),
                ("garden".to_string(), RenderOutcome::MissingTarget),
                ("top".to_string(), RenderOutcome::Rendered { products: 2 }),
            ]
        );
        assert_eq!(rendered.missing_sections(), vec!["garden"]);
        assert_eq!(rendered.product_count(), 3);
        assert!(rendered
            .page
            .inner_html("top-product-list")
            .unwrap()
            .contains("<h4>Lamp</h4>"));
    }

    #[tokio::test]
    async fn test_load_writes_output() {
        let storage = MockStorage::with_file("index.html", TEMPLATE);
        let config = MockConfig {
            sections: vec![section("kitchen", &["kitchen"])],
        };
        let pipeline = PagePipeline::new(storage.clone(), config, StaticSource);

        let page = pipeline.extract().await.unwrap();
        let rendered = pipeline.transform(page).await.unwrap();
        let output = pipeline.load(rendered).await.unwrap();

        assert_eq!(output, "dist/index.html");
        let written = storage.get_file("dist/index.html").await.unwrap();
        assert!(written.contains(r#"<a href="single-product.html?id=1">Ver detalles</a>"#));
        // The template itself is left alone.
        assert_eq!(storage.get_file("index.html").await.unwrap(), TEMPLATE);
    }
}
