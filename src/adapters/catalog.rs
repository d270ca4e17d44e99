use crate::core::{Catalog, CatalogSource, Storage};
use crate::utils::error::{Result, StorefrontError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fetches the catalog over HTTP. Every request carries a `t` timestamp
/// parameter so intermediary caches never answer it.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    catalog_url: Url,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str, catalog_path: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base = Url::parse(base_url)?;
        let catalog_url = base.join(catalog_path)?;

        Ok(Self {
            client: builder.build()?,
            catalog_url,
        })
    }

    /// Catalog address for a request made at `timestamp_ms`.
    pub fn catalog_url(&self, timestamp_ms: i64) -> Url {
        let mut url = self.catalog_url.clone();
        url.query_pairs_mut()
            .append_pair("t", &timestamp_ms.to_string());
        url
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        let url = self.catalog_url(chrono::Utc::now().timestamp_millis());
        tracing::debug!("Fetching catalog from {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        if !status.is_success() {
            return Err(StorefrontError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Catalog::from_json(&body)
    }
}

/// Reads the catalog file through a [`Storage`] backend, e.g. when building a
/// page next to its `data/` directory.
#[derive(Debug, Clone)]
pub struct StorageCatalogSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> StorageCatalogSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

impl<S: Storage> CatalogSource for StorageCatalogSource<S> {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        tracing::debug!("Reading catalog from {}", self.path);
        let bytes = self.storage.read_file(&self.path).await?;
        let body = String::from_utf8(bytes).map_err(|e| StorefrontError::ProcessingError {
            message: format!("Catalog {} is not UTF-8: {}", self.path, e),
        })?;
        Catalog::from_json(&body)
    }
}
