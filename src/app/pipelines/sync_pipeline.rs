use crate::adapters::supplier::SupplierClient;
use crate::core::{GalleryImage, Pipeline, Product, Storage};
use crate::utils::error::Result;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A catalog entry with whatever the supplier returned for it.
#[derive(Debug, Clone)]
pub struct SyncEntry {
    pub key: String,
    pub existing: Value,
    pub fetched: Option<Product>,
}

#[derive(Debug, Clone)]
pub struct SyncedCatalog {
    pub catalog: Map<String, Value>,
    pub skipped: Vec<String>,
}

/// Keeps the locally curated price and categories exactly as written, takes
/// everything else from the supplier, and points gallery paths at the CDN.
pub fn merge_product(existing: &Value, fetched: Product, cdn_base: &str) -> Result<Value> {
    let gallery = fetched
        .gallery
        .into_iter()
        .map(|image| {
            let url = cdn_url(cdn_base, &image.url);
            let url_s3 = cdn_url(cdn_base, &image.url_s3);
            GalleryImage {
                url,
                url_s3,
                ..image
            }
        })
        .collect();

    let mut record = serde_json::to_value(Product { gallery, ..fetched })?;
    if let Value::Object(fields) = &mut record {
        for field in ["price", "categories"] {
            let local = existing.get(field).cloned().unwrap_or(Value::Null);
            fields.insert(field.to_string(), local);
        }
    }
    Ok(record)
}

fn cdn_url(cdn_base: &str, path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}/{}", cdn_base, path)
    }
}

async fn fetch_logged(client: &SupplierClient, token: &str, key: &str) -> Option<Product> {
    match client.fetch_product(token, key).await {
        Ok(Some(product)) => Some(product),
        Ok(None) => {
            tracing::warn!("Product {} not found, skipping...", key);
            None
        }
        Err(e) => {
            tracing::error!("Error fetching product {}: {}", key, e);
            None
        }
    }
}

/// Refreshes the catalog file from the supplier API.
pub struct CatalogSyncPipeline<S: Storage> {
    storage: S,
    client: SupplierClient,
    catalog_path: String,
    cdn_base: String,
    concurrent_requests: usize,
}

impl<S: Storage> CatalogSyncPipeline<S> {
    pub fn new(
        storage: S,
        client: SupplierClient,
        catalog_path: impl Into<String>,
        cdn_base: impl Into<String>,
        concurrent_requests: usize,
    ) -> Self {
        Self {
            storage,
            client,
            catalog_path: catalog_path.into(),
            cdn_base: cdn_base.into(),
            concurrent_requests: concurrent_requests.max(1),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for CatalogSyncPipeline<S> {
    type Extracted = Vec<SyncEntry>;
    type Transformed = SyncedCatalog;

    async fn extract(&self) -> Result<Vec<SyncEntry>> {
        let bytes = self.storage.read_file(&self.catalog_path).await?;
        let existing: Map<String, Value> = serde_json::from_slice(&bytes)?;
        tracing::info!("Fetching details for {} products...", existing.len());

        let token = self.client.login().await?;

        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests));
        let mut tasks = JoinSet::new();
        for (index, key) in existing.keys().enumerate() {
            let client = self.client.clone();
            let token = token.clone();
            let key = key.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (index, fetch_logged(&client, &token, &key).await)
            });
        }

        let mut fetched: Vec<Option<Product>> = vec![None; existing.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, product)) => fetched[index] = product,
                Err(e) => tracing::error!("Product fetch task failed: {}", e),
            }
        }

        Ok(existing
            .into_iter()
            .zip(fetched)
            .map(|((key, existing), fetched)| SyncEntry {
                key,
                existing,
                fetched,
            })
            .collect())
    }

    async fn transform(&self, data: Vec<SyncEntry>) -> Result<SyncedCatalog> {
        let mut catalog = Map::with_capacity(data.len());
        let mut skipped = Vec::new();

        for entry in data {
            match entry.fetched {
                Some(fetched) => {
                    let record = merge_product(&entry.existing, fetched, &self.cdn_base)?;
                    catalog.insert(entry.key, record);
                }
                None => skipped.push(entry.key),
            }
        }

        if !skipped.is_empty() {
            tracing::warn!(
                "{} products dropped from the catalog: {}",
                skipped.len(),
                skipped.join(", ")
            );
        }

        Ok(SyncedCatalog { catalog, skipped })
    }

    async fn load(&self, result: SyncedCatalog) -> Result<String> {
        let json = serde_json::to_string_pretty(&result.catalog)?;
        self.storage
            .write_file(&self.catalog_path, json.as_bytes())
            .await?;
        tracing::info!(
            "Products updated successfully ({} written)",
            result.catalog.len()
        );
        Ok(self.catalog_path.clone())
    }
}
