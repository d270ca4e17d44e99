use crate::core::{CatalogSource, Category, MatchMode, Product};
use std::sync::atomic::{AtomicU64, Ordering};

/// Whether a product's tags satisfy `requested` under `mode`.
///
/// With no requested categories, union matches nothing and intersection
/// matches everything.
pub fn matches_categories(tags: &[Category], requested: &[Category], mode: MatchMode) -> bool {
    match mode {
        MatchMode::Union => requested.iter().any(|category| tags.contains(category)),
        MatchMode::Intersection => requested.iter().all(|category| tags.contains(category)),
    }
}

/// Keeps the products matching `requested`, in their original order.
pub fn filter_products<I>(products: I, requested: &[Category], mode: MatchMode) -> Vec<Product>
where
    I: IntoIterator<Item = Product>,
{
    products
        .into_iter()
        .filter(|product| matches_categories(&product.categories, requested, mode))
        .collect()
}

/// Fetches the catalog and filters it by category. Never fails: fetch and
/// parse errors are logged, counted and turned into an empty result.
pub struct CatalogFilter<K: CatalogSource> {
    source: K,
    failures: AtomicU64,
}

impl<K: CatalogSource> CatalogFilter<K> {
    pub fn new(source: K) -> Self {
        Self {
            source,
            failures: AtomicU64::new(0),
        }
    }

    pub async fn filter(&self, categories: &[Category], mode: MatchMode) -> Vec<Product> {
        match self.source.fetch_catalog().await {
            Ok(catalog) => {
                let total = catalog.len();
                let products = filter_products(catalog.into_products(), categories, mode);
                tracing::debug!(
                    "Filtered catalog ({} mode): {} of {} products match {:?}",
                    mode,
                    products.len(),
                    total,
                    categories.iter().map(Category::as_str).collect::<Vec<_>>()
                );
                products
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error = %e, "Error filtering products");
                Vec::new()
            }
        }
    }

    /// Number of filter calls that degraded to an empty result.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
