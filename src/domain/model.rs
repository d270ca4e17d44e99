use crate::utils::error::{Result, StorefrontError};
use crate::utils::format::PriceLocale;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A category tag. Product tags are free-form; the storefront's own set lives in
/// [`crate::config::categories`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this tag belongs to the static storefront category set.
    pub fn is_known(&self) -> bool {
        crate::config::categories::ALL_CATEGORIES.contains(&self.0.as_str())
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display metadata plus the categories a storefront section aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub key: String,
    pub title: String,
    pub subtitle: String,
    pub categories: Vec<Category>,
}

/// How requested categories are combined when matching a product's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Any requested category present.
    #[default]
    Union,
    /// Every requested category present.
    Intersection,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Union => f.write_str("union"),
            MatchMode::Intersection => f.write_str("intersection"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "union" => Ok(MatchMode::Union),
            "intersection" => Ok(MatchMode::Intersection),
            other => Err(StorefrontError::InvalidConfigValueError {
                field: "mode".to_string(),
                value: other.to_string(),
                reason: "Expected 'union' or 'intersection'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl Default for ProductId {
    fn default() -> Self {
        ProductId::Text(String::new())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

/// The price exactly as the catalog states it. Numbers are formatted for
/// display, strings are shown as written, and the value is written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub serde_json::Value);

impl Price {
    pub fn amount(&self) -> Option<f64> {
        self.0.as_f64()
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Self {
        Self(serde_json::Value::from(amount))
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(serde_json::Value::from(amount))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub id: serde_json::Value,
    #[serde(default, deserialize_with = "text")]
    pub url: String,
    #[serde(rename = "urlS3", default, deserialize_with = "text")]
    pub url_s3: String,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "is_false")]
    pub main: bool,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub variation_id: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    #[serde(default, deserialize_with = "text")]
    pub attribute_name: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub id: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(default, deserialize_with = "lenient")]
    pub attribute_values: Vec<AttributeValue>,
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub stock: serde_json::Value,
}

/// A catalog record. Unknown fields are ignored; missing or oddly typed ones
/// fall back to defaults, so one sloppy record never spoils its neighbours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub price: Price,
    #[serde(default, deserialize_with = "tag_list")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub stock: serde_json::Value,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "String::is_empty")]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<Variation>,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub active: serde_json::Value,
    #[serde(default, deserialize_with = "lenient")]
    pub gallery: Vec<GalleryImage>,
}

impl Product {
    /// Image shown on the product card: the main-flagged photo, then the first
    /// photo, then nothing.
    pub fn card_image(&self) -> &str {
        fn non_empty(image: &GalleryImage) -> Option<&str> {
            Some(image.url_s3.as_str()).filter(|url| !url.is_empty())
        }

        self.gallery
            .iter()
            .find(|image| image.main)
            .and_then(non_empty)
            .or_else(|| self.gallery.first().and_then(non_empty))
            .unwrap_or("")
    }
}

/// The product catalog keyed by product identifier, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Product)>,
}

impl Catalog {
    /// Parses a JSON object whose values are products. Values that are not
    /// product records at all are skipped.
    pub fn from_json(body: &str) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(body)?;
        let mut entries = Vec::with_capacity(object.len());
        for (key, value) in object {
            match serde_json::from_value::<Product>(value) {
                Ok(product) => entries.push((key, product)),
                Err(e) => tracing::warn!("Skipping catalog entry '{}': {}", key, e),
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.entries.iter().map(|(_, product)| product)
    }

    pub fn into_products(self) -> Vec<Product> {
        self.entries.into_iter().map(|(_, product)| product).collect()
    }
}

/// Everything the renderer needs to fill one page region.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRequest {
    pub section_id: String,
    pub title: String,
    pub subtitle: String,
    pub categories: Vec<Category>,
    pub mode: MatchMode,
}

impl SectionRequest {
    pub fn from_group(section_id: impl Into<String>, group: &CategoryGroup, mode: MatchMode) -> Self {
        Self {
            section_id: section_id.into(),
            title: group.title.clone(),
            subtitle: group.subtitle.clone(),
            categories: group.categories.clone(),
            mode,
        }
    }

    /// Id of the card container created inside the section.
    pub fn list_id(&self) -> String {
        format!("{}-product-list", self.section_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub locale: PriceLocale,
    pub detail_page: String,
    pub detail_link_text: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            locale: PriceLocale::default(),
            detail_page: "single-product.html".to_string(),
            detail_link_text: "Ver detalles".to_string(),
        }
    }
}

// Any value that does not fit `T` becomes `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

// String tags only; anything else in the list cannot match a category.
fn tag_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(Category(tag)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// JS-style truthiness for the `main` flag: suppliers send booleans, 0/1 or strings.
fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    })
}

fn is_false(value: &bool) -> bool {
    !*value
}
