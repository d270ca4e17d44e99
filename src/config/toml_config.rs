use crate::adapters::supplier::SupplierSettings;
use crate::config::categories;
use crate::core::{Category, ConfigProvider, MatchMode, RenderOptions, SectionRequest};
use crate::utils::error::{Result, StorefrontError};
use crate::utils::format::PriceLocale;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub site: SiteConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
    pub sync: Option<SyncConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Address the storefront is served from; the catalog path is resolved against it.
    pub base_url: String,
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub locale: PriceLocale,
    #[serde(default = "default_detail_page")]
    pub detail_page: String,
    #[serde(default = "default_detail_link_text")]
    pub detail_link_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSourceKind {
    #[default]
    Http,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSourceKind,
    #[serde(default = "default_catalog_path")]
    pub path: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSourceKind::default(),
            path: default_catalog_path(),
            timeout_seconds: None,
        }
    }
}

/// One page region to fill. Either names a category group, or spells out
/// title and categories; explicit values override the group's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub section_id: String,
    pub group: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_product_url")]
    pub product_url: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub cdn_base_url: String,
    #[serde(default = "default_white_brand_id")]
    pub white_brand_id: u32,
    #[serde(default = "default_ip_address")]
    pub ip_address: String,
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
    pub timeout_seconds: Option<u64>,
}

fn default_root_dir() -> String {
    ".".to_string()
}

fn default_template() -> String {
    "index.html".to_string()
}

fn default_output() -> String {
    "dist/index.html".to_string()
}

fn default_detail_page() -> String {
    RenderOptions::default().detail_page
}

fn default_detail_link_text() -> String {
    RenderOptions::default().detail_link_text
}

fn default_catalog_path() -> String {
    "data/products.json".to_string()
}

fn default_login_url() -> String {
    "https://api.dropi.co/api/login".to_string()
}

fn default_product_url() -> String {
    "https://api.dropi.co/api/products/productlist/v1/show/?id={id}".to_string()
}

fn default_white_brand_id() -> u32 {
    1
}

fn default_ip_address() -> String {
    "190.28.6.43".to_string()
}

fn default_concurrent_requests() -> usize {
    5
}

impl SectionConfig {
    pub fn resolve(&self) -> Result<SectionRequest> {
        let field = |name: &str| format!("sections.{}.{}", self.section_id, name);

        let group = match &self.group {
            Some(key) => Some(categories::find_group(key).ok_or_else(|| {
                StorefrontError::InvalidConfigValueError {
                    field: field("group"),
                    value: key.clone(),
                    reason: "Unknown category group".to_string(),
                }
            })?),
            None => None,
        };

        let title = match (&self.title, group) {
            (Some(title), _) => title.clone(),
            (None, Some(group)) => group.title.clone(),
            (None, None) => {
                return Err(StorefrontError::MissingConfigError {
                    field: field("title"),
                })
            }
        };

        let subtitle = self
            .subtitle
            .clone()
            .or_else(|| group.map(|g| g.subtitle.clone()))
            .unwrap_or_default();

        let requested: Vec<Category> = match (&self.categories, group) {
            (Some(names), _) => names.iter().map(|name| Category::new(name.as_str())).collect(),
            (None, Some(group)) => group.categories.clone(),
            (None, None) => {
                return Err(StorefrontError::MissingConfigError {
                    field: field("categories"),
                })
            }
        };

        if let Some(unknown) = requested.iter().find(|category| !category.is_known()) {
            return Err(StorefrontError::InvalidConfigValueError {
                field: field("categories"),
                value: unknown.to_string(),
                reason: format!(
                    "Unknown category. Known categories: {}",
                    categories::ALL_CATEGORIES.join(", ")
                ),
            });
        }

        Ok(SectionRequest {
            section_id: self.section_id.clone(),
            title,
            subtitle,
            categories: requested,
            mode: self.mode,
        })
    }
}

impl SyncConfig {
    pub fn supplier_settings(&self) -> SupplierSettings {
        SupplierSettings {
            login_url: self.login_url.clone(),
            product_url: self.product_url.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            white_brand_id: self.white_brand_id,
            ip_address: self.ip_address.clone(),
            timeout: self.timeout_seconds.map(Duration::from_secs),
        }
    }

    /// CDN prefix for gallery URLs, without a trailing slash.
    pub fn cdn_base(&self) -> &str {
        self.cdn_base_url.trim_end_matches('/')
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("sync.login_url", &self.login_url)?;
        validation::validate_url("sync.product_url", &self.product_url)?;
        if !self.product_url.contains("{id}") {
            return Err(StorefrontError::InvalidConfigValueError {
                field: "sync.product_url".to_string(),
                value: self.product_url.clone(),
                reason: "URL must contain an {id} placeholder".to_string(),
            });
        }
        validation::validate_resolved("sync.email", &self.email)?;
        validation::validate_non_empty_string("sync.email", &self.email)?;
        validation::validate_resolved("sync.password", &self.password)?;
        validation::validate_non_empty_string("sync.password", &self.password)?;
        validation::validate_resolved("sync.cdn_base_url", &self.cdn_base_url)?;
        validation::validate_positive_number(
            "sync.concurrent_requests",
            self.concurrent_requests,
            1,
        )?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("sync.timeout_seconds", timeout, 1, 600)?;
        }
        Ok(())
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StorefrontError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration, substituting `${VAR}` from the environment first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StorefrontError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written so validation can name them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| StorefrontError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_overrides(&mut self, base_url: Option<String>, output: Option<String>) {
        if let Some(base_url) = base_url {
            tracing::info!("Base URL overridden to: {}", base_url);
            self.site.base_url = base_url;
        }
        if let Some(output) = output {
            tracing::info!("Output overridden to: {}", output);
            self.site.output = output;
        }
    }

    pub fn catalog_timeout(&self) -> Option<Duration> {
        self.catalog.timeout_seconds.map(Duration::from_secs)
    }

    pub fn sync_config(&self) -> Result<&SyncConfig> {
        self.sync.as_ref().ok_or_else(|| StorefrontError::MissingConfigError {
            field: "sync".to_string(),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("site.base_url", &self.site.base_url)?;
        validation::validate_path("site.root_dir", &self.site.root_dir)?;
        validation::validate_path("site.template", &self.site.template)?;
        validation::validate_path("site.output", &self.site.output)?;
        validation::validate_non_empty_string("site.detail_page", &self.site.detail_page)?;
        validation::validate_path("catalog.path", &self.catalog.path)?;

        if let Some(timeout) = self.catalog.timeout_seconds {
            validation::validate_range("catalog.timeout_seconds", timeout, 1, 600)?;
        }

        if self.sections.is_empty() {
            return Err(StorefrontError::ConfigValidationError {
                field: "sections".to_string(),
                message: "At least one [[sections]] entry is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            validation::validate_non_empty_string("sections.section_id", &section.section_id)?;
            if !seen.insert(section.section_id.as_str()) {
                return Err(StorefrontError::InvalidConfigValueError {
                    field: "sections.section_id".to_string(),
                    value: section.section_id.clone(),
                    reason: "Section ids must be unique".to_string(),
                });
            }
            section.resolve()?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn template_path(&self) -> &str {
        &self.site.template
    }

    fn output_file(&self) -> &str {
        &self.site.output
    }

    fn section_requests(&self) -> Result<Vec<SectionRequest>> {
        self.sections.iter().map(SectionConfig::resolve).collect()
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            locale: self.site.locale,
            detail_page: self.site.detail_page.clone(),
            detail_link_text: self.site.detail_link_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[site]
base_url = "http://localhost:8080/"

[[sections]]
section_id = "kitchen"
group = "kitchen"
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.site.root_dir, ".");
        assert_eq!(config.template_path(), "index.html");
        assert_eq!(config.output_file(), "dist/index.html");
        assert_eq!(config.catalog.path, "data/products.json");
        assert_eq!(config.catalog.source, CatalogSourceKind::Http);
        assert!(config.catalog_timeout().is_none());
        assert_eq!(config.render_options(), RenderOptions::default());

        let requests = config.section_requests().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].title, "Cocina");
        assert_eq!(requests[0].mode, MatchMode::Union);
    }

    #[test]
    fn test_section_overrides_and_explicit_sections() {
        let config = TomlConfig::from_toml_str(
            r#"
[site]
base_url = "http://localhost:8080/"
locale = "en-US"

[[sections]]
section_id = "everything"
group = "all_products"
subtitle = "Todo el catalogo"

[[sections]]
section_id = "gift-ideas"
title = "Ideas"
categories = ["gifts", "kitchen"]
mode = "intersection"
"#,
        )
        .unwrap();
        config.validate().unwrap();

        let requests = config.section_requests().unwrap();
        assert_eq!(requests[0].title, "Todos los productos");
        assert_eq!(requests[0].subtitle, "Todo el catalogo");
        assert_eq!(requests[0].categories.len(), categories::ALL_CATEGORIES.len());

        assert_eq!(requests[1].subtitle, "");
        assert_eq!(requests[1].mode, MatchMode::Intersection);
        assert_eq!(
            requests[1].categories,
            vec![Category::from("gifts"), Category::from("kitchen")]
        );
        assert_eq!(config.render_options().locale, PriceLocale::EnUs);
    }

    #[test]
    fn test_unknown_group_and_category_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
[site]
base_url = "http://localhost:8080/"

[[sections]]
section_id = "garden"
group = "garden"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            StorefrontError::InvalidConfigValueError { .. }
        ));

        let config = TomlConfig::from_toml_str(
            r#"
[site]
base_url = "http://localhost:8080/"

[[sections]]
section_id = "garden"
title = "Jardin"
categories = ["garden"]
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("garden"));
    }

    #[test]
    fn test_section_without_group_needs_title() {
        let config = TomlConfig::from_toml_str(
            r#"
[site]
base_url = "http://localhost:8080/"

[[sections]]
section_id = "misc"
categories = ["gifts"]
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            StorefrontError::MissingConfigError { .. }
        ));
    }

    #[test]
    fn test_duplicate_and_missing_sections_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
[site]
base_url = "http://localhost:8080/"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(&format!(
            "{}\n[[sections]]\nsection_id = \"kitchen\"\ngroup = \"gifts\"\n",
            MINIMAL
        ))
        .unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("unique"));
    }

    #[test]
    fn test_invalid_mode_fails_to_parse() {
        let result = TomlConfig::from_toml_str(
            r#"
[site]
base_url = "http://localhost:8080/"

[[sections]]
section_id = "kitchen"
group = "kitchen"
mode = "any"
"#,
        );
        assert!(matches!(
            result.unwrap_err(),
            StorefrontError::ConfigValidationError { .. }
        ));
    }

    #[test]
    fn test_env_substitution_in_sync() {
        std::env::set_var("STOREFRONT_TEST_SYNC_EMAIL", "shop@example.com");
        let config = TomlConfig::from_toml_str(&format!(
            "{}\n[sync]\nemail = \"${{STOREFRONT_TEST_SYNC_EMAIL}}\"\npassword = \"${{STOREFRONT_TEST_UNSET_PASSWORD}}\"\ncdn_base_url = \"https://cdn.test/\"\n",
            MINIMAL
        ))
        .unwrap();

        let sync = config.sync_config().unwrap();
        assert_eq!(sync.email, "shop@example.com");
        assert_eq!(sync.password, "${STOREFRONT_TEST_UNSET_PASSWORD}");
        assert_eq!(sync.cdn_base(), "https://cdn.test");
        assert_eq!(sync.concurrent_requests, 5);
        assert_eq!(sync.white_brand_id, 1);

        let err = sync.validate().unwrap_err();
        assert!(matches!(err, StorefrontError::MissingConfigError { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut config = TomlConfig::from_toml_str(MINIMAL).unwrap();
        config.apply_overrides(Some("https://shop.example.com/".to_string()), None);
        assert_eq!(config.site.base_url, "https://shop.example.com/");
        assert_eq!(config.site.output, "dist/index.html");
        assert!(config.sync_config().is_err());
    }
}
