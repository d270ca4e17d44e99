//! Storefront categories and the section groups built from them.
//!
//! The group table is declared explicitly and built once on first use.

use crate::domain::model::{Category, CategoryGroup};
use std::sync::OnceLock;

pub const KITCHEN: &str = "kitchen";
pub const SMART_HOME: &str = "smart_home";
pub const CLEANING: &str = "cleaning";
pub const ILLUMINATION: &str = "illumination";
pub const WELLNESS: &str = "wellness";
pub const HOUSE_TOOLS: &str = "house_tools";
pub const GIFTS: &str = "gifts";
pub const TOP_SELLER: &str = "top_seller";

pub const ALL_CATEGORIES: [&str; 8] = [
    KITCHEN,
    SMART_HOME,
    CLEANING,
    ILLUMINATION,
    WELLNESS,
    HOUSE_TOOLS,
    GIFTS,
    TOP_SELLER,
];

/// Key of the group aggregating every category.
pub const ALL_PRODUCTS: &str = "all_products";

// (key, title, subtitle) for the single-category groups.
const GROUP_LABELS: [(&str, &str, &str); 8] = [
    (KITCHEN, "Cocina", "Que rico, yummy!"),
    (SMART_HOME, "Domotica", "Domotica"),
    (CLEANING, "Aseo", "Aseo"),
    (ILLUMINATION, "Iluminacion", "Iluminacion"),
    (WELLNESS, "Bienestar", "Bienestar"),
    (HOUSE_TOOLS, "Herramientas", "Herramientas"),
    (GIFTS, "Regalos", "Regalos"),
    (TOP_SELLER, "Lo mas vendido", "Lo mas vendido"),
];

static GROUPS: OnceLock<Vec<CategoryGroup>> = OnceLock::new();

/// All category groups: one per category, then `all_products`.
pub fn category_groups() -> &'static [CategoryGroup] {
    GROUPS.get_or_init(|| {
        let mut groups: Vec<CategoryGroup> = GROUP_LABELS
            .iter()
            .map(|(key, title, subtitle)| CategoryGroup {
                key: key.to_string(),
                title: title.to_string(),
                subtitle: subtitle.to_string(),
                categories: vec![Category::from(*key)],
            })
            .collect();

        groups.push(CategoryGroup {
            key: ALL_PRODUCTS.to_string(),
            title: "Todos los productos".to_string(),
            subtitle: "Todos los productos".to_string(),
            categories: ALL_CATEGORIES.iter().copied().map(Category::from).collect(),
        });

        groups
    })
}

pub fn find_group(key: &str) -> Option<&'static CategoryGroup> {
    category_groups().iter().find(|group| group.key == key)
}
