use crate::core::filter::CatalogFilter;
use crate::core::page::Page;
use crate::core::{CatalogSource, Price, Product, RenderOptions, SectionRequest};
use crate::utils::format::{escape_html, format_price};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { products: usize },
    MissingTarget,
}

/// Heading block plus the empty card container for a section.
pub fn section_skeleton(request: &SectionRequest) -> String {
    format!(
        r#"
        <div class="container">
            <div class="row">
                <div class="col-lg-6">
                    <div class="section-heading">
                        <h2>{title}</h2>
                        <span>{subtitle}</span>
                    </div>
                </div>
            </div>
        </div>
        <div class="container">
            <div id="{list_id}" class="row row-cols-1 row-cols-md-2 row-cols-lg-3 row-cols-xxl-4 g-4"></div>
        </div>
    "#,
        title = escape_html(&request.title),
        subtitle = escape_html(&request.subtitle),
        list_id = escape_html(&request.list_id()),
    )
}

pub fn render_price(price: &Price, options: &RenderOptions) -> String {
    use serde_json::Value;
    match &price.0 {
        Value::Number(n) => n
            .as_f64()
            .map(|amount| format_price(amount, options.locale))
            .unwrap_or_else(|| n.to_string()),
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn detail_href(product: &Product, options: &RenderOptions) -> String {
    let id: String = url::form_urlencoded::byte_serialize(product.id.to_string().as_bytes()).collect();
    format!("{}?id={}", options.detail_page, id)
}

pub fn product_card(product: &Product, options: &RenderOptions) -> String {
    let name = escape_html(&product.name);
    format!(
        r#"
            <div class="col">
                <div class="item">
                    <img src="{src}" alt="{name}" />
                    <div class="down-content">
                        <h4>{name}</h4>
                        <span>{price}</span>
                        <a href="{href}">{link_text}</a>
                    </div>
                </div>
            </div>"#,
        src = escape_html(product.card_image()),
        price = escape_html(&render_price(&product.price, options)),
        href = escape_html(&detail_href(product, options)),
        link_text = escape_html(&options.detail_link_text),
    )
}

/// Fills page sections with filtered product cards.
pub struct SectionRenderer<K: CatalogSource> {
    filter: CatalogFilter<K>,
    options: RenderOptions,
}

impl<K: CatalogSource> SectionRenderer<K> {
    pub fn new(source: K, options: RenderOptions) -> Self {
        Self {
            filter: CatalogFilter::new(source),
            options,
        }
    }

    pub fn catalog_filter(&self) -> &CatalogFilter<K> {
        &self.filter
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replaces the content of `request.section_id` with a heading and the
    /// cards of every matching product. A missing section is logged and left
    /// alone.
    pub async fn render(&self, page: &mut Page, request: &SectionRequest) -> RenderOutcome {
        if !page.set_inner_html(&request.section_id, &section_skeleton(request)) {
            tracing::error!("Section with ID '{}' not found.", request.section_id);
            return RenderOutcome::MissingTarget;
        }

        let products = self.filter.filter(&request.categories, request.mode).await;

        let cards: String = products
            .iter()
            .map(|product| product_card(product, &self.options))
            .collect();

        let list_id = request.list_id();
        if !page.set_inner_html(&list_id, &cards) {
            tracing::warn!("Product list '{}' disappeared before cards were written", list_id);
        }

        tracing::info!(
            "Rendered section '{}' with {} products",
            request.section_id,
            products.len()
        );
        RenderOutcome::Rendered {
            products: products.len(),
        }
    }
}
