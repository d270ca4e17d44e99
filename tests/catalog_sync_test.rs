use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use storefront_sections::config::toml_config::TomlConfig;
use storefront_sections::utils::validation::Validate;
use storefront_sections::{
    CatalogSyncPipeline, LocalStorage, StorefrontEngine, StorefrontError, SupplierClient,
};
use tempfile::TempDir;

fn write_catalog(temp_dir: &TempDir) -> Result<()> {
    let existing = json!({
        "101": {"id": 101, "name": "Olla vieja", "price": 45000, "categories": ["kitchen"]},
        "202": {"id": 202, "name": "Lampara", "price": 30000, "categories": ["illumination", "gifts"]},
        "303": {"id": 303, "name": "Descontinuado", "price": 1000, "categories": []}
    });
    std::fs::create_dir_all(temp_dir.path().join("data"))?;
    std::fs::write(
        temp_dir.path().join("data/products.json"),
        serde_json::to_string_pretty(&existing)?,
    )?;
    Ok(())
}

fn sync_config(server: &MockServer, root: &str) -> Result<TomlConfig> {
    let content = format!(
        r#"
[site]
base_url = "http://localhost:8080/"
root_dir = "{root}"

[[sections]]
section_id = "kitchen"
group = "kitchen"

[sync]
login_url = "{login}"
product_url = "{product}"
email = "shop@example.com"
password = "secret"
cdn_base_url = "https://cdn.test/"
concurrent_requests = 2
"#,
        root = root,
        login = server.url("/api/login"),
        product = server.url("/api/products/show/?id={id}"),
    );
    let config = TomlConfig::from_toml_str(&content)?;
    config.sync_config()?.validate()?;
    Ok(config)
}

fn pipeline(config: &TomlConfig, root: &str) -> Result<CatalogSyncPipeline<LocalStorage>> {
    let sync = config.sync_config()?;
    Ok(CatalogSyncPipeline::new(
        LocalStorage::new(root.to_string()),
        SupplierClient::new(sync.supplier_settings())?,
        config.catalog.path.clone(),
        sync.cdn_base(),
        sync.concurrent_requests,
    ))
}

#[tokio::test]
async fn test_sync_merges_supplier_details() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().to_str().unwrap().replace('\\', "/");
    write_catalog(&temp_dir)?;

    let server = MockServer::start();
    let login_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/login")
            .json_body_partial(r#"{"email": "shop@example.com", "password": "secret", "white_brand_id": 1}"#);
        then.status(200).json_body(json!({"token": "tok-1"}));
    });
    let olla_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/products/show/")
            .query_param("id", "101")
            .header("X-Authorization", "Bearer tok-1");
        then.status(200).json_body(json!({
            "id": 101,
            "name": "Olla arrocera",
            "description": "<p>Cocina arroz</p>",
            "sku": "OA-1",
            "stock": 12,
            "active": true,
            "price": 1,
            "variations": [
                {"id": 9, "stock": 3, "attribute_values": [{"attribute_name": "Color", "value": "Rojo", "id": 77}]}
            ],
            "gallery": [
                {"id": 1, "url": "img/olla.jpg", "urlS3": "s3/olla.jpg", "variation_id": null}
            ]
        }));
    });
    let lampara_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/products/show/")
            .query_param("id", "202");
        then.status(200).json_body(json!({"id": 202, "name": "Lampara LED", "gallery": []}));
    });
    let missing_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/products/show/")
            .query_param("id", "303");
        then.status(404);
    });

    let config = sync_config(&server, &root)?;
    let engine = StorefrontEngine::new(pipeline(&config, &root)?);
    let path = engine.run().await?;

    assert_eq!(path, "data/products.json");
    login_mock.assert();
    olla_mock.assert();
    lampara_mock.assert();
    missing_mock.assert();

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        temp_dir.path().join("data/products.json"),
    )?)?;
    let object = written.as_object().unwrap();

    // Unknown products are dropped, order is kept.
    assert_eq!(object.keys().collect::<Vec<_>>(), vec!["101", "202"]);

    let olla = &written["101"];
    assert_eq!(olla["price"], json!(45000));
    assert_eq!(olla["categories"], json!(["kitchen"]));
    assert_eq!(olla["name"], "Olla arrocera");
    assert_eq!(olla["sku"], "OA-1");
    assert_eq!(olla["stock"], 12);
    assert_eq!(olla["variations"][0]["attribute_values"][0]["value"], "Rojo");
    assert_eq!(olla["gallery"][0]["url"], "https://cdn.test/img/olla.jpg");
    assert_eq!(olla["gallery"][0]["urlS3"], "https://cdn.test/s3/olla.jpg");

    let lampara = &written["202"];
    assert_eq!(lampara["categories"], json!(["illumination", "gifts"]));
    assert_eq!(lampara["name"], "Lampara LED");

    Ok(())
}

#[tokio::test]
async fn test_sync_aborts_on_failed_login() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().to_str().unwrap().replace('\\', "/");
    write_catalog(&temp_dir)?;
    let before = std::fs::read_to_string(temp_dir.path().join("data/products.json"))?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/login");
        then.status(401).json_body(json!({"message": "bad credentials"}));
    });
    let product_mock = server.mock(|when, then| {
        when.method(GET).path("/api/products/show/");
        then.status(200).json_body(json!({}));
    });

    let config = sync_config(&server, &root)?;
    let engine = StorefrontEngine::new(pipeline(&config, &root)?);
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, StorefrontError::AuthError { .. }));
    product_mock.assert_hits(0);
    // The catalog file is left untouched.
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("data/products.json"))?,
        before
    );
    Ok(())
}

#[tokio::test]
async fn test_sync_skips_products_on_server_errors() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().to_str().unwrap().replace('\\', "/");
    write_catalog(&temp_dir)?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/login");
        then.status(200).json_body(json!({"token": "tok-2"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/products/show/").query_param("id", "101");
        then.status(200).json_body(json!({"id": 101, "name": "Olla"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/products/show/").query_param("id", "202");
        then.status(502);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/products/show/").query_param("id", "303");
        then.status(200).body("not json");
    });

    let config = sync_config(&server, &root)?;
    let pipeline = pipeline(&config, &root)?;

    use storefront_sections::core::Pipeline;
    let entries = pipeline.extract().await?;
    assert_eq!(entries.len(), 3);
    assert!(entries[0].fetched.is_some());
    assert!(entries[1].fetched.is_none());
    assert!(entries[2].fetched.is_none());

    let synced = pipeline.transform(entries).await?;
    assert_eq!(synced.skipped, vec!["202".to_string(), "303".to_string()]);
    assert_eq!(synced.catalog.len(), 1);
    Ok(())
}
