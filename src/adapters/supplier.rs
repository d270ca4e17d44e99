use crate::core::Product;
use crate::utils::error::{Result, StorefrontError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    white_brand_id: u32,
    brand: &'a str,
    #[serde(rename = "ipAddress")]
    ip_address: &'a str,
    otp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Connection settings for the supplier API.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierSettings {
    pub login_url: String,
    /// Product detail URL with an `{id}` placeholder.
    pub product_url: String,
    pub email: String,
    pub password: String,
    pub white_brand_id: u32,
    pub ip_address: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct SupplierClient {
    client: Client,
    settings: SupplierSettings,
}

impl SupplierClient {
    pub fn new(settings: SupplierSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            settings,
        })
    }

    pub fn product_url(&self, product_id: &str) -> String {
        self.settings.product_url.replace("{id}", product_id)
    }

    /// Logs in and returns the bearer token.
    pub async fn login(&self) -> Result<String> {
        let request = LoginRequest {
            email: &self.settings.email,
            password: &self.settings.password,
            white_brand_id: self.settings.white_brand_id,
            brand: "",
            ip_address: &self.settings.ip_address,
            otp: None,
        };

        tracing::debug!("Logging in at {}", self.settings.login_url);
        let response = self
            .client
            .post(&self.settings.login_url)
            .json(&request)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(StorefrontError::AuthError {
                message: format!("login returned status {}", response.status()),
            });
        }

        let body: LoginResponse = response.json().await?;
        match body.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(StorefrontError::AuthError {
                message: "no token received".to_string(),
            }),
        }
    }

    /// Fetches one product's details. `Ok(None)` when the supplier does not
    /// know the product.
    pub async fn fetch_product(&self, token: &str, product_id: &str) -> Result<Option<Product>> {
        let url = self.product_url(product_id);
        let response = self
            .client
            .get(&url)
            .header("X-Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(StorefrontError::HttpStatusError {
                status: status.as_u16(),
                url,
            }),
        }
    }
}
