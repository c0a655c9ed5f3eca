//! Product catalogs

use crate::config::ShopifyConfig;
use crate::protocol::Product;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const SHOPIFY_API_VERSION: &str = "2024-07";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Network(String),
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed catalog response: {0}")]
    Decode(String),
}

/// Source of the products offered in `product` replies
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Fixed list, used when no store is configured
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(vec![
            Product::new("Classic Sneaker", 49.99),
            Product::new("Canvas Tote", 18.5),
            Product::new("Wool Beanie", 22.0),
        ])
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

/// Shopify Admin API catalog
pub struct ShopifyCatalog {
    client: Client,
    products_url: String,
    access_token: String,
}

impl ShopifyCatalog {
    pub fn new(config: &ShopifyConfig, timeout: Duration) -> Result<Self, CatalogError> {
        let products_url = format!(
            "https://{}/admin/api/{SHOPIFY_API_VERSION}/products.json",
            config.shop_url.trim_end_matches('/')
        );
        Self::with_url(products_url, config.access_token.clone(), timeout)
    }

    pub(crate) fn with_url(
        products_url: String,
        access_token: String,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            products_url,
            access_token,
        })
    }
}

#[async_trait]
impl ProductCatalog for ShopifyCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .client
            .get(&self.products_url)
            .header("X-Shopify-Access-Token", &self.access_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let listing: ShopifyProducts =
            serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;

        Ok(listing
            .products
            .into_iter()
            .filter_map(ShopifyProduct::into_product)
            .collect())
    }
}

// Shopify API types

#[derive(Debug, Deserialize)]
struct ShopifyProducts {
    #[serde(default)]
    products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
struct ShopifyProduct {
    title: String,
    #[serde(default)]
    variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Deserialize)]
struct ShopifyVariant {
    #[serde(default)]
    price: Option<String>,
}

impl ShopifyProduct {
    /// Priced by its first variant; unpriced products are left out
    fn into_product(self) -> Option<Product> {
        let Some(price) = self
            .variants
            .first()
            .and_then(|v| v.price.as_deref())
            .and_then(|p| p.parse::<f64>().ok()) else {
            tracing::debug!(title = %self.title, "Skipping product without a usable price");
            return None;
        };
        Some(Product::new(self.title, price))
    }
}
