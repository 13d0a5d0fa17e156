// HTTP variant of the product store.
//
// The backing API has historically answered with either bare payloads or
// object-wrapped ones ({"products": [...]}, {"product": {...}}). Both shapes
// are resolved here, once, at the decode boundary; call sites only ever see
// normalized values.
use crate::config::ClientConfig;
use crate::error::{StoreError, StoreResult};
use crate::store::ProductStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use stockroom_model::{HealthReport, Product, ProductInput, ProductPatch};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Wrapped { products: Vec<Product> },
    Bare(Vec<Product>),
}

impl ListPayload {
    fn into_products(self) -> Vec<Product> {
        match self {
            Self::Wrapped { products } => products,
            Self::Bare(products) => products,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductPayload {
    Wrapped { product: Product },
    Bare(Product),
}

impl ProductPayload {
    fn into_product(self) -> Product {
        match self {
            Self::Wrapped { product } => product,
            Self::Bare(product) => product,
        }
    }
}

pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

// Distinguish a non-success response from a transport failure before the body
// is touched, so the two keep separate error categories.
fn expect_success(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(StoreError::Status(status));
    }
    Ok(response)
}

#[async_trait]
impl ProductStore for RemoteStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let response = self.client.get(self.url("products")).send().await?;
        let payload: ListPayload = expect_success(response)?.json().await?;
        Ok(payload.into_products())
    }

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        let response = self
            .client
            .post(self.url("products"))
            .json(&input)
            .send()
            .await?;
        let payload: ProductPayload = expect_success(response)?.json().await?;
        Ok(payload.into_product())
    }

    async fn update_product(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        let response = self
            .client
            .patch(self.url(&format!("products/{id}")))
            .json(&patch)
            .send()
            .await?;
        let payload: ProductPayload = expect_success(response)?.json().await?;
        Ok(payload.into_product())
    }

    async fn delete_product(&self, id: &str) -> StoreResult<String> {
        let response = self
            .client
            .delete(self.url(&format!("products/{id}")))
            .send()
            .await?;
        // Any 2xx confirms the delete; the body carries nothing we need.
        expect_success(response)?;
        Ok(id.to_string())
    }

    async fn health(&self) -> StoreResult<HealthReport> {
        let response = self.client.get(self.url("health")).send().await?;
        Ok(expect_success(response)?.json().await?)
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}
