use crate::error::StoreResult;
use async_trait::async_trait;
use stockroom_model::{HealthReport, Product, ProductInput, ProductPatch};

pub mod fallback;
pub mod local;
pub mod remote;

/// CRUD capability over the product set, implemented by the remote API
/// variant, the local file-backed variant, and the combinator over both.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn create_product(&self, input: ProductInput) -> StoreResult<Product>;
    async fn update_product(&self, id: &str, patch: ProductPatch) -> StoreResult<Product>;
    /// Returns the confirmed id. Deleting an id that does not exist is a
    /// no-op, not an error.
    async fn delete_product(&self, id: &str) -> StoreResult<String>;
    async fn health(&self) -> StoreResult<HealthReport>;
    /// Human-readable backend identifier used in logs and diagnostics.
    fn backend_name(&self) -> &'static str;
}
