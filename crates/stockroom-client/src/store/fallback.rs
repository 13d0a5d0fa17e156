//! Try/fallback combinator over the remote and local store variants.
//!
//! Every operation is attempted against the remote API first; on any remote
//! failure (transport error or non-success status) the same operation is
//! re-issued against the local file-backed store. The two stores are never
//! reconciled — the local side is a best-effort stand-in, and which side
//! served a call is visible only through the structured warning and the
//! fallback counter.
use crate::config::ClientConfig;
use crate::error::StoreResult;
use crate::store::ProductStore;
use crate::store::local::LocalStore;
use crate::store::remote::RemoteStore;
use async_trait::async_trait;
use std::future::Future;
use stockroom_model::{HealthReport, Product, ProductInput, ProductPatch};

pub struct FallbackStore {
    remote: RemoteStore,
    local: LocalStore,
}

impl FallbackStore {
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        Ok(Self {
            remote: RemoteStore::new(config)?,
            local: LocalStore::open(&config.data_dir),
        })
    }

    pub fn from_parts(remote: RemoteStore, local: LocalStore) -> Self {
        Self { remote, local }
    }

    /// List along with the name of the backend that served the call.
    pub async fn list_products_traced(&self) -> StoreResult<(Vec<Product>, &'static str)> {
        match self.remote.list_products().await {
            Ok(products) => Ok((products, self.remote.backend_name())),
            Err(err) => {
                note_fallback("list", &err);
                let products = self.local.list_products().await?;
                Ok((products, self.local.backend_name()))
            }
        }
    }
}

fn note_fallback(op: &'static str, err: &crate::error::StoreError) {
    tracing::warn!(error = %err, op, "remote store failed; falling back to local store");
    metrics::counter!("stockroom_fallback_total", "op" => op).increment(1);
}

// The combinator itself: run the remote future, and on failure run the local
// one. Local-side errors propagate to the caller untouched.
async fn or_local<T>(
    op: &'static str,
    remote: impl Future<Output = StoreResult<T>>,
    local: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    match remote.await {
        Ok(value) => Ok(value),
        Err(err) => {
            note_fallback(op, &err);
            local.await
        }
    }
}

#[async_trait]
impl ProductStore for FallbackStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let (products, _backend) = self.list_products_traced().await?;
        Ok(products)
    }

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        or_local(
            "create",
            self.remote.create_product(input.clone()),
            self.local.create_product(input),
        )
        .await
    }

    async fn update_product(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        or_local(
            "update",
            self.remote.update_product(id, patch.clone()),
            self.local.update_product(id, patch),
        )
        .await
    }

    async fn delete_product(&self, id: &str) -> StoreResult<String> {
        or_local(
            "delete",
            self.remote.delete_product(id),
            self.local.delete_product(id),
        )
        .await
    }

    async fn health(&self) -> StoreResult<HealthReport> {
        or_local("health", self.remote.health(), self.local.health()).await
    }

    fn backend_name(&self) -> &'static str {
        "fallback"
    }
}
