//! File-backed implementation of the product store.
//!
//! # Purpose
//! Keeps the client usable when no backend is running: the full product list
//! is persisted as one JSON array in a single data file, and every operation
//! is a read-modify-write of that file. It is a best-effort cache with a
//! lifecycle independent of the remote source of truth, not a sync layer.
//!
//! # Durability and consistency
//! - Operations within one process are serialized by an async mutex.
//! - Concurrent processes race on the file; last writer wins, which is
//!   accepted for the single-user usage this store targets.
//!
//! # Corrupt data
//! A missing, unreadable, or non-array data file reads as the empty list and
//! is never surfaced as an error.
use crate::error::{StoreError, StoreResult};
use crate::store::ProductStore;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use stockroom_model::{HealthReport, Product, ProductInput, ProductPatch};
use tokio::sync::Mutex;

/// Data file name; the trailing version segment guards against future format
/// changes colliding with old files.
pub const DATA_FILE: &str = "products_v1.json";

pub struct LocalStore {
    path: PathBuf,
    // Serializes read-modify-write steps within this process.
    lock: Mutex<()>,
    opened: Instant,
}

impl LocalStore {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(DATA_FILE),
            lock: Mutex::new(()),
            opened: Instant::now(),
        }
    }

    /// Path of the backing data file.
    pub fn data_path(&self) -> &Path {
        &self.path
    }

    fn read_list(&self) -> Vec<Product> {
        let Ok(raw) = std::fs::read(&self.path) else {
            return Vec::new();
        };
        serde_json::from_slice(&raw).unwrap_or_default()
    }

    fn write_list(&self, products: &[Product]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create data dir: {}", parent.display()))?;
        }
        let raw = serde_json::to_vec_pretty(products).context("encode product list")?;
        std::fs::write(&self.path, raw).with_context(|| format!("write {}", self.path.display()))?;
        metrics::gauge!("stockroom_local_products").set(products.len() as f64);
        Ok(())
    }

    // Seed only when the data file has never been written. An existing file,
    // even one that reads back empty, keeps whatever state it has, so deleted
    // products do not resurrect as samples.
    fn ensure_seeded(&self) -> StoreResult<Vec<Product>> {
        if self.path.exists() {
            return Ok(self.read_list());
        }
        let seeded = seed_products();
        self.write_list(&seeded)?;
        tracing::info!(count = seeded.len(), "seeded local product store");
        Ok(seeded)
    }
}

/// Fixed sample set written on first use; deterministic except for the
/// generated ids and the seed timestamp.
fn seed_products() -> Vec<Product> {
    let now = Utc::now();
    [
        ("Wireless Mouse", "WM-1001", 25.99, 120, "Accessories"),
        ("Mechanical Keyboard", "MK-2002", 79.0, 45, "Accessories"),
        ("27\" Monitor", "MN-2700", 239.99, 18, "Displays"),
    ]
    .into_iter()
    .map(|(name, sku, price, stock, category)| Product {
        id: stockroom_model::new_product_id(),
        name: name.to_string(),
        sku: sku.to_string(),
        price,
        stock,
        category: Some(category.to_string()),
        created_at: now,
        updated_at: None,
    })
    .collect()
}

#[async_trait]
impl ProductStore for LocalStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let _guard = self.lock.lock().await;
        self.ensure_seeded()
    }

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        let _guard = self.lock.lock().await;
        let product = Product::from_input(input, Utc::now());
        let mut products = self.read_list();
        // New records go to the front so the freshest entry lists first.
        products.insert(0, product.clone());
        self.write_list(&products)?;
        Ok(product)
    }

    async fn update_product(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        let _guard = self.lock.lock().await;
        let mut products = self.read_list();
        let product = products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {id}")))?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(sku) = patch.sku {
            product.sku = sku;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(category) = patch.category {
            product.category = Some(category);
        }
        product.updated_at = Some(Utc::now());
        let updated = product.clone();
        self.write_list(&products)?;
        Ok(updated)
    }

    async fn delete_product(&self, id: &str) -> StoreResult<String> {
        let _guard = self.lock.lock().await;
        let mut products = self.read_list();
        products.retain(|product| product.id != id);
        self.write_list(&products)?;
        Ok(id.to_string())
    }

    async fn health(&self) -> StoreResult<HealthReport> {
        // The local store is healthy as long as the process runs; report its
        // own uptime and label the backing "database" accordingly.
        Ok(HealthReport {
            status: "ok".to_string(),
            uptime: self.opened.elapsed().as_secs_f64(),
            db: "local".to_string(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
