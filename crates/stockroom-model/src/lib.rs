// Shared product entity types used across the stockroom crates.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inventory item as it travels over the wire and through the stores.
///
/// `id` is an opaque string: the remote backend assigns its own identifiers,
/// so nothing here may assume a particular id format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Set once at creation, never touched afterwards.
    pub created_at: DateTime<Utc>,
    /// Stamped on every mutation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields required to create a product. Ids and timestamps are assigned by
/// whichever store performs the create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Patch-style update: only present fields are serialized and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category.is_none()
    }
}

/// Health-check payload reported by a store backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// Seconds the backend has been up.
    pub uptime: f64,
    pub db: String,
}

/// Generate a fresh opaque product id.
pub fn new_product_id() -> String {
    Uuid::new_v4().to_string()
}

impl Product {
    /// Build a product from creation input, assigning a fresh id and stamping
    /// `created_at` with the supplied time.
    pub fn from_input(input: ProductInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_product_id(),
            name: input.name,
            sku: input.sku,
            price: input.price,
            stock: input.stock,
            category: input.category,
            created_at,
            updated_at: None,
        }
    }
}
