//! Product-list view-model.
//!
//! Derives a displayable ordered sequence from the full product set plus the
//! transient UI state (search text, sort key, sort direction). Everything here
//! is a pure function of its inputs; the source set is never mutated.
use std::cmp::Ordering;
use std::str::FromStr;

use stockroom_model::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Stock,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Transient list state: free-text search plus one sort key and direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub search: String,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortKey::Name,
            direction: SortDirection::Ascending,
        }
    }
}

impl ProductQuery {
    /// Filter and sort `products` for display.
    ///
    /// The search text is trimmed and lower-cased, then matched as a substring
    /// of name, SKU, or category (absent category compares as empty). The sort
    /// is stable, so equal keys keep their incoming order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<Product> = products
            .iter()
            .filter(|product| matches_search(product, &needle))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let ordering = match self.sort {
                SortKey::Name => compare_names(&a.name, &b.name),
                SortKey::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
                SortKey::Stock => a.stock.cmp(&b.stock),
            };
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        rows
    }
}

fn matches_search(product: &Product, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let category = product.category.as_deref().unwrap_or("");
    [product.name.as_str(), product.sku.as_str(), category]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

// Case-insensitive stand-in for a locale-aware compare; ties fall back to the
// raw bytes so the ordering stays total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
