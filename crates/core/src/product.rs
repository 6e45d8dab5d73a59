use serde::{Deserialize, Serialize};

use crate::marketplace::Marketplace;

/// One catalog entry. Owned by the catalog collaborator; the engine only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Canonical SKU, unique within a catalog.
    pub sku: String,
    /// Master SKU consolidating all marketplace variants, when assigned.
    pub msku: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub reorder_point: i64,
    /// Per-marketplace listings that resolve back to this product.
    pub listings: Vec<MarketplaceListing>,
}

impl Product {
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            msku: None,
            name: name.into(),
            quantity: 0,
            reorder_point: 0,
            listings: Vec::new(),
        }
    }

    pub fn with_msku(mut self, msku: impl Into<String>) -> Self {
        self.msku = Some(msku.into());
        self
    }

    pub fn with_listing(mut self, listing: MarketplaceListing) -> Self {
        self.listings.push(listing);
        self
    }

    /// The identifier a mapping should resolve to: the assigned MSKU if one
    /// exists, otherwise the product's own canonical SKU.
    pub fn master_sku(&self) -> &str {
        self.msku.as_deref().unwrap_or(&self.sku)
    }
}

/// A `(platform, sku)` listing pair. Lookup only — the listing does not own
/// the product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceListing {
    pub platform: Marketplace,
    pub sku: String,
    pub status: String,
    pub price: f64,
}

impl MarketplaceListing {
    pub fn new(platform: Marketplace, sku: impl Into<String>) -> Self {
        Self {
            platform,
            sku: sku.into(),
            status: "active".into(),
            price: 0.0,
        }
    }
}
