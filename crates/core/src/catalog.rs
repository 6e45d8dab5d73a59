use std::collections::HashMap;

use crate::marketplace::Marketplace;
use crate::product::Product;

/// Read-only catalog snapshot for the duration of one processing run.
///
/// Insertion order is preserved: fallback matching scans products in the
/// order they were loaded and takes the first acceptable hit.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_sku: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Self {
        let by_sku = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.sku.clone(), i))
            .collect();
        Self { products, by_sku }
    }

    /// Build a catalog from `(sku, msku)` mapping rows, e.g. a SKU→MSKU
    /// mapping sheet. A combo cell (comma-joined SKUs) expands into one
    /// product per component, all sharing the MSKU. Rows with an empty SKU
    /// or MSKU are skipped.
    pub fn from_mapping_rows<I, S, M>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, M)>,
        S: AsRef<str>,
        M: AsRef<str>,
    {
        let mut products = Vec::new();
        for (sku_cell, msku) in rows {
            let msku = msku.as_ref().trim();
            if msku.is_empty() {
                continue;
            }
            for sku in sku_cell.as_ref().split(',') {
                let sku = sku.trim();
                if sku.is_empty() {
                    continue;
                }
                products.push(Product::new(sku, sku).with_msku(msku));
            }
        }
        Self::from_products(products)
    }

    /// Exact lookup by canonical SKU.
    pub fn by_sku(&self, sku: &str) -> Option<&Product> {
        self.by_sku.get(sku).map(|&i| &self.products[i])
    }

    /// Lookup by a marketplace listing's `(platform, sku)` pair.
    pub fn by_listing(&self, platform: Marketplace, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| {
            p.listings
                .iter()
                .any(|l| l.platform == platform && l.sku == sku)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
