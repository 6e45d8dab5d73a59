//! Header resolution: raw export columns → canonical field names.
//!
//! Candidate lists are ordered and order is load-bearing: marketplace
//! aliases are tried before the shared base list, since a generic alias
//! like `"Date"` can collide with marketplace-specific semantics (Amazon
//! settlement exports carry an `"Update Date and Time"` column that must
//! not win over `"Purchase Date"`).

use std::collections::HashMap;

use skubridge_core::Marketplace;

use crate::config::IngestConfig;
use crate::model::RawRow;

// ---------------------------------------------------------------------------
// Canonical fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    OrderId,
    Sku,
    ProductName,
    Quantity,
    UnitPrice,
    TotalAmount,
    Fees,
    NetAmount,
    OrderDate,
    Status,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Self::OrderId,
        Self::Sku,
        Self::ProductName,
        Self::Quantity,
        Self::UnitPrice,
        Self::TotalAmount,
        Self::Fees,
        Self::NetAmount,
        Self::OrderDate,
        Self::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::OrderId => "order_id",
            Self::Sku => "sku",
            Self::ProductName => "product_name",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::TotalAmount => "total_amount",
            Self::Fees => "fees",
            Self::NetAmount => "net_amount",
            Self::OrderDate => "order_date",
            Self::Status => "status",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Shared candidate headers, tried after any marketplace-specific ones.
    fn base_candidates(&self) -> &'static [&'static str] {
        match self {
            Self::OrderId => &["Order ID", "order_id", "OrderId", "Order Number"],
            Self::Sku => &["SKU", "sku", "Product SKU", "Item SKU"],
            Self::ProductName => &["Product Name", "Title", "Item Name"],
            Self::Quantity => &["Quantity", "Qty", "quantity"],
            Self::UnitPrice => &["Unit Price", "Price", "unit-price"],
            Self::TotalAmount => &["Total", "Total Amount", "Amount"],
            Self::Fees => &["Fees", "Fee", "Commission"],
            Self::NetAmount => &["Net Amount", "Net", "Net Proceeds"],
            Self::OrderDate => &["Order Date", "Date", "order-date"],
            Self::Status => &["Status", "Order Status"],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Marketplace-specific candidates, tried before the base list.
fn marketplace_candidates(marketplace: Marketplace, field: Field) -> &'static [&'static str] {
    use Field::*;
    use Marketplace::*;
    match (marketplace, field) {
        (Amazon, OrderId) => &["order-id", "Amazon Order ID"],
        // "sku" variants stay ahead of ASIN: a row carrying both should
        // resolve to the seller SKU, not the Amazon catalog id.
        (Amazon, Sku) => &["sku", "SKU", "ASIN"],
        (Amazon, ProductName) => &["product-name"],
        (Amazon, Quantity) => &["Quantity Purchased"],
        (Amazon, UnitPrice) => &["Item Price"],
        (Amazon, TotalAmount) => &["Order Total"],
        (Amazon, Fees) => &["Amazon Fee", "Referral Fee"],
        (Amazon, OrderDate) => &["Purchase Date", "purchase-date"],
        (Amazon, Status) => &["Fulfillment Status"],

        (Ebay, OrderId) => &["Sales Record Number", "Transaction ID"],
        (Ebay, Sku) => &["Item ID", "Custom Label"],
        (Ebay, ProductName) => &["Item Title"],
        (Ebay, Quantity) => &["Quantity Sold"],
        (Ebay, UnitPrice) => &["Sale Price"],
        (Ebay, TotalAmount) => &["Sale Amount", "Total Price"],
        (Ebay, Fees) => &["eBay Fee", "Final Value Fee"],
        (Ebay, OrderDate) => &["Sale Date", "Transaction Date"],

        (Shopify, OrderId) => &["Name", "Order", "Order Number"],
        (Shopify, Sku) => &["Variant SKU"],
        (Shopify, UnitPrice) => &["Product Price"],
        (Shopify, TotalAmount) => &["Line Total"],
        (Shopify, Fees) => &["Transaction Fee", "Payment Fee"],
        (Shopify, OrderDate) => &["Created at"],
        (Shopify, Status) => &["Fulfillment Status"],

        (Walmart, OrderId) => &["Purchase Order", "PO Number"],
        (Walmart, Sku) => &["WM SKU"],
        (Walmart, Quantity) => &["Units"],
        (Walmart, TotalAmount) => &["Line Total"],
        (Walmart, Fees) => &["Walmart Fee"],

        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Canonical field name → raw value, for the fields that resolved.
/// Unresolved fields are simply absent; that is not an error at this stage.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    values: HashMap<Field, String>,
}

impl FieldMap {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    fn insert(&mut self, field: Field, value: &str) {
        self.values.insert(field, value.to_string());
    }
}

/// Resolve one raw row against the candidate lists for `marketplace`.
///
/// Two passes per field: exact header match with a non-empty value first,
/// then case-insensitive substring containment in either direction. First
/// candidate wins in both passes.
pub fn resolve(row: &RawRow, marketplace: Marketplace, config: &IngestConfig) -> FieldMap {
    let mut resolved = FieldMap::default();

    for field in Field::ALL {
        let extra = config.aliases_for(marketplace, field);
        let candidates: Vec<&str> = extra
            .iter()
            .map(String::as_str)
            .chain(marketplace_candidates(marketplace, field).iter().copied())
            .chain(field.base_candidates().iter().copied())
            .collect();

        if let Some(value) = resolve_field(row, &candidates) {
            resolved.insert(field, value);
        }
    }

    resolved
}

fn resolve_field<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a str> {
    // Pass 1: exact header match.
    for candidate in candidates {
        if let Some(value) = row.get(candidate) {
            if !value.trim().is_empty() {
                return Some(value);
            }
        }
    }

    // Pass 2: case-insensitive containment, either direction.
    for candidate in candidates {
        let candidate_lower = candidate.to_lowercase();
        for (header, value) in row.iter() {
            if header.trim().is_empty() || value.trim().is_empty() {
                continue;
            }
            let header_lower = header.to_lowercase();
            if header_lower.contains(&candidate_lower) || candidate_lower.contains(&header_lower) {
                return Some(value);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amazon_row() -> RawRow {
        RawRow::from_pairs(vec![
            ("order-id", "111-222"),
            ("sku", "B0ABCDEF12"),
            ("product-name", "Steel Bottle"),
            ("Quantity Purchased", "2"),
            ("Item Price", "19.99"),
            ("Purchase Date", "2024-01-05"),
            ("Update Date and Time", "2024-02-01T10:00:00Z"),
        ])
    }

    #[test]
    fn exact_match_wins() {
        let map = resolve(&amazon_row(), Marketplace::Amazon, &IngestConfig::default());
        assert_eq!(map.get(Field::OrderId), Some("111-222"));
        assert_eq!(map.get(Field::Sku), Some("B0ABCDEF12"));
        assert_eq!(map.get(Field::Quantity), Some("2"));
        assert_eq!(map.get(Field::UnitPrice), Some("19.99"));
    }

    #[test]
    fn marketplace_alias_beats_generic_date() {
        // "Purchase Date" must win over the generic "Date" candidate even
        // though "Update Date and Time" would satisfy a containment probe.
        let map = resolve(&amazon_row(), Marketplace::Amazon, &IngestConfig::default());
        assert_eq!(map.get(Field::OrderDate), Some("2024-01-05"));
    }

    #[test]
    fn containment_fallback_both_directions() {
        // Header contains candidate: "Product SKU Code" ⊃ "SKU".
        let row = RawRow::from_pairs(vec![("Product SKU Code", "AB-1234")]);
        let map = resolve(&row, Marketplace::Other, &IngestConfig::default());
        assert_eq!(map.get(Field::Sku), Some("AB-1234"));

        let row = RawRow::from_pairs(vec![("Qty Sold", "3")]);
        let map = resolve(&row, Marketplace::Other, &IngestConfig::default());
        assert_eq!(map.get(Field::Quantity), Some("3"));

        // Candidate contains header: "Net Proceeds" ⊃ "Proceeds".
        let row = RawRow::from_pairs(vec![("Proceeds", "12.50")]);
        let map = resolve(&row, Marketplace::Other, &IngestConfig::default());
        assert_eq!(map.get(Field::NetAmount), Some("12.50"));
    }

    #[test]
    fn empty_values_do_not_resolve() {
        let row = RawRow::from_pairs(vec![("SKU", "   "), ("Product SKU", "AB-1234")]);
        let map = resolve(&row, Marketplace::Other, &IngestConfig::default());
        assert_eq!(map.get(Field::Sku), Some("AB-1234"));
    }

    #[test]
    fn unresolved_fields_stay_absent() {
        let row = RawRow::from_pairs(vec![("SKU", "AB-1234")]);
        let map = resolve(&row, Marketplace::Other, &IngestConfig::default());
        assert_eq!(map.get(Field::Fees), None);
        assert_eq!(map.get(Field::OrderId), None);
    }

    #[test]
    fn shopify_name_is_order_id() {
        let row = RawRow::from_pairs(vec![("Name", "#1001"), ("Variant SKU", "TEE-M-BLK")]);
        let map = resolve(&row, Marketplace::Shopify, &IngestConfig::default());
        assert_eq!(map.get(Field::OrderId), Some("#1001"));
        assert_eq!(map.get(Field::Sku), Some("TEE-M-BLK"));
    }

    #[test]
    fn config_aliases_tried_first() {
        let config = IngestConfig::from_toml(
            "[header_aliases.custom]\nsku = [\"Seller SKU\"]\norder_id = [\"Receipt ID\"]\n",
        )
        .unwrap();
        let row = RawRow::from_pairs(vec![
            ("Receipt ID", "r-9"),
            ("Seller SKU", "XY-0001"),
            ("SKU", "ignored"),
        ]);
        let map = resolve(&row, Marketplace::Custom, &config);
        assert_eq!(map.get(Field::Sku), Some("XY-0001"));
        assert_eq!(map.get(Field::OrderId), Some("r-9"));
    }
}
