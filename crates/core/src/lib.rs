//! `skubridge-core` — Shared domain model.
//!
//! Marketplaces, products, and the read-only catalog snapshot the
//! reconciliation engine matches against. No IO dependencies.

pub mod catalog;
pub mod marketplace;
pub mod product;

pub use catalog::Catalog;
pub use marketplace::Marketplace;
pub use product::{MarketplaceListing, Product};
