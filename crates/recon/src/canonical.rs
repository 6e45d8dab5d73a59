//! SKU canonicalization, format validation, and combo expansion.

use std::sync::OnceLock;

use regex::Regex;
use skubridge_core::Marketplace;

struct SkuPatterns {
    asin: Regex,
    amazon: Regex,
    ebay: Regex,
    shopify: Regex,
    walmart: Regex,
    standard: Regex,
    combo: Regex,
}

fn patterns() -> &'static SkuPatterns {
    static PATTERNS: OnceLock<SkuPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SkuPatterns {
        asin: Regex::new(r"^B[0-9A-Z]{9}$").unwrap(),
        amazon: Regex::new(r"^(B[0-9A-Z]{9}|[A-Z0-9]{10})$").unwrap(),
        ebay: Regex::new(r"^[0-9]{12}$").unwrap(),
        shopify: Regex::new(r"^[A-Z0-9_-]{1,100}$").unwrap(),
        walmart: Regex::new(r"^[A-Z0-9]{8,15}$").unwrap(),
        standard: Regex::new(r"^[A-Z]{2,4}-[0-9]{4,8}$").unwrap(),
        combo: Regex::new(r"^[A-Z]{2,4}-[0-9]{4,8}(,[A-Z]{2,4}-[0-9]{4,8})*$").unwrap(),
    })
}

// ---------------------------------------------------------------------------
// Canonicalization
// ---------------------------------------------------------------------------

/// Marketplace-specific transform from raw seller SKU to canonical form.
///
/// Total: never fails, and never returns an empty string for a non-empty
/// input. Marketplaces without a transform rule pass through unchanged.
pub fn canonicalize(raw: &str, marketplace: Marketplace) -> String {
    let sku = raw.trim();
    match marketplace {
        Marketplace::Amazon => {
            if patterns().asin.is_match(sku) {
                format!("AMZ-{}", &sku[1..])
            } else {
                sku.to_string()
            }
        }
        Marketplace::Ebay => {
            if patterns().ebay.is_match(sku) {
                format!("EBY-{}", &sku[4..])
            } else {
                sku.to_string()
            }
        }
        Marketplace::Shopify => {
            let cleaned: String = sku
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_ascii_uppercase();
            // Stripping can empty a symbols-only SKU; pass through instead.
            if cleaned.is_empty() {
                sku.to_string()
            } else {
                cleaned
            }
        }
        _ => sku.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn marketplace_pattern(marketplace: Marketplace) -> Option<&'static Regex> {
    let p = patterns();
    match marketplace {
        Marketplace::Amazon => Some(&p.amazon),
        Marketplace::Ebay => Some(&p.ebay),
        Marketplace::Shopify => Some(&p.shopify),
        Marketplace::Walmart => Some(&p.walmart),
        _ => None,
    }
}

/// Validate SKU shape against a marketplace pattern, or against any known
/// pattern when the marketplace is absent or has no pattern of its own.
pub fn is_valid_sku(sku: &str, marketplace: Option<Marketplace>) -> bool {
    let sku = sku.trim().to_ascii_uppercase();
    if sku.is_empty() {
        return false;
    }

    if let Some(pattern) = marketplace.and_then(marketplace_pattern) {
        return pattern.is_match(&sku);
    }

    let p = patterns();
    [
        &p.amazon,
        &p.ebay,
        &p.shopify,
        &p.walmart,
        &p.standard,
        &p.combo,
    ]
    .iter()
    .any(|pattern| pattern.is_match(&sku))
}

// ---------------------------------------------------------------------------
// Combo expansion
// ---------------------------------------------------------------------------

/// Split a combo SKU (comma-joined bundle of standard-shaped SKUs) into its
/// components. Anything that is not combo-shaped comes back as a single
/// element, unchanged.
pub fn expand_combo(raw: &str) -> Vec<String> {
    if !patterns().combo.is_match(raw.trim()) {
        return vec![raw.to_string()];
    }
    raw.trim().split(',').map(|s| s.trim().to_string()).collect()
}
