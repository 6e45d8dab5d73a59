//! Deterministic MSKU synthesis for SKUs with no catalog match.

use skubridge_core::Marketplace;

/// Synthesize a master SKU from a canonical SKU and marketplace.
///
/// Pure and deterministic — re-processing the same file yields the same
/// MSKUs. Format: `{first 3 chars of upper-cased marketplace}-{hash}` where
/// the hash is a 32-bit signed rolling hash (`h = h*31 + char`, wrapping),
/// absolute value, rendered base-36 upper-case and zero-padded to 6 chars.
pub fn synthesize(canonical_sku: &str, marketplace: Marketplace) -> String {
    let name = marketplace.as_str().to_ascii_uppercase();
    let prefix: String = name.chars().take(3).collect();

    let mut hash: i32 = 0;
    for c in canonical_sku.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as i32);
    }
    let value = (hash as i64).abs() as u64;

    format!("{prefix}-{:0>6}", base36_upper(value))
}

fn base36_upper(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}
