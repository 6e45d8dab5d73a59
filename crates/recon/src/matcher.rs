//! Catalog matching: exact lookup, similarity fallback, MSKU synthesis.

use log::debug;
use skubridge_core::{Catalog, Marketplace};

use crate::canonical::canonicalize;
use crate::config::IngestConfig;
use crate::model::{MappingMethod, SkuMapping};
use crate::synth::synthesize;

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

/// Similarity metric for the fuzzy fallback. Kept behind a trait so the
/// metric can be swapped (e.g. for edit distance) without touching the
/// matcher's control flow.
pub trait Similarity {
    /// Score in `[0, 1]` for two already-folded SKU strings.
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Positional character overlap: equal-position matches over the shared
/// prefix, divided by the longer length.
///
/// This is deliberately not an edit distance — a transposition scores
/// poorly, and short overlapping prefixes of very different-length SKUs can
/// score deceptively. Preserved as-is for compatibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalOverlap;

impl Similarity for PositionalOverlap {
    fn score(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let longest = a.len().max(b.len());
        if longest == 0 {
            return 0.0;
        }
        let shared = a.len().min(b.len());
        let hits = (0..shared).filter(|&i| a[i] == b[i]).count();
        hits as f64 / longest as f64
    }
}

/// Fold a SKU for similarity comparison: alphanumerics only, upper-cased.
fn fold(sku: &str) -> String {
    sku.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Match one raw seller SKU against the catalog, producing a mapping with a
/// confidence score and method. Never fails: a SKU with no catalog match
/// gets a synthesized MSKU.
pub fn match_sku(
    original: &str,
    marketplace: Marketplace,
    catalog: &Catalog,
    config: &IngestConfig,
) -> SkuMapping {
    match_sku_with(
        original,
        marketplace,
        catalog,
        &PositionalOverlap,
        config.thresholds.fuzzy_match,
    )
}

/// As [`match_sku`], with an explicit similarity metric and threshold.
pub fn match_sku_with(
    original: &str,
    marketplace: Marketplace,
    catalog: &Catalog,
    similarity: &dyn Similarity,
    threshold: f64,
) -> SkuMapping {
    let canonical = canonicalize(original, marketplace);

    // 1. Exact: canonical SKU against the catalog, or the original
    //    (pre-canonicalization) SKU against this marketplace's listings.
    let exact = catalog
        .by_sku(&canonical)
        .or_else(|| catalog.by_listing(marketplace, original));
    if let Some(product) = exact {
        debug!("exact match: {original} -> {}", product.master_sku());
        return mapping(original, canonical, product.master_sku().to_string(), marketplace, 1.0, MappingMethod::Automatic);
    }

    // 2. Similarity fallback: first catalog entry scoring above threshold.
    let needle = fold(&canonical);
    for product in catalog.iter() {
        let score = similarity.score(&needle, &fold(&product.sku));
        if score > threshold {
            debug!(
                "fuzzy match: {original} -> {} (score {score:.3})",
                product.master_sku()
            );
            return mapping(original, canonical, product.master_sku().to_string(), marketplace, 0.7, MappingMethod::AiSuggested);
        }
    }

    // 3. No match: synthesize. A recognized marketplace transform having
    //    fired is evidence the SKU shape is trustworthy.
    let msku = synthesize(&canonical, marketplace);
    let confidence = if canonical != original.trim() { 0.8 } else { 0.5 };
    debug!("no catalog match: {original} -> synthesized {msku} (confidence {confidence})");
    mapping(original, canonical, msku, marketplace, confidence, MappingMethod::Automatic)
}

fn mapping(
    original: &str,
    mapped: String,
    msku: String,
    marketplace: Marketplace,
    confidence: f64,
    method: MappingMethod,
) -> SkuMapping {
    SkuMapping {
        original_sku: original.to_string(),
        mapped_sku: mapped,
        msku,
        marketplace,
        confidence,
        method,
        validated_at: None,
    }
}
