use std::collections::HashMap;

use serde::Deserialize;
use skubridge_core::Marketplace;

use crate::error::IngestError;
use crate::headers::Field;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Engine tuning knobs plus per-marketplace header alias overlays.
///
/// Everything has a working default; an empty TOML document is a valid
/// config. Aliases are how exports from `custom`/`other` marketplaces get a
/// usable header candidate list without code changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    /// marketplace name → canonical field name → extra header candidates,
    /// tried before the built-in lists.
    #[serde(default)]
    pub header_aliases: HashMap<String, HashMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    /// Similarity score a catalog entry must exceed (strictly) to count as
    /// a fuzzy match.
    #[serde(default = "default_fuzzy_match")]
    pub fuzzy_match: f64,
    /// Mappings below this confidence are surfaced as warnings.
    #[serde(default = "default_warn_confidence")]
    pub warn_confidence: f64,
}

fn default_fuzzy_match() -> f64 {
    0.8
}

fn default_warn_confidence() -> f64 {
    0.6
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fuzzy_match: default_fuzzy_match(),
            warn_confidence: default_warn_confidence(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl IngestConfig {
    pub fn from_toml(input: &str) -> Result<Self, IngestError> {
        let config: IngestConfig =
            toml::from_str(input).map_err(|e| IngestError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        for (name, value) in [
            ("fuzzy_match", self.thresholds.fuzzy_match),
            ("warn_confidence", self.thresholds.warn_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(IngestError::ConfigValidation(format!(
                    "threshold '{name}' must be in [0, 1], got {value}"
                )));
            }
        }

        for (marketplace, fields) in &self.header_aliases {
            if Marketplace::parse(marketplace).is_none() {
                return Err(IngestError::ConfigValidation(format!(
                    "header_aliases: unknown marketplace '{marketplace}'"
                )));
            }
            for field in fields.keys() {
                if Field::from_name(field).is_none() {
                    return Err(IngestError::ConfigValidation(format!(
                        "header_aliases.{marketplace}: unknown field '{field}'"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Config-supplied header candidates for one `(marketplace, field)`.
    pub fn aliases_for(&self, marketplace: Marketplace, field: Field) -> &[String] {
        self.header_aliases
            .get(marketplace.as_str())
            .and_then(|fields| fields.get(field.name()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = IngestConfig::from_toml("").unwrap();
        assert_eq!(config.thresholds.fuzzy_match, 0.8);
        assert_eq!(config.thresholds.warn_confidence, 0.6);
        assert!(config.header_aliases.is_empty());
    }

    #[test]
    fn parse_aliases() {
        let input = r#"
[thresholds]
warn_confidence = 0.5

[header_aliases.custom]
sku = ["Seller SKU", "Listing SKU"]
order_id = ["Receipt ID"]
"#;
        let config = IngestConfig::from_toml(input).unwrap();
        assert_eq!(config.thresholds.warn_confidence, 0.5);
        assert_eq!(config.thresholds.fuzzy_match, 0.8);
        assert_eq!(
            config.aliases_for(Marketplace::Custom, Field::Sku),
            ["Seller SKU", "Listing SKU"]
        );
        assert!(config.aliases_for(Marketplace::Amazon, Field::Sku).is_empty());
    }

    #[test]
    fn reject_out_of_range_threshold() {
        let err = IngestConfig::from_toml("[thresholds]\nfuzzy_match = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("fuzzy_match"));
    }

    #[test]
    fn reject_unknown_marketplace() {
        let input = "[header_aliases.bonanza]\nsku = [\"SKU\"]\n";
        let err = IngestConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("bonanza"));
    }

    #[test]
    fn reject_unknown_field() {
        let input = "[header_aliases.custom]\ntracking_number = [\"Tracking\"]\n";
        let err = IngestConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("tracking_number"));
    }
}
