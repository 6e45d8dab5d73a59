use serde::{Deserialize, Serialize};

/// Supported sales channels. A closed set: every marketplace an export can
/// name maps onto one of these variants, with `Other` as the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marketplace {
    Amazon,
    Ebay,
    Shopify,
    Walmart,
    Etsy,
    Custom,
    Other,
}

impl Marketplace {
    pub const ALL: [Marketplace; 7] = [
        Self::Amazon,
        Self::Ebay,
        Self::Shopify,
        Self::Walmart,
        Self::Etsy,
        Self::Custom,
        Self::Other,
    ];

    /// Case-insensitive parse of a marketplace identifier string.
    /// Unrecognized identifiers are not coerced; the caller decides whether
    /// to fall back to `Other`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "amazon" => Some(Self::Amazon),
            "ebay" => Some(Self::Ebay),
            "shopify" => Some(Self::Shopify),
            "walmart" => Some(Self::Walmart),
            "etsy" => Some(Self::Etsy),
            "custom" => Some(Self::Custom),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::Ebay => "ebay",
            Self::Shopify => "shopify",
            Self::Walmart => "walmart",
            Self::Etsy => "etsy",
            Self::Custom => "custom",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Marketplace::parse("Amazon"), Some(Marketplace::Amazon));
        assert_eq!(Marketplace::parse("  EBAY "), Some(Marketplace::Ebay));
        assert_eq!(Marketplace::parse("shopify"), Some(Marketplace::Shopify));
        assert_eq!(Marketplace::parse("bonanza"), None);
    }

    #[test]
    fn display_round_trip() {
        for mp in Marketplace::ALL {
            assert_eq!(Marketplace::parse(&mp.to_string()), Some(mp));
        }
    }
}
