use chrono::NaiveDateTime;
use serde::Serialize;
use skubridge_core::Marketplace;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One raw row of a sales export: `(header, value)` pairs in column order.
///
/// Column order matters — the header resolver's containment fallback and the
/// normalizer's last-resort SKU scan both take the first hit in column order,
/// which a hash map would not keep stable.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.push((header.into(), value.into()));
    }

    /// Exact header lookup.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive exact header lookup.
    pub fn get_ci(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h.eq_ignore_ascii_case(header))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    /// True when every cell is blank. Such rows are dropped at parse time.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMethod {
    Automatic,
    Manual,
    AiSuggested,
}

impl std::fmt::Display for MappingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::Manual => write!(f, "manual"),
            Self::AiSuggested => write!(f, "ai_suggested"),
        }
    }
}

/// A traceable SKU→MSKU mapping decision. Created once per distinct SKU
/// occurrence; confidence and method are set at creation and never silently
/// overwritten.
#[derive(Debug, Clone, Serialize)]
pub struct SkuMapping {
    /// Seller SKU exactly as it appeared in the export.
    pub original_sku: String,
    /// SKU after the marketplace canonicalization transform.
    pub mapped_sku: String,
    pub msku: String,
    pub marketplace: Marketplace,
    /// Heuristic trust in this mapping, in `[0, 1]`.
    pub confidence: f64,
    pub method: MappingMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<NaiveDateTime>,
}

impl SkuMapping {
    /// Stamp a manual validation. Set exactly once; confidence is left
    /// untouched either way.
    pub fn mark_validated(&mut self, at: NaiveDateTime) {
        if self.validated_at.is_none() {
            self.validated_at = Some(at);
        }
    }
}

// ---------------------------------------------------------------------------
// Sales record
// ---------------------------------------------------------------------------

/// One normalized row of ingested sales data. Immutable after creation
/// except for `msku`, which downstream enrichment sets exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct SalesRecord {
    /// Unique within a batch.
    pub order_id: String,
    pub marketplace: Marketplace,
    /// Original seller SKU as resolved from the row.
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msku: Option<String>,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub fees: f64,
    pub net_amount: f64,
    pub order_date: NaiveDateTime,
    pub status: String,
}

impl SalesRecord {
    /// Attach the resolved master SKU. First write wins; a second attach is
    /// a no-op.
    pub fn attach_msku(&mut self, msku: impl Into<String>) {
        if self.msku.is_none() {
            self.msku = Some(msku.into());
        }
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Aggregate over one processed file: records, mappings, and the append-only
/// error/warning trail the caller renders.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingJob {
    pub marketplace: Marketplace,
    pub status: JobStatus,
    pub records_total: usize,
    pub records_processed: usize,
    /// 0–100, monotonic non-decreasing.
    pub progress: u8,
    pub records: Vec<SalesRecord>,
    /// Distinct mappings in first-occurrence order.
    pub mappings: Vec<SkuMapping>,
    /// `"Row {n}: {message}"` strings, append-only.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ProcessingJob {
    pub fn new(marketplace: Marketplace, records_total: usize) -> Self {
        Self {
            marketplace,
            status: JobStatus::Processing,
            records_total,
            records_processed: 0,
            progress: 0,
            records: Vec::new(),
            mappings: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.records_total == 0 {
            return 0.0;
        }
        self.records.len() as f64 / self.records_total as f64
    }
}

// ---------------------------------------------------------------------------
// Batch validation
// ---------------------------------------------------------------------------

/// Partition of a mapping batch: structurally valid, invalid, and warning
/// strings for valid-but-low-confidence entries.
#[derive(Debug, Clone, Serialize)]
pub struct BatchValidation {
    pub valid: Vec<SkuMapping>,
    pub invalid: Vec<SkuMapping>,
    pub warnings: Vec<String>,
}

impl BatchValidation {
    pub fn total_processed(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            return 0.0;
        }
        self.valid.len() as f64 / total as f64
    }
}
