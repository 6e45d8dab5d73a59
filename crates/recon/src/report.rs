//! Job report builders — JSON summaries layered on top of processed jobs.
//!
//! Callers that persist or display job state (an API layer, a CLI) consume
//! these instead of re-deriving counts from the raw vectors.

use serde_json::{json, Value};

use crate::model::{BatchValidation, MappingMethod, ProcessingJob};

/// Compact summary of one processing job.
///
/// `errors` and `warnings` are only present when non-empty; consumers can
/// key collapsed/expanded display off field presence.
pub fn job_summary(job: &ProcessingJob) -> Value {
    let by_method = |method: MappingMethod| {
        job.mappings.iter().filter(|m| m.method == method).count()
    };

    let mut summary = json!({
        "marketplace": job.marketplace.as_str(),
        "status": job.status.to_string(),
        "records_total": job.records_total,
        "records_processed": job.records_processed,
        "progress": job.progress,
        "record_count": job.records.len(),
        "mapping_count": job.mappings.len(),
        "mappings_automatic": by_method(MappingMethod::Automatic),
        "mappings_manual": by_method(MappingMethod::Manual),
        "mappings_ai_suggested": by_method(MappingMethod::AiSuggested),
        "success_rate": job.success_rate(),
    });

    if !job.errors.is_empty() {
        summary["errors"] = json!(job.errors);
    }
    if !job.warnings.is_empty() {
        summary["warnings"] = json!(job.warnings);
    }

    summary
}

/// Summary of a mapping batch validation.
pub fn batch_summary(batch: &BatchValidation) -> Value {
    json!({
        "valid": batch.valid.len(),
        "invalid": batch.invalid.len(),
        "total_processed": batch.total_processed(),
        "success_rate": batch.success_rate(),
        "warning_count": batch.warnings.len(),
    })
}
