//! Batch orchestration: drives the per-row pipeline across a file.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use skubridge_core::{Catalog, Marketplace};

use crate::canonical::{expand_combo, is_valid_sku};
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::headers;
use crate::matcher;
use crate::model::{BatchValidation, JobStatus, ProcessingJob, RawRow, SkuMapping};
use crate::normalize::normalize;

// ---------------------------------------------------------------------------
// Progress + cancellation
// ---------------------------------------------------------------------------

/// Observer invoked after every row, successful or not. Decoupled from any
/// UI: a caller can forward to a channel, a progress bar, or nothing.
pub trait ProgressSink {
    fn on_progress(&mut self, processed: usize, total: usize, progress: u8);
}

/// No-op sink for callers that don't observe progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _processed: usize, _total: usize, _progress: u8) {}
}

/// Shared cancellation flag, checked between rows (never mid-row). Cloning
/// shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// File parsing
// ---------------------------------------------------------------------------

/// Parse CSV text into raw rows. Headers are trimmed; fully blank rows are
/// dropped. Zero surviving data rows is a file-level error.
pub fn parse_rows(csv_text: &str) -> Result<Vec<RawRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::Csv(e.to_string()))?;
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            row.push(header.clone(), record.get(i).unwrap_or(""));
        }
        if !row.is_blank() {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Batch processing
// ---------------------------------------------------------------------------

/// Parse and process a whole CSV export. File-level parse failures surface
/// as `Err`; row-level problems are recorded in the job and never abort it.
pub fn process_csv(
    csv_text: &str,
    marketplace: Marketplace,
    catalog: &Catalog,
    config: &IngestConfig,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<ProcessingJob, IngestError> {
    let rows = parse_rows(csv_text)?;
    Ok(process_rows(&rows, marketplace, catalog, config, sink, cancel))
}

/// Process pre-parsed rows in input order. One logical sequence: rows are
/// never processed concurrently within a job, and the catalog is a
/// read-only snapshot for the whole call.
pub fn process_rows(
    rows: &[RawRow],
    marketplace: Marketplace,
    catalog: &Catalog,
    config: &IngestConfig,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> ProcessingJob {
    let mut job = ProcessingJob::new(marketplace, rows.len());
    // One mapping per distinct original SKU within the job.
    let mut mapped: HashMap<String, usize> = HashMap::new();
    let processed_at = chrono::Utc::now().naive_utc();

    info!("processing {} rows for {marketplace}", rows.len());

    for (index, row) in rows.iter().enumerate() {
        if cancel.is_cancelled() {
            job.status = JobStatus::Failed;
            job.errors.push(format!(
                "Processing cancelled after {} of {} rows",
                job.records_processed, job.records_total
            ));
            warn!("job cancelled after {} rows", job.records_processed);
            return job;
        }

        let n = index + 1;
        let fields = headers::resolve(row, marketplace, config);

        match normalize(&fields, row, marketplace, n, processed_at) {
            Ok(mut record) => {
                let mut mskus = Vec::new();
                for component in expand_combo(&record.sku) {
                    let slot = match mapped.get(&component) {
                        Some(&i) => i,
                        None => {
                            let mapping = matcher::match_sku(&component, marketplace, catalog, config);
                            if mapping.confidence < config.thresholds.warn_confidence {
                                job.warnings.push(format!(
                                    "Row {n}: Low confidence mapping for SKU: {}",
                                    mapping.original_sku
                                ));
                            }
                            job.mappings.push(mapping);
                            mapped.insert(component.clone(), job.mappings.len() - 1);
                            job.mappings.len() - 1
                        }
                    };
                    mskus.push(job.mappings[slot].msku.clone());
                }
                record.attach_msku(mskus.join(","));
                job.records.push(record);
            }
            Err(e) => {
                for problem in e.problems {
                    job.errors.push(format!("Row {n}: {problem}"));
                }
            }
        }

        advance(&mut job, n, sink);
    }

    job.status = JobStatus::Completed;
    job.progress = 100;
    info!(
        "completed: {}/{} records, {} errors, {} warnings",
        job.records.len(),
        job.records_total,
        job.errors.len(),
        job.warnings.len()
    );
    job
}

fn advance(job: &mut ProcessingJob, processed: usize, sink: &mut dyn ProgressSink) {
    job.records_processed = processed;
    job.progress = ((processed as f64 / job.records_total as f64) * 100.0).round() as u8;
    sink.on_progress(processed, job.records_total, job.progress);
}

// ---------------------------------------------------------------------------
// Batch mapping validation
// ---------------------------------------------------------------------------

/// Partition mappings into structurally valid and invalid sets. Valid
/// mappings below the warn threshold get a warning string but stay valid —
/// low confidence is flagged, not rejected.
pub fn validate_mapping_batch(
    mappings: Vec<SkuMapping>,
    config: &IngestConfig,
) -> BatchValidation {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    let mut warnings = Vec::new();

    for mapping in mappings {
        if is_valid_sku(&mapping.original_sku, Some(mapping.marketplace)) {
            if mapping.confidence < config.thresholds.warn_confidence {
                warnings.push(format!(
                    "Low confidence mapping for SKU: {}",
                    mapping.original_sku
                ));
            }
            valid.push(mapping);
        } else {
            invalid.push(mapping);
        }
    }

    BatchValidation {
        valid,
        invalid,
        warnings,
    }
}
