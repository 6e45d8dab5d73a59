//! `skubridge-recon` — SKU-to-MSKU reconciliation engine.
//!
//! Pure engine crate: receives raw export rows plus a read-only catalog
//! snapshot, returns normalized sales records with traceable mapping
//! decisions. No UI, transport, or persistence dependencies.

pub mod canonical;
pub mod config;
pub mod engine;
pub mod error;
pub mod headers;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;
pub mod synth;

pub use config::IngestConfig;
pub use engine::{process_csv, process_rows, validate_mapping_batch, CancelToken, NoProgress, ProgressSink};
pub use error::{IngestError, RowValidationError};
pub use model::{BatchValidation, JobStatus, ProcessingJob, RawRow, SalesRecord, SkuMapping};
