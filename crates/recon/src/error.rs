use std::fmt;

/// File- or config-level failure. Fails the whole operation; row-level
/// problems never escalate to this.
#[derive(Debug)]
pub enum IngestError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, unknown field alias, etc.).
    ConfigValidation(String),
    /// CSV structurally unreadable.
    Csv(String),
    /// File parsed but contains zero data rows.
    EmptyFile,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV parse error: {msg}"),
            Self::EmptyFile => write!(f, "file contains no data rows"),
        }
    }
}

impl std::error::Error for IngestError {}

/// One row failed validation. Carries every violated requirement, not just
/// the first, so the caller sees all problems in one pass. The row is
/// skipped; the batch continues.
#[derive(Debug)]
pub struct RowValidationError {
    pub problems: Vec<String>,
}

impl fmt::Display for RowValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.problems.join("; "))
    }
}

impl std::error::Error for RowValidationError {}
