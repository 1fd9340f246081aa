//! Error types for session exchange.

use sb_common::{ExchangeFormat, Message};
use thiserror::Error;

/// Errors surfaced by the exchange codecs.
///
/// None of these are fatal to the application; each maps to a user-facing
/// [`Message`].
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Encoding or delivery failed; nothing was delivered.
    #[error("{} export failed: {source}", label(.format))]
    Export {
        format: ExchangeFormat,
        #[source]
        source: ExportFailure,
    },

    /// The whole import failed; no sessions are returned.
    #[error("{} import failed: {failure}", label(.format))]
    Import {
        format: ExchangeFormat,
        failure: ImportFailure,
    },

    /// Some records were rejected; the valid subset was kept.
    #[error("{} import skipped {rejected} of {total} records", label(.format))]
    PartialImport {
        format: ExchangeFormat,
        rejected: usize,
        total: usize,
    },
}

impl ExchangeError {
    pub fn format(&self) -> ExchangeFormat {
        match self {
            ExchangeError::Export { format, .. }
            | ExchangeError::Import { format, .. }
            | ExchangeError::PartialImport { format, .. } => *format,
        }
    }

    /// User-facing message for this error.
    pub fn message(&self) -> Message {
        match self {
            ExchangeError::Export { format, .. } => Message::export_error(*format),
            ExchangeError::Import { format, .. } => Message::import_error(*format),
            ExchangeError::PartialImport { format, .. } => Message::import_partial(*format),
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, ExchangeError::PartialImport { .. })
    }
}

/// Why an export did not complete.
#[derive(Error, Debug)]
pub enum ExportFailure {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not deliver {filename}: {source}")]
    Deliver {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a whole import was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportFailure {
    #[error("input is not UTF-8 text")]
    NotText,

    #[error("input is empty")]
    Empty,

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("header row has no data rows")]
    NoDataRows,

    #[error("header is missing required column '{0}'")]
    MissingRequiredColumn(&'static str),

    #[error("top-level value is not an array")]
    NotASequence,

    #[error("all {0} records were invalid")]
    AllRecordsInvalid(usize),
}

fn label(format: &ExchangeFormat) -> &'static str {
    format.label()
}

/// Result type alias for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
