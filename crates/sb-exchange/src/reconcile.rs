//! Shared partial-failure policy for imports.
//!
//! Codecs only decide whether each candidate record is valid; aggregation
//! into an outcome happens here, once, for every format.

use crate::error::{ExchangeError, ImportFailure};
use sb_common::{ExchangeFormat, Session};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// The three mutually exclusive import outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    FullSuccess,
    PartialSuccess,
    TotalFailure,
}

/// Classify from success/failure counts.
///
/// Zero candidates is a full success (an empty document imports as an empty
/// list).
pub fn classify(successes: usize, failures: usize) -> Classification {
    if failures == 0 {
        Classification::FullSuccess
    } else if successes == 0 {
        Classification::TotalFailure
    } else {
        Classification::PartialSuccess
    }
}

/// Classify a sequence of per-record validity flags.
pub fn classify_flags<I: IntoIterator<Item = bool>>(flags: I) -> Classification {
    let (successes, failures) = flags.into_iter().fold((0, 0), |(ok, bad), valid| {
        if valid {
            (ok + 1, bad)
        } else {
            (ok, bad + 1)
        }
    });
    classify(successes, failures)
}

/// Why a single candidate record was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("record is not an object")]
    NotAnObject,

    #[error("datetime is missing")]
    MissingDatetime,

    #[error("datetime '{0}' is not a valid date-time")]
    InvalidDatetime(String),

    #[error("teaName is missing")]
    MissingTeaName,
}

/// Result of decoding an import.
#[derive(Debug)]
pub enum ImportOutcome {
    /// Every candidate was valid.
    Imported(Vec<Session>),
    /// Some candidates were dropped; `error` is always a partial-import error.
    Partial {
        sessions: Vec<Session>,
        error: ExchangeError,
    },
    /// Nothing usable; no sessions.
    Failed(ExchangeError),
}

impl ImportOutcome {
    /// Whole-import failure for `format`.
    pub fn failed(format: ExchangeFormat, failure: ImportFailure) -> Self {
        error!(format = %format, reason = %failure, "Import failed");
        ImportOutcome::Failed(ExchangeError::Import { format, failure })
    }

    pub fn classification(&self) -> Classification {
        match self {
            ImportOutcome::Imported(_) => Classification::FullSuccess,
            ImportOutcome::Partial { .. } => Classification::PartialSuccess,
            ImportOutcome::Failed(_) => Classification::TotalFailure,
        }
    }

    /// Sessions to keep, if any.
    pub fn sessions(&self) -> Option<&[Session]> {
        match self {
            ImportOutcome::Imported(sessions) | ImportOutcome::Partial { sessions, .. } => {
                Some(sessions)
            }
            ImportOutcome::Failed(_) => None,
        }
    }

    pub fn into_sessions(self) -> Option<Vec<Session>> {
        match self {
            ImportOutcome::Imported(sessions) | ImportOutcome::Partial { sessions, .. } => {
                Some(sessions)
            }
            ImportOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ExchangeError> {
        match self {
            ImportOutcome::Imported(_) => None,
            ImportOutcome::Partial { error, .. } | ImportOutcome::Failed(error) => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Imported(_))
    }
}

/// Partition candidates into kept sessions and rejections, then classify.
pub fn reconcile<I>(format: ExchangeFormat, candidates: I) -> ImportOutcome
where
    I: IntoIterator<Item = Result<Session, RejectReason>>,
{
    let mut sessions = Vec::new();
    let mut rejected = 0usize;

    for (index, candidate) in candidates.into_iter().enumerate() {
        match candidate {
            Ok(session) => sessions.push(session),
            Err(reason) => {
                rejected += 1;
                debug!(format = %format, record = index + 1, reason = %reason, "Record rejected");
            }
        }
    }

    let total = sessions.len() + rejected;
    match classify(sessions.len(), rejected) {
        Classification::FullSuccess => {
            info!(format = %format, sessions = total, "Import decoded");
            ImportOutcome::Imported(sessions)
        }
        Classification::PartialSuccess => {
            warn!(
                format = %format,
                kept = sessions.len(),
                rejected,
                "Some records were invalid and skipped during import"
            );
            ImportOutcome::Partial {
                sessions,
                error: ExchangeError::PartialImport {
                    format,
                    rejected,
                    total,
                },
            }
        }
        Classification::TotalFailure => {
            ImportOutcome::failed(format, ImportFailure::AllRecordsInvalid(rejected))
        }
    }
}
