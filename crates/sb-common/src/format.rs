//! Exchange format identifiers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized representations a session list can be exported to / imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeFormat {
    /// Comma-delimited table with a header row
    Csv,
    /// Indented array of session objects
    Json,
}

impl ExchangeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExchangeFormat::Csv => "csv",
            ExchangeFormat::Json => "json",
        }
    }

    /// Fixed download filename for exports.
    pub fn filename(self) -> &'static str {
        match self {
            ExchangeFormat::Csv => "steepbook_sessions.csv",
            ExchangeFormat::Json => "steepbook_sessions.json",
        }
    }

    /// Upper-case name used in user-facing text.
    pub fn label(self) -> &'static str {
        match self {
            ExchangeFormat::Csv => "CSV",
            ExchangeFormat::Json => "JSON",
        }
    }

    /// Guess the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExchangeFormat::Csv),
            "json" => Some(ExchangeFormat::Json),
            _ => None,
        }
    }
}

impl std::str::FromStr for ExchangeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExchangeFormat::Csv),
            "json" => Ok(ExchangeFormat::Json),
            _ => Err(format!("unknown exchange format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExchangeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
