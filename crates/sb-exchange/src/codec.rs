//! Format-independent codec interface and export/import entry points.

use crate::csv::CsvCodec;
use crate::error::{ExchangeError, ExportFailure, ImportFailure, Result};
use crate::json::JsonCodec;
use crate::reconcile::ImportOutcome;
use crate::sink::ExportSink;
use sb_common::{ExchangeFormat, Session};
use tracing::{error, info};

const BOM: &str = "\u{feff}";

/// A session list encoder/decoder for one exchange format.
pub trait SessionCodec {
    fn format(&self) -> ExchangeFormat;

    /// Encode sessions for export. Each session is reduced to
    /// [`Session::canonical`] form first; the caller's list is not modified.
    fn encode(&self, sessions: &[Session]) -> Result<String>;

    /// Decode import text into an outcome.
    fn decode(&self, text: &str) -> ImportOutcome;

    /// Decode raw file bytes. Non-UTF-8 input fails the whole import.
    fn decode_bytes(&self, bytes: &[u8]) -> ImportOutcome {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.decode(text.strip_prefix(BOM).unwrap_or(text)),
            Err(_) => ImportOutcome::failed(self.format(), ImportFailure::NotText),
        }
    }
}

pub fn codec_for(format: ExchangeFormat) -> Box<dyn SessionCodec> {
    match format {
        ExchangeFormat::Csv => Box::new(CsvCodec),
        ExchangeFormat::Json => Box::new(JsonCodec),
    }
}

/// Encode `sessions` and hand the result to `sink` under the format's
/// canonical filename.
pub fn export_sessions(
    codec: &dyn SessionCodec,
    sessions: &[Session],
    sink: &mut dyn ExportSink,
) -> Result<()> {
    let format = codec.format();
    let content = codec.encode(sessions)?;
    let filename = format.filename();

    sink.deliver(&content, filename, format).map_err(|source| {
        error!(format = %format, filename, error = %source, "Export delivery failed");
        ExchangeError::Export {
            format,
            source: ExportFailure::Deliver {
                filename: filename.to_string(),
                source,
            },
        }
    })?;

    info!(format = %format, sessions = sessions.len(), filename, "Sessions exported");
    Ok(())
}

pub fn import_bytes(format: ExchangeFormat, bytes: &[u8]) -> ImportOutcome {
    codec_for(format).decode_bytes(bytes)
}
