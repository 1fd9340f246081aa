//! Session exchange for steepbook.
//!
//! This crate moves session lists in and out of the application through two
//! interchangeable formats:
//! - `csv`: a comma-delimited table whose columns are derived from the
//!   session list (static fields, `steep-1..N`, custom field names)
//! - `json`: an indented array of session objects
//!
//! # Import Policy
//!
//! Both decoders build one candidate per row/element and hand the candidates
//! to the shared reconciler, which yields exactly one of:
//! - full success: every record valid
//! - partial success: the valid subset plus a partial-import error
//! - total failure: no sessions, an import error
//!
//! Structural problems (empty input, unparsable text, missing required
//! header, no data rows, non-array document) fail the whole import up front.
//!
//! # Example
//!
//! ```no_run
//! use sb_common::Session;
//! use sb_exchange::{export_sessions, CsvCodec, MemorySink, SessionCodec};
//!
//! let sessions = vec![Session::new("2024-01-01T10:00", "Dragon Well").with_steep("Grassy")];
//! let mut sink = MemorySink::default();
//! export_sessions(&CsvCodec, &sessions, &mut sink).unwrap();
//!
//! let outcome = CsvCodec.decode(&sink.deliveries()[0].content);
//! assert_eq!(outcome.sessions().map(|s| s.len()), Some(1));
//! ```

pub mod codec;
pub mod csv;
pub mod error;
pub mod json;
pub mod reconcile;
pub mod schema;
pub mod sink;
pub mod table;

pub use codec::{codec_for, export_sessions, import_bytes, SessionCodec};
pub use csv::CsvCodec;
pub use error::{ExchangeError, ExportFailure, ImportFailure, Result};
pub use json::JsonCodec;
pub use reconcile::{classify, classify_flags, reconcile, Classification, ImportOutcome, RejectReason};
pub use schema::TableSchema;
pub use sink::{Delivery, DirectorySink, ExportSink, MemorySink};
pub use table::{parse_table, TableError, TableWriter};
