//! Steepbook core library
//!
//! Everything the `steepbook` binary needs around the exchange codecs:
//! - The in-memory session book with positional identity and edit mode
//! - Form-entry assembly of sessions
//! - The file-backed session store
//! - Applying an import outcome to the book and store
//! - Configuration, logging and exit codes for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod book;
pub mod config;
pub mod exit_codes;
pub mod form;
pub mod import;
pub mod logging;
pub mod store;

pub use book::{BookError, SessionBook, SubmitOutcome};
pub use import::{apply_import, ImportReport, Notifier, RecordingNotifier, TerminalNotifier};
pub use store::{SessionStore, StoreError};
