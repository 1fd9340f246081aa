//! Applying a decoded import to the session book and store.
//!
//! - total failure: report the failure, touch nothing
//! - success: replace the book, persist, report success
//! - partial: replace the book with the valid subset, persist, report the
//!   partial-import message
//!
//! A save failure afterwards is reported on its own and does not roll back
//! the book.

use crate::book::SessionBook;
use crate::store::SessionStore;
use sb_common::Message;
use sb_exchange::{Classification, ImportOutcome};
use tracing::{error, info, warn};

/// Where user-facing messages go.
pub trait Notifier {
    fn success(&mut self, message: Message);
    fn failure(&mut self, message: Message);
}

/// Success on stdout, failures on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&mut self, message: Message) {
        println!("{message}");
    }

    fn failure(&mut self, message: Message) {
        eprintln!("{message}");
    }
}

/// Keeps every notification, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    notes: Vec<(bool, Message)>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<Message> {
        self.notes
            .iter()
            .filter(|(ok, _)| *ok)
            .map(|(_, message)| *message)
            .collect()
    }

    pub fn failures(&self) -> Vec<Message> {
        self.notes
            .iter()
            .filter(|(ok, _)| !*ok)
            .map(|(_, message)| *message)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&mut self, message: Message) {
        self.notes.push((true, message));
    }

    fn failure(&mut self, message: Message) {
        self.notes.push((false, message));
    }
}

/// What an import did to the book and store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub classification: Classification,
    /// Sessions now in the book from this import (0 on total failure).
    pub kept: usize,
    /// The new list reached the store.
    pub saved: bool,
}

pub fn apply_import(
    book: &mut SessionBook,
    store: &SessionStore,
    outcome: ImportOutcome,
    notifier: &mut dyn Notifier,
) -> ImportReport {
    let classification = outcome.classification();

    let (sessions, message) = match outcome {
        ImportOutcome::Failed(err) => {
            error!(error = %err, "Import rejected; sessions unchanged");
            notifier.failure(err.message());
            return ImportReport {
                classification,
                kept: 0,
                saved: false,
            };
        }
        ImportOutcome::Imported(sessions) => (sessions, None),
        ImportOutcome::Partial { sessions, error } => (sessions, Some(error.message())),
    };

    let kept = sessions.len();
    let replaced = book.replace_all(sessions);
    info!(kept, replaced = replaced.len(), "Session book replaced by import");

    match message {
        Some(partial) => notifier.failure(partial),
        None => notifier.success(Message::SessionImportSuccess),
    }

    let saved = match store.save(book.sessions()) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Imported sessions kept in memory but not saved");
            notifier.failure(e.message());
            false
        }
    };

    ImportReport {
        classification,
        kept,
        saved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_common::{ExchangeFormat, Session};
    use sb_exchange::{reconcile, ImportFailure, RejectReason};
    use tempfile::TempDir;

    fn tea(name: &str) -> Session {
        Session::new("2024-01-01T10:00", name)
    }

    #[test]
    fn failure_leaves_everything_alone() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let mut book = SessionBook::from_sessions(vec![tea("keep")]);
        let mut notes = RecordingNotifier::default();

        let outcome = ImportOutcome::failed(ExchangeFormat::Csv, ImportFailure::NoDataRows);
        let report = apply_import(&mut book, &store, outcome, &mut notes);

        assert_eq!(report.classification, Classification::TotalFailure);
        assert!(!report.saved);
        assert_eq!(book.len(), 1);
        assert!(!store.path().exists());
        assert_eq!(notes.failures(), vec![Message::CsvImportError]);
        assert!(notes.successes().is_empty());
    }

    #[test]
    fn success_replaces_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let mut book = SessionBook::from_sessions(vec![tea("old")]);
        let mut notes = RecordingNotifier::default();

        let outcome = reconcile(ExchangeFormat::Json, vec![Ok(tea("a")), Ok(tea("b"))]);
        let report = apply_import(&mut book, &store, outcome, &mut notes);

        assert_eq!(report.kept, 2);
        assert!(report.saved);
        assert_eq!(store.load().unwrap(), book.sessions());
        assert_eq!(notes.successes(), vec![Message::SessionImportSuccess]);
    }

    #[test]
    fn partial_keeps_subset_and_reports() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let mut book = SessionBook::new();
        let mut notes = RecordingNotifier::default();

        let outcome = reconcile(
            ExchangeFormat::Csv,
            vec![Ok(tea("a")), Err(RejectReason::MissingDatetime)],
        );
        let report = apply_import(&mut book, &store, outcome, &mut notes);

        assert_eq!(report.classification, Classification::PartialSuccess);
        assert_eq!(report.kept, 1);
        assert!(report.saved);
        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(notes.failures(), vec![Message::CsvImportErrorPartial]);
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = SessionStore::new(blocker.join("data"));
        let mut book = SessionBook::new();
        let mut notes = RecordingNotifier::default();

        let outcome = reconcile(ExchangeFormat::Json, vec![Ok(tea("a"))]);
        let report = apply_import(&mut book, &store, outcome, &mut notes);

        assert!(!report.saved);
        assert_eq!(book.len(), 1);
        assert_eq!(notes.successes(), vec![Message::SessionImportSuccess]);
        assert_eq!(notes.failures(), vec![Message::SessionSaveError]);
    }
}
