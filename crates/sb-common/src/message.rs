//! User-facing message catalog.
//!
//! Library code returns structured outcomes; the text a user sees comes from
//! here and nowhere else.

use crate::format::ExchangeFormat;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    SessionSaveSuccess,
    SessionUpdateSuccess,
    SessionSaveError,
    SessionDeleteSuccess,
    DeleteSessionConfirm,
    LocalStorageLoadError,
    SessionImportSuccess,
    SessionExportSuccess,
    ImportOverwriteConfirm,
    CsvExportError,
    CsvImportError,
    CsvImportErrorPartial,
    JsonExportError,
    JsonImportError,
    JsonImportErrorPartial,
}

impl Message {
    pub fn text(self) -> &'static str {
        match self {
            Message::SessionSaveSuccess => "Session saved successfully!",
            Message::SessionUpdateSuccess => "Session updated successfully!",
            Message::SessionSaveError => "Error saving session",
            Message::SessionDeleteSuccess => "Session deleted.",
            Message::DeleteSessionConfirm => "Are you sure you want to delete this session?",
            Message::LocalStorageLoadError => "Error loading sessions from local storage.",
            Message::SessionImportSuccess => "Sessions imported successfully!",
            Message::SessionExportSuccess => "Sessions exported successfully!",
            Message::ImportOverwriteConfirm => {
                "Importing will overwrite current sessions. Continue?"
            }
            Message::CsvExportError => "Error exporting sessions to CSV.",
            Message::CsvImportError => "Error importing sessions from CSV.",
            Message::CsvImportErrorPartial => {
                "Some sessions in the CSV file were invalid and were skipped."
            }
            Message::JsonExportError => "Error exporting sessions to JSON.",
            Message::JsonImportError => "Error importing sessions from JSON.",
            Message::JsonImportErrorPartial => {
                "Some sessions in the JSON file were invalid and were skipped."
            }
        }
    }

    /// Stable code name, e.g. `CSV_IMPORT_ERROR`.
    pub fn code_name(self) -> &'static str {
        match self {
            Message::SessionSaveSuccess => "SESSION_SAVE_SUCCESS",
            Message::SessionUpdateSuccess => "SESSION_UPDATE_SUCCESS",
            Message::SessionSaveError => "SESSION_SAVE_ERROR",
            Message::SessionDeleteSuccess => "SESSION_DELETE_SUCCESS",
            Message::DeleteSessionConfirm => "DELETE_SESSION_CONFIRM",
            Message::LocalStorageLoadError => "LOCAL_STORAGE_LOAD_ERROR",
            Message::SessionImportSuccess => "SESSION_IMPORT_SUCCESS",
            Message::SessionExportSuccess => "SESSION_EXPORT_SUCCESS",
            Message::ImportOverwriteConfirm => "IMPORT_OVERWRITE_CONFIRM",
            Message::CsvExportError => "CSV_EXPORT_ERROR",
            Message::CsvImportError => "CSV_IMPORT_ERROR",
            Message::CsvImportErrorPartial => "CSV_IMPORT_ERROR_PARTIAL",
            Message::JsonExportError => "JSON_EXPORT_ERROR",
            Message::JsonImportError => "JSON_IMPORT_ERROR",
            Message::JsonImportErrorPartial => "JSON_IMPORT_ERROR_PARTIAL",
        }
    }

    pub fn export_error(format: ExchangeFormat) -> Self {
        match format {
            ExchangeFormat::Csv => Message::CsvExportError,
            ExchangeFormat::Json => Message::JsonExportError,
        }
    }

    pub fn import_error(format: ExchangeFormat) -> Self {
        match format {
            ExchangeFormat::Csv => Message::CsvImportError,
            ExchangeFormat::Json => Message::JsonImportError,
        }
    }

    pub fn import_partial(format: ExchangeFormat) -> Self {
        match format {
            ExchangeFormat::Csv => Message::CsvImportErrorPartial,
            ExchangeFormat::Json => Message::JsonImportErrorPartial,
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
