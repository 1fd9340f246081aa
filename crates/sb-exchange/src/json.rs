//! Document (JSON) session codec.
//!
//! Export is the filtered session list pretty-printed with two-space
//! indentation. Import accepts any array of session-shaped objects and
//! validates each element on its own. Custom field names are brought into
//! `custom-` form on the way in, so a document session survives a later
//! table export.

use crate::codec::SessionCodec;
use crate::error::{ExchangeError, ExportFailure, ImportFailure, Result};
use crate::reconcile::{reconcile, ImportOutcome, RejectReason};
use sb_common::{normalize_local, CustomField, ExchangeFormat, Session, StaticField};
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

/// Optional static fields: strings kept, numbers and booleans rendered as
/// text, anything else empty.
fn text_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn non_blank(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

fn steeps_from(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(non_blank)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn custom_fields_from(value: Option<&Value>) -> Vec<CustomField> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let name = item.get("name").and_then(non_blank)?;
                    let value = item.get("value").and_then(non_blank)?;
                    Some(CustomField::new(name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn session_from_object(map: &Map<String, Value>) -> std::result::Result<Session, RejectReason> {
    let datetime = match map.get(StaticField::Datetime.name()) {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        None | Some(Value::Null) | Some(Value::String(_)) => {
            return Err(RejectReason::MissingDatetime)
        }
        Some(other) => return Err(RejectReason::InvalidDatetime(other.to_string())),
    };
    let datetime =
        normalize_local(datetime).ok_or_else(|| RejectReason::InvalidDatetime(datetime.clone()))?;

    let tea_name = match map.get(StaticField::TeaName.name()) {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(RejectReason::MissingTeaName),
    };

    let mut session = Session::new(datetime, tea_name);
    for field in StaticField::ALL.into_iter().filter(|f| !f.is_required()) {
        session.set_field(field, text_value(map.get(field.name())));
    }
    session.steeps = steeps_from(map.get("steeps"));
    session.custom_fields = custom_fields_from(map.get("customFields"));
    Ok(session.canonical())
}

fn session_from_value(value: Value) -> std::result::Result<Session, RejectReason> {
    match value {
        Value::Object(map) => session_from_object(&map),
        _ => Err(RejectReason::NotAnObject),
    }
}

impl SessionCodec for JsonCodec {
    fn format(&self) -> ExchangeFormat {
        ExchangeFormat::Json
    }

    fn encode(&self, sessions: &[Session]) -> Result<String> {
        let cleaned: Vec<Session> = sessions.iter().map(Session::canonical).collect();
        serde_json::to_string_pretty(&cleaned).map_err(|e| ExchangeError::Export {
            format: self.format(),
            source: ExportFailure::Serialize(e),
        })
    }

    fn decode(&self, text: &str) -> ImportOutcome {
        let format = self.format();
        if text.trim().is_empty() {
            return ImportOutcome::failed(format, ImportFailure::Empty);
        }

        let document: Value = match serde_json::from_str(text) {
            Ok(document) => document,
            Err(e) => return ImportOutcome::failed(format, ImportFailure::Malformed(e.to_string())),
        };

        let Value::Array(items) = document else {
            return ImportOutcome::failed(format, ImportFailure::NotASequence);
        };
        debug!(elements = items.len(), "Decoding session document");

        reconcile(format, items.into_iter().map(session_from_value))
    }
}
