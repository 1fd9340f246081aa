//! Session assembly from form entries.
//!
//! A form is an ordered list of `(key, value)` pairs. Static field names fill
//! the matching field, `steep-*` keys append steeps in entry order, and
//! `custom-*` keys append custom fields named by the key. Anything else is
//! ignored.

use sb_common::{now_local_string, FieldKind, Session, StaticField, CUSTOM_PREFIX, STEEP_PREFIX};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("custom field label is empty")]
    EmptyLabel,

    #[error("expected LABEL=VALUE, got '{0}'")]
    MissingValue(String),
}

/// Field key for a user-entered custom field label.
///
/// `"Water Temperature"` becomes `custom-water-temperature`.
pub fn custom_field_key(label: &str) -> Result<String, FormError> {
    sb_common::custom_field_key(label).ok_or(FormError::EmptyLabel)
}

/// Display label for a custom field name: `custom-water-temperature` becomes
/// `Water temperature`.
pub fn custom_field_label(name: &str) -> String {
    let spaced = name
        .strip_prefix(CUSTOM_PREFIX)
        .unwrap_or(name)
        .replace('-', " ")
        .to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a `LABEL=VALUE` pair into a custom field key and value.
pub fn parse_custom_entry(entry: &str) -> Result<(String, String), FormError> {
    let (label, value) = entry
        .split_once('=')
        .ok_or_else(|| FormError::MissingValue(entry.to_string()))?;
    Ok((custom_field_key(label)?, value.to_string()))
}

/// Build a session from ordered form entries.
///
/// No validation happens here; callers check the datetime before storing.
pub fn session_from_entries<I, K, V>(entries: I) -> Session
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut session = Session::default();
    for (key, value) in entries {
        let key = key.as_ref();
        match FieldKind::classify(key) {
            FieldKind::Static(field) => session.set_field(field, value),
            FieldKind::Steep => session.steeps.push(value.into()),
            FieldKind::Custom => session = session.with_custom_field(key, value),
            FieldKind::Unknown => {}
        }
    }
    session
}

/// Entries that reproduce `session` through [`session_from_entries`], in
/// form order. Used to prefill an edit.
pub fn entries_for(session: &Session) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = StaticField::ALL
        .iter()
        .map(|field| (field.name().to_string(), session.field(*field).to_string()))
        .collect();
    entries.extend(
        session
            .steeps
            .iter()
            .enumerate()
            .map(|(i, steep)| (format!("{STEEP_PREFIX}{}", i + 1), steep.clone())),
    );
    entries.extend(
        session
            .custom_fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone())),
    );
    entries
}

/// Initial datetime for a fresh form.
pub fn default_datetime() -> String {
    now_local_string()
}
