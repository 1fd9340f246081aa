//! Steepbook common types: the session model, field schema, and messages.
//!
//! This crate provides foundational types shared by the exchange codecs and
//! the application core:
//! - The canonical [`Session`] record and its [`CustomField`] pairs
//! - Static field classification shared by every exchange format
//! - The canonical custom field naming rule
//! - Date-time validation and local-time normalization
//! - The user-facing message catalog
//! - Exchange format identifiers

pub mod datetime;
pub mod format;
pub mod message;
pub mod session;

pub use datetime::{is_valid_datetime, normalize_local, now_local_string, to_local_datetime_string};
pub use format::ExchangeFormat;
pub use message::Message;
pub use session::{
    custom_field_key, CustomField, FieldKind, Session, StaticField, CUSTOM_PREFIX,
    REQUIRED_FIELDS, STATIC_FIELDS, STEEP_PREFIX,
};
