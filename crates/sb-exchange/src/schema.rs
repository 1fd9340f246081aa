//! Column set inference for the session table.
//!
//! Pure function of the (already filtered) session list, recomputed on every
//! export.

use sb_common::{Session, StaticField, STATIC_FIELDS, STEEP_PREFIX};
use std::collections::HashSet;

/// Dynamic part of the table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    /// Number of `steep-N` columns.
    pub max_steeps: usize,
    /// Distinct custom field names, first-seen order.
    pub custom_names: Vec<String>,
}

impl TableSchema {
    pub fn infer(sessions: &[Session]) -> Self {
        let max_steeps = sessions
            .iter()
            .map(|session| session.steeps.len())
            .max()
            .unwrap_or(0);

        let mut seen = HashSet::new();
        let custom_names = sessions
            .iter()
            .flat_map(|session| session.custom_fields.iter())
            .filter(|field| seen.insert(field.name.as_str()))
            .map(|field| field.name.clone())
            .collect();

        Self {
            max_steeps,
            custom_names,
        }
    }

    /// Header row: static fields, then steep columns, then custom names.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.width());
        header.extend(STATIC_FIELDS.iter().map(|name| name.to_string()));
        header.extend((1..=self.max_steeps).map(|n| format!("{STEEP_PREFIX}{n}")));
        header.extend(self.custom_names.iter().cloned());
        header
    }

    pub fn width(&self) -> usize {
        STATIC_FIELDS.len() + self.max_steeps + self.custom_names.len()
    }

    /// Cells for one session, aligned with [`TableSchema::header`].
    pub fn row<'a>(&'a self, session: &'a Session) -> Vec<&'a str> {
        let mut row = Vec::with_capacity(self.width());
        row.extend(StaticField::ALL.iter().map(|field| session.field(*field)));
        row.extend(
            (0..self.max_steeps).map(|i| session.steeps.get(i).map_or("", String::as_str)),
        );
        row.extend(
            self.custom_names
                .iter()
                .map(|name| session.custom_value(name).unwrap_or("")),
        );
        row
    }
}
