//! Tabular (CSV) session codec.
//!
//! Export writes one header row (static fields, `steep-1..N`, custom field
//! names) and one row per session. Import maps columns back by header name;
//! static fields missing from an older file's header come back as empty
//! strings.

use crate::codec::SessionCodec;
use crate::error::{ImportFailure, Result};
use crate::reconcile::{reconcile, ImportOutcome, RejectReason};
use crate::schema::TableSchema;
use crate::table::{parse_table, TableWriter};
use sb_common::{
    is_valid_datetime, CustomField, ExchangeFormat, FieldKind, Session, REQUIRED_FIELDS,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl CsvCodec {
    /// Encode without going through the trait (never fails).
    pub fn to_table(sessions: &[Session]) -> String {
        let cleaned: Vec<Session> = sessions.iter().map(Session::canonical).collect();
        let schema = TableSchema::infer(&cleaned);

        let mut writer = TableWriter::new();
        writer.write_record(schema.header());
        for session in &cleaned {
            writer.write_record(schema.row(session));
        }

        debug!(
            rows = cleaned.len(),
            columns = schema.width(),
            steep_columns = schema.max_steeps,
            custom_columns = schema.custom_names.len(),
            "Built session table"
        );
        writer.finish()
    }
}

fn session_from_row(header: &[String], kinds: &[FieldKind], row: Vec<String>) -> Session {
    let mut session = Session::default();
    for (index, cell) in row.into_iter().enumerate() {
        let Some(kind) = kinds.get(index) else {
            // cells past the header have no column name
            break;
        };
        match kind {
            FieldKind::Static(field) => session.set_field(*field, cell),
            FieldKind::Steep if !cell.is_empty() => session.steeps.push(cell),
            FieldKind::Custom if !cell.is_empty() => session
                .custom_fields
                .push(CustomField::new(header[index].clone(), cell)),
            _ => {}
        }
    }
    session
}

fn validate(session: Session) -> std::result::Result<Session, RejectReason> {
    if session.datetime.is_empty() {
        return Err(RejectReason::MissingDatetime);
    }
    if !is_valid_datetime(&session.datetime) {
        return Err(RejectReason::InvalidDatetime(session.datetime));
    }
    Ok(session.canonical())
}

impl SessionCodec for CsvCodec {
    fn format(&self) -> ExchangeFormat {
        ExchangeFormat::Csv
    }

    fn encode(&self, sessions: &[Session]) -> Result<String> {
        Ok(Self::to_table(sessions))
    }

    fn decode(&self, text: &str) -> ImportOutcome {
        let format = self.format();
        if text.trim().is_empty() {
            return ImportOutcome::failed(format, ImportFailure::Empty);
        }

        let records = match parse_table(text) {
            Ok(records) => records,
            Err(e) => return ImportOutcome::failed(format, ImportFailure::Malformed(e.to_string())),
        };

        let mut records = records.into_iter();
        let Some(header) = records.next() else {
            return ImportOutcome::failed(format, ImportFailure::Empty);
        };
        let rows: Vec<Vec<String>> = records.collect();
        if rows.is_empty() {
            return ImportOutcome::failed(format, ImportFailure::NoDataRows);
        }

        if let Some(missing) = REQUIRED_FIELDS
            .into_iter()
            .find(|required| !header.iter().any(|column| column.as_str() == *required))
        {
            return ImportOutcome::failed(format, ImportFailure::MissingRequiredColumn(missing));
        }

        let kinds: Vec<FieldKind> = header
            .iter()
            .map(|column| FieldKind::classify(column))
            .collect();
        debug!(columns = header.len(), rows = rows.len(), "Decoding session table");

        reconcile(
            format,
            rows.into_iter()
                .map(|row| validate(session_from_row(&header, &kinds, row))),
        )
    }
}
