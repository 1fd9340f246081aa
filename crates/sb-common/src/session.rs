//! The canonical session record and field classification.
//!
//! Both exchange codecs enumerate columns/keys from [`StaticField::ALL`], so
//! the order declared here is the on-disk contract: new fields are appended,
//! existing ones are never reordered.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// Prefix of steep slot columns/keys (`steep-1`, `steep-2`, ...).
pub const STEEP_PREFIX: &str = "steep-";

/// Prefix of custom field keys produced by the session form.
pub const CUSTOM_PREFIX: &str = "custom-";

/// Required field names, `datetime` first.
pub const REQUIRED_FIELDS: [&str; 2] = ["datetime", "teaName"];

/// Static field names in export order: required fields, then optional ones.
pub const STATIC_FIELDS: [&str; 9] = [
    "datetime",
    "teaName",
    "brewingVessel",
    "teaProducer",
    "origin",
    "purchaseLocation",
    "dryLeaf",
    "wetLeaf",
    "additionalNotes",
];

/// A schema-known session attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticField {
    Datetime,
    TeaName,
    BrewingVessel,
    TeaProducer,
    Origin,
    PurchaseLocation,
    DryLeaf,
    WetLeaf,
    AdditionalNotes,
}

impl StaticField {
    /// All static fields in export order.
    pub const ALL: [StaticField; 9] = [
        StaticField::Datetime,
        StaticField::TeaName,
        StaticField::BrewingVessel,
        StaticField::TeaProducer,
        StaticField::Origin,
        StaticField::PurchaseLocation,
        StaticField::DryLeaf,
        StaticField::WetLeaf,
        StaticField::AdditionalNotes,
    ];

    /// Serialized name (column header / document key).
    pub fn name(self) -> &'static str {
        match self {
            StaticField::Datetime => "datetime",
            StaticField::TeaName => "teaName",
            StaticField::BrewingVessel => "brewingVessel",
            StaticField::TeaProducer => "teaProducer",
            StaticField::Origin => "origin",
            StaticField::PurchaseLocation => "purchaseLocation",
            StaticField::DryLeaf => "dryLeaf",
            StaticField::WetLeaf => "wetLeaf",
            StaticField::AdditionalNotes => "additionalNotes",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            StaticField::Datetime => "Date & Time",
            StaticField::TeaName => "Tea Name",
            StaticField::BrewingVessel => "Brewing Vessel",
            StaticField::TeaProducer => "Producer",
            StaticField::Origin => "Origin",
            StaticField::PurchaseLocation => "Purchase Location",
            StaticField::DryLeaf => "Dry Leaf",
            StaticField::WetLeaf => "Wet Leaf",
            StaticField::AdditionalNotes => "Additional Notes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        StaticField::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn is_required(self) -> bool {
        matches!(self, StaticField::Datetime | StaticField::TeaName)
    }
}

impl fmt::Display for StaticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of a column header or form key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Static(StaticField),
    /// `steep-*`: appended to the steep list in encounter order.
    Steep,
    /// `custom-*`: appended to the custom field list under its full name.
    Custom,
    /// Anything else; ignored on import.
    Unknown,
}

impl FieldKind {
    pub fn classify(name: &str) -> Self {
        if let Some(field) = StaticField::from_name(name) {
            FieldKind::Static(field)
        } else if name.starts_with(STEEP_PREFIX) {
            FieldKind::Steep
        } else if name.starts_with(CUSTOM_PREFIX) {
            FieldKind::Custom
        } else {
            FieldKind::Unknown
        }
    }
}

fn whitespace_runs() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern compiles"))
}

/// Canonical custom field name for a label or a raw imported name.
///
/// `"Water Temperature"` becomes `custom-water-temperature`. A name already
/// in `custom-` form is only lowercased and slugged, so the mapping is
/// idempotent. The result always classifies as [`FieldKind::Custom`], even
/// for labels such as `teaName` or `steep-1`. Blank input has no key.
pub fn custom_field_key(label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let slug = whitespace_runs()
        .replace_all(&label.to_lowercase(), "-")
        .into_owned();
    if slug.len() > CUSTOM_PREFIX.len() && slug.starts_with(CUSTOM_PREFIX) {
        Some(slug)
    } else {
        Some(format!("{CUSTOM_PREFIX}{slug}"))
    }
}

/// A user-defined `{name, value}` pair attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    pub value: String,
}

impl CustomField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One recorded tea-brewing event.
///
/// Sessions have no identity of their own: within a session list they are
/// addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub datetime: String,
    pub tea_name: String,
    #[serde(default)]
    pub brewing_vessel: String,
    #[serde(default)]
    pub tea_producer: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub purchase_location: String,
    #[serde(default)]
    pub dry_leaf: String,
    #[serde(default)]
    pub wet_leaf: String,
    #[serde(default)]
    pub additional_notes: String,
    /// Steep notes in brewing order.
    #[serde(default)]
    pub steeps: Vec<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl Session {
    /// Create a session with the required fields set and everything else empty.
    pub fn new(datetime: impl Into<String>, tea_name: impl Into<String>) -> Self {
        Self {
            datetime: datetime.into(),
            tea_name: tea_name.into(),
            ..Self::default()
        }
    }

    pub fn field(&self, field: StaticField) -> &str {
        match field {
            StaticField::Datetime => &self.datetime,
            StaticField::TeaName => &self.tea_name,
            StaticField::BrewingVessel => &self.brewing_vessel,
            StaticField::TeaProducer => &self.tea_producer,
            StaticField::Origin => &self.origin,
            StaticField::PurchaseLocation => &self.purchase_location,
            StaticField::DryLeaf => &self.dry_leaf,
            StaticField::WetLeaf => &self.wet_leaf,
            StaticField::AdditionalNotes => &self.additional_notes,
        }
    }

    pub fn field_mut(&mut self, field: StaticField) -> &mut String {
        match field {
            StaticField::Datetime => &mut self.datetime,
            StaticField::TeaName => &mut self.tea_name,
            StaticField::BrewingVessel => &mut self.brewing_vessel,
            StaticField::TeaProducer => &mut self.tea_producer,
            StaticField::Origin => &mut self.origin,
            StaticField::PurchaseLocation => &mut self.purchase_location,
            StaticField::DryLeaf => &mut self.dry_leaf,
            StaticField::WetLeaf => &mut self.wet_leaf,
            StaticField::AdditionalNotes => &mut self.additional_notes,
        }
    }

    pub fn set_field(&mut self, field: StaticField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Builder-style setter.
    pub fn with_field(mut self, field: StaticField, value: impl Into<String>) -> Self {
        self.set_field(field, value);
        self
    }

    pub fn with_steep(mut self, steep: impl Into<String>) -> Self {
        self.steeps.push(steep.into());
        self
    }

    pub fn with_custom_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.push(CustomField::new(name, value));
        self
    }

    /// Value of the first custom field with this exact name.
    pub fn custom_value(&self, name: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Clone with empty steeps and empty-valued custom fields dropped.
    ///
    /// Applied at every export/import boundary. Idempotent.
    pub fn without_empty_entries(&self) -> Session {
        Session {
            steeps: self
                .steeps
                .iter()
                .filter(|steep| !steep.is_empty())
                .cloned()
                .collect(),
            custom_fields: self
                .custom_fields
                .iter()
                .filter(|field| !field.value.is_empty())
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Form in which sessions are stored and exchanged: empty entries
    /// dropped, custom names mapped through [`custom_field_key`], and only the
    /// first field kept for each name.
    ///
    /// Idempotent. Every stored or exported session passes through here, so
    /// a table column per custom name reproduces the session exactly.
    pub fn canonical(&self) -> Session {
        let mut session = self.without_empty_entries();
        let mut seen = HashSet::new();
        session.custom_fields = session
            .custom_fields
            .into_iter()
            .filter_map(|field| {
                let name = custom_field_key(&field.name)?;
                seen.insert(name.clone())
                    .then(|| CustomField::new(name, field.value))
            })
            .collect();
        session
    }

    /// Date portion of `datetime` (text before `T`), for summaries.
    pub fn date(&self) -> &str {
        self.datetime
            .split_once('T')
            .map_or(self.datetime.as_str(), |(date, _)| date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_field_names_match_table() {
        let names: Vec<_> = StaticField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, STATIC_FIELDS);
        assert_eq!(&STATIC_FIELDS[..2], &REQUIRED_FIELDS);
    }

    #[test]
    fn required_fields_lead() {
        let required: Vec<_> = StaticField::ALL
            .iter()
            .take_while(|f| f.is_required())
            .map(|f| f.name())
            .collect();
        assert_eq!(required, REQUIRED_FIELDS);
        assert!(StaticField::ALL[2..].iter().all(|f| !f.is_required()));
    }

    #[test]
    fn classify_fields() {
        assert_eq!(
            FieldKind::classify("teaName"),
            FieldKind::Static(StaticField::TeaName)
        );
        assert_eq!(FieldKind::classify("steep-3"), FieldKind::Steep);
        assert_eq!(FieldKind::classify("custom-rating"), FieldKind::Custom);
        assert_eq!(FieldKind::classify("year"), FieldKind::Unknown);
        assert_eq!(FieldKind::classify("TeaName"), FieldKind::Unknown);
    }

    #[test]
    fn without_empty_entries_is_idempotent() {
        let session = Session::new("2024-01-01T10:00", "Dragon Well")
            .with_steep("Wash")
            .with_steep("")
            .with_steep("Floral")
            .with_custom_field("custom-rating", "9/10")
            .with_custom_field("custom-empty", "");

        let once = session.without_empty_entries();
        assert_eq!(once.steeps, vec!["Wash", "Floral"]);
        assert_eq!(once.custom_fields, vec![CustomField::new("custom-rating", "9/10")]);
        assert_eq!(once.without_empty_entries(), once);
        // source untouched
        assert_eq!(session.steeps.len(), 3);
    }

    #[test]
    fn serializes_in_static_field_order() {
        let session = Session::new("2024-01-01T10:00", "7542")
            .with_field(StaticField::TeaProducer, "Dayi")
            .with_steep("Wash");
        let json = serde_json::to_string(&session).unwrap();
        let mut last = 0;
        for name in STATIC_FIELDS.iter().chain(["steeps", "customFields"].iter()) {
            let pos = json.find(&format!("\"{name}\"")).unwrap();
            assert!(pos >= last, "{name} out of order in {json}");
            last = pos;
        }
    }

    #[test]
    fn deserialize_backfills_optional_fields() {
        let session: Session =
            serde_json::from_str(r#"{"datetime":"2024-01-01T10:00","teaName":"Test Tea"}"#)
                .unwrap();
        assert_eq!(session.brewing_vessel, "");
        assert_eq!(session.additional_notes, "");
        assert!(session.steeps.is_empty());
        assert!(session.custom_fields.is_empty());
    }

    #[test]
    fn deserialize_requires_required_fields() {
        let result: Result<Session, _> = serde_json::from_str(r#"{"teaName":"Test Tea"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn custom_value_finds_first_match() {
        let session = Session::new("2024-01-01T10:00", "x")
            .with_custom_field("custom-a", "1")
            .with_custom_field("custom-a", "2");
        assert_eq!(session.custom_value("custom-a"), Some("1"));
        assert_eq!(session.custom_value("custom-b"), None);
    }

    #[test]
    fn custom_keys_never_shadow_other_columns() {
        assert_eq!(
            custom_field_key("Water Temperature").as_deref(),
            Some("custom-water-temperature")
        );
        assert_eq!(custom_field_key(" Tea \t Pet ").as_deref(), Some("custom-tea-pet"));
        assert_eq!(custom_field_key("custom-rating").as_deref(), Some("custom-rating"));
        assert_eq!(custom_field_key("Custom-Rating").as_deref(), Some("custom-rating"));
        assert_eq!(custom_field_key("custom-").as_deref(), Some("custom-custom-"));
        assert_eq!(custom_field_key("  "), None);

        for name in ["teaName", "datetime", "steep-1", "year"] {
            let key = custom_field_key(name).unwrap();
            assert_eq!(FieldKind::classify(&key), FieldKind::Custom, "{name} -> {key}");
            assert_eq!(custom_field_key(&key), Some(key));
        }
    }

    #[test]
    fn canonical_renames_and_dedupes_custom_fields() {
        let session = Session::new("2024-01-01T10:00", "Dragon Well")
            .with_steep("")
            .with_steep("Floral")
            .with_custom_field("teaName", "Hijacked")
            .with_custom_field("Water Temperature", "80C")
            .with_custom_field("custom-water-temperature", "85C")
            .with_custom_field("   ", "orphan")
            .with_custom_field("custom-empty", "");

        let canonical = session.canonical();
        assert_eq!(canonical.tea_name, "Dragon Well");
        assert_eq!(canonical.steeps, vec!["Floral"]);
        assert_eq!(
            canonical.custom_fields,
            vec![
                CustomField::new("custom-teaname", "Hijacked"),
                CustomField::new("custom-water-temperature", "80C"),
            ]
        );
        assert_eq!(canonical.canonical(), canonical);
    }

    #[test]
    fn date_portion() {
        assert_eq!(Session::new("2024-01-01T10:00", "x").date(), "2024-01-01");
        assert_eq!(Session::new("2024-01-01", "x").date(), "2024-01-01");
    }
}
