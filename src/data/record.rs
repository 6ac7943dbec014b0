//! Listing record and schema definitions.
//!
//! A [`Record`] is one car listing. The schema is fixed: seven fields,
//! of which [`LABEL_COLUMN`] (`price`) is the regression target and the
//! remaining six are candidate feature columns.

use serde::{Deserialize, Serialize};

/// Name of the label column.
pub const LABEL_COLUMN: &str = "price";

/// Logical type of a record field.
///
/// The kind decides which column transforms are semantically valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form text (categorical candidate).
    Text,
    /// Continuous numeric value.
    Numeric,
}

/// The fixed record schema, in file column order.
pub const RECORD_FIELDS: [(&str, FieldKind); 7] = [
    ("make", FieldKind::Text),
    ("model", FieldKind::Text),
    ("price", FieldKind::Numeric),
    ("year", FieldKind::Numeric),
    ("mileage", FieldKind::Numeric),
    ("engine", FieldKind::Text),
    ("fuel", FieldKind::Text),
];

/// Look up the kind of a schema field by name.
pub fn field_kind(name: &str) -> Option<FieldKind> {
    RECORD_FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, kind)| *kind)
}

/// One car listing.
///
/// Immutable once loaded; the loader owns construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub make: String,
    pub model: String,
    pub price: f32,
    pub year: f32,
    pub mileage: f32,
    pub engine: String,
    pub fuel: String,
}

/// A borrowed view of one record field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f32),
}

impl Record {
    /// Access a field by schema name.
    ///
    /// Returns `None` for names outside [`RECORD_FIELDS`].
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "make" => Some(FieldValue::Text(&self.make)),
            "model" => Some(FieldValue::Text(&self.model)),
            "price" => Some(FieldValue::Number(self.price)),
            "year" => Some(FieldValue::Number(self.year)),
            "mileage" => Some(FieldValue::Number(self.mileage)),
            "engine" => Some(FieldValue::Text(&self.engine)),
            "fuel" => Some(FieldValue::Text(&self.fuel)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_are_unique() {
        for (i, (a, _)) in RECORD_FIELDS.iter().enumerate() {
            for (b, _) in RECORD_FIELDS.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn field_kind_matches_schema() {
        assert_eq!(field_kind("make"), Some(FieldKind::Text));
        assert_eq!(field_kind("mileage"), Some(FieldKind::Numeric));
        assert_eq!(field_kind("colour"), None);
    }

    #[test]
    fn field_access_covers_all_schema_names() {
        let record = Record {
            make: "bmw".into(),
            model: "320d".into(),
            price: 45_000.0,
            year: 2014.0,
            mileage: 150_000.0,
            engine: "2.0".into(),
            fuel: "Diesel".into(),
        };
        for (name, kind) in RECORD_FIELDS {
            let value = record.field(name).expect("schema field must resolve");
            match (kind, value) {
                (FieldKind::Text, FieldValue::Text(_)) => {}
                (FieldKind::Numeric, FieldValue::Number(_)) => {}
                (kind, value) => panic!("{name}: kind {kind:?} produced {value:?}"),
            }
        }
    }
}
