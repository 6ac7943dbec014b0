//! Record container with typed column access.

use super::record::{FieldKind, Record, LABEL_COLUMN};

/// An immutable batch of listing records.
///
/// Columns are accessed by schema name and come back typed: text
/// columns as borrowed strings, numeric columns as `f32`. Feature
/// stages fit against these views; the table itself never changes
/// after construction.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: Vec<Record>,
}

impl RecordTable {
    /// Wrap a batch of records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn n_rows(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the underlying records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Text column by schema name, `None` if the name is not a text field.
    pub fn text_column(&self, name: &str) -> Option<Vec<&str>> {
        if super::record::field_kind(name)? != FieldKind::Text {
            return None;
        }
        Some(
            self.records
                .iter()
                .map(|r| match r.field(name) {
                    Some(super::record::FieldValue::Text(s)) => s,
                    _ => unreachable!("kind checked above"),
                })
                .collect(),
        )
    }

    /// Numeric column by schema name, `None` if the name is not numeric.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f32>> {
        if super::record::field_kind(name)? != FieldKind::Numeric {
            return None;
        }
        Some(
            self.records
                .iter()
                .map(|r| match r.field(name) {
                    Some(super::record::FieldValue::Number(v)) => v,
                    _ => unreachable!("kind checked above"),
                })
                .collect(),
        )
    }

    /// The label column (`price`) for every record.
    pub fn labels(&self) -> Vec<f32> {
        self.numeric_column(LABEL_COLUMN)
            .expect("label column is part of the fixed schema")
    }

    /// A new table holding the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }
}
