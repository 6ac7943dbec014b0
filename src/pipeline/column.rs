//! Column specs and the transform catalog.

use serde::{Deserialize, Serialize};

use crate::data::{field_kind, FieldKind};

use super::error::ConfigurationError;

/// The closed set of per-column feature transforms.
///
/// Categorical encodings apply to text columns, normalizations to
/// numeric columns, and `None` passes a numeric column through
/// untouched. The pairing is checked when a spec is bound against the
/// record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    /// Pass the (numeric) column through untouched.
    None,
    /// One indicator feature per distinct category.
    OneHotEncoding,
    /// Indicator features over a fixed hashed bucket space.
    OneHotHashEncoding,
    /// Rescale to zero mean, unit variance (training-split statistics).
    NormalizeMeanVariance,
    /// Rescale to [0, 1] (training-split minimum and maximum).
    NormalizeMinMax,
}

/// One feature column and the transform to apply to it.
///
/// A spec starts unvalidated; [`crate::pipeline::PipelineBuilder`]
/// binds it against the record schema, which is where unknown names
/// and invalid transform/type pairings are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub transform: Transform,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }

    /// Match this spec against the record schema.
    pub(crate) fn bind(&self) -> Result<BoundColumn, ConfigurationError> {
        let kind = field_kind(&self.name).ok_or_else(|| ConfigurationError::UnknownColumn {
            name: self.name.clone(),
        })?;

        let valid = match self.transform {
            Transform::OneHotEncoding | Transform::OneHotHashEncoding => kind == FieldKind::Text,
            Transform::NormalizeMeanVariance | Transform::NormalizeMinMax | Transform::None => {
                kind == FieldKind::Numeric
            }
        };
        if !valid {
            return Err(ConfigurationError::InvalidTransform {
                column: self.name.clone(),
                transform: self.transform,
                kind,
            });
        }

        Ok(BoundColumn {
            name: self.name.clone(),
            kind,
            transform: self.transform,
        })
    }
}

/// A column spec successfully matched against the record schema.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundColumn {
    pub name: String,
    pub kind: FieldKind,
    pub transform: Transform,
}

/// The interactive model builder's shipped column configuration.
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("make", Transform::OneHotEncoding),
        ColumnSpec::new("model", Transform::OneHotEncoding),
        ColumnSpec::new("year", Transform::NormalizeMinMax),
        ColumnSpec::new("mileage", Transform::NormalizeMeanVariance),
        ColumnSpec::new("engine", Transform::OneHotEncoding),
        ColumnSpec::new("fuel", Transform::OneHotEncoding),
    ]
}
