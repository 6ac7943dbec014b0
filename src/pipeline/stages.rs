//! Fitted column-transform stages.
//!
//! A stage is the trained form of one column's transform: dictionaries
//! and normalization statistics are computed from the training split
//! when the pipeline is fitted, then applied unchanged to any record.
//!
//! Categorical stages have two output modes. With the trainer's
//! categorical-split handling enabled they emit a single
//! integer-coded feature the booster splits on category subsets;
//! otherwise they expand to indicator columns.

use std::collections::HashMap;

use crate::data::{FieldValue, RecordTable};
use crate::training::FeatureKind;

use super::column::{BoundColumn, Transform};

/// Bucket count for the hashed encoder (2^8). Bounds dimensionality at
/// the cost of collisions.
pub const HASH_BUCKETS: u32 = 1 << 8;

/// The trained form of one column transform.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedStage {
    /// Numeric pass-through.
    Identity,
    /// Dictionary encoding over the categories seen in training.
    OneHot {
        dictionary: Vec<String>,
        index: HashMap<String, u32>,
        as_codes: bool,
    },
    /// Hashed encoding over a fixed bucket space.
    OneHotHash { n_buckets: u32, as_codes: bool },
    /// Zero mean, unit variance rescaling.
    MeanVariance { mean: f32, inv_std: f32 },
    /// [0, 1] rescaling.
    MinMax { min: f32, inv_range: f32 },
}

impl FittedStage {
    /// Fit a stage for `column` on the training split.
    ///
    /// `as_codes` selects the categorical output mode (see module
    /// docs); it has no effect on numeric transforms.
    pub(crate) fn fit(column: &BoundColumn, train: &RecordTable, as_codes: bool) -> Self {
        match column.transform {
            Transform::None => FittedStage::Identity,
            Transform::OneHotEncoding => {
                let texts = train
                    .text_column(&column.name)
                    .expect("bound text column resolves");
                let mut dictionary = Vec::new();
                let mut index = HashMap::new();
                for value in texts {
                    if !index.contains_key(value) {
                        index.insert(value.to_owned(), dictionary.len() as u32);
                        dictionary.push(value.to_owned());
                    }
                }
                FittedStage::OneHot {
                    dictionary,
                    index,
                    as_codes,
                }
            }
            Transform::OneHotHashEncoding => FittedStage::OneHotHash {
                n_buckets: HASH_BUCKETS,
                as_codes,
            },
            Transform::NormalizeMeanVariance => {
                let values = train
                    .numeric_column(&column.name)
                    .expect("bound numeric column resolves");
                let n = values.len().max(1) as f64;
                let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
                let variance = values
                    .iter()
                    .map(|&v| {
                        let d = v as f64 - mean;
                        d * d
                    })
                    .sum::<f64>()
                    / n;
                let std = variance.sqrt();
                let inv_std = if std > 0.0 { 1.0 / std } else { 0.0 };
                FittedStage::MeanVariance {
                    mean: mean as f32,
                    inv_std: inv_std as f32,
                }
            }
            Transform::NormalizeMinMax => {
                let values = train
                    .numeric_column(&column.name)
                    .expect("bound numeric column resolves");
                let min = values.iter().copied().fold(f32::INFINITY, f32::min);
                let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let range = max - min;
                let inv_range = if range > 0.0 { 1.0 / range } else { 0.0 };
                FittedStage::MinMax { min, inv_range }
            }
        }
    }

    /// Number of features this stage emits.
    pub fn width(&self) -> usize {
        match self {
            FittedStage::Identity
            | FittedStage::MeanVariance { .. }
            | FittedStage::MinMax { .. } => 1,
            FittedStage::OneHot {
                dictionary,
                as_codes,
                ..
            } => {
                if *as_codes {
                    1
                } else {
                    dictionary.len()
                }
            }
            FittedStage::OneHotHash {
                n_buckets,
                as_codes,
            } => {
                if *as_codes {
                    1
                } else {
                    *n_buckets as usize
                }
            }
        }
    }

    /// Trainer-facing kind of each emitted feature.
    pub fn kinds(&self) -> Vec<FeatureKind> {
        match self {
            FittedStage::OneHot {
                dictionary,
                as_codes: true,
                ..
            } => vec![FeatureKind::Categorical {
                n_categories: dictionary.len() as u32,
            }],
            FittedStage::OneHotHash {
                n_buckets,
                as_codes: true,
            } => vec![FeatureKind::Categorical {
                n_categories: *n_buckets,
            }],
            _ => vec![FeatureKind::Numeric; self.width()],
        }
    }

    /// Names of the emitted features, derived from the column name.
    pub fn feature_names(&self, column: &str) -> Vec<String> {
        match self {
            FittedStage::Identity
            | FittedStage::MeanVariance { .. }
            | FittedStage::MinMax { .. } => vec![column.to_owned()],
            FittedStage::OneHot {
                dictionary,
                as_codes,
                ..
            } => {
                if *as_codes {
                    vec![column.to_owned()]
                } else {
                    dictionary
                        .iter()
                        .map(|category| format!("{column}={category}"))
                        .collect()
                }
            }
            FittedStage::OneHotHash {
                n_buckets,
                as_codes,
            } => {
                if *as_codes {
                    vec![column.to_owned()]
                } else {
                    (0..*n_buckets).map(|b| format!("{column}#{b}")).collect()
                }
            }
        }
    }

    /// Encode one field value into `out` (length must equal `width()`).
    pub(crate) fn encode(&self, value: FieldValue<'_>, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.width());
        match (self, value) {
            (FittedStage::Identity, FieldValue::Number(v)) => out[0] = v,
            (FittedStage::MeanVariance { mean, inv_std }, FieldValue::Number(v)) => {
                out[0] = (v - mean) * inv_std;
            }
            (FittedStage::MinMax { min, inv_range }, FieldValue::Number(v)) => {
                out[0] = (v - min) * inv_range;
            }
            (
                FittedStage::OneHot {
                    index, as_codes, ..
                },
                FieldValue::Text(s),
            ) => {
                if *as_codes {
                    // Unseen category: missing.
                    out[0] = index.get(s).map(|&c| c as f32).unwrap_or(f32::NAN);
                } else {
                    out.fill(0.0);
                    if let Some(&code) = index.get(s) {
                        out[code as usize] = 1.0;
                    }
                }
            }
            (
                FittedStage::OneHotHash {
                    n_buckets,
                    as_codes,
                },
                FieldValue::Text(s),
            ) => {
                let bucket = hash_bucket(s, *n_buckets);
                if *as_codes {
                    out[0] = bucket as f32;
                } else {
                    out.fill(0.0);
                    out[bucket as usize] = 1.0;
                }
            }
            _ => unreachable!("column binding guarantees the value kind"),
        }
    }
}

/// A bound column together with its fitted stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEncoder {
    pub(crate) column: BoundColumn,
    pub(crate) stage: FittedStage,
}

impl ColumnEncoder {
    pub fn column_name(&self) -> &str {
        &self.column.name
    }

    pub fn stage(&self) -> &FittedStage {
        &self.stage
    }

    pub(crate) fn encode_record(&self, record: &crate::data::Record, out: &mut [f32]) {
        let value = record
            .field(&self.column.name)
            .expect("bound column resolves on every record");
        self.stage.encode(value, out);
    }
}

/// FNV-1a over the category text, folded into the bucket space.
fn hash_bucket(s: &str, n_buckets: u32) -> u32 {
    let mut hash = 0x811c_9dc5u32;
    for &byte in s.as_bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash % n_buckets
}
