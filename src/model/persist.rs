//! Model persistence.
//!
//! The on-disk artifact is a version-tagged payload serialized with
//! postcard. Payload structs mirror the runtime types with plain data;
//! new format versions add enum variants rather than changing existing
//! ones.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::DataError;
use crate::pipeline::{ColumnEncoder, ColumnSpec, FittedStage, Transform};
use crate::training::{Forest, Node, SplitKind, TrainerConfig, Tree};

use super::PriceModel;

// =============================================================================
// Payload
// =============================================================================

/// Version-tagged payload enum for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Payload {
    V1(PayloadV1),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PayloadV1 {
    feature_names: Vec<String>,
    config: TrainerConfig,
    encoders: Vec<EncoderPayload>,
    forest: ForestPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EncoderPayload {
    column: String,
    transform: Transform,
    stage: StagePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum StagePayload {
    Identity,
    OneHot {
        dictionary: Vec<String>,
        as_codes: bool,
    },
    OneHotHash {
        n_buckets: u32,
        as_codes: bool,
    },
    MeanVariance {
        mean: f32,
        inv_std: f32,
    },
    MinMax {
        min: f32,
        inv_range: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestPayload {
    base_score: f32,
    missing_as_zero: bool,
    trees: Vec<TreePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreePayload {
    nodes: Vec<NodePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum NodePayload {
    Split {
        feature: u32,
        kind: SplitKindPayload,
        left: u32,
        right: u32,
    },
    Leaf {
        value: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SplitKindPayload {
    Numeric {
        threshold: f32,
        default_left: bool,
    },
    Categorical {
        left_categories: Vec<u32>,
        default_left: bool,
    },
}

// =============================================================================
// Save / load
// =============================================================================

pub(super) fn save(model: &PriceModel, path: &Path) -> Result<(), DataError> {
    let payload = Payload::V1(to_payload(model));
    let bytes = postcard::to_allocvec(&payload).map_err(|e| DataError::Encode(e.to_string()))?;
    fs::write(path, bytes)?;
    Ok(())
}

pub(super) fn load(path: &Path) -> Result<PriceModel, DataError> {
    let bytes = fs::read(path)?;
    let payload: Payload =
        postcard::from_bytes(&bytes).map_err(|e| DataError::Decode(e.to_string()))?;
    let Payload::V1(v1) = payload;
    from_payload(v1)
}

// =============================================================================
// Conversion
// =============================================================================

fn to_payload(model: &PriceModel) -> PayloadV1 {
    PayloadV1 {
        feature_names: model.feature_names().to_vec(),
        config: model.config().clone(),
        encoders: model
            .encoders()
            .iter()
            .map(|encoder| EncoderPayload {
                column: encoder.column_name().to_owned(),
                transform: encoder_transform(encoder),
                stage: stage_to_payload(encoder.stage()),
            })
            .collect(),
        forest: forest_to_payload(model.forest()),
    }
}

fn from_payload(payload: PayloadV1) -> Result<PriceModel, DataError> {
    let mut encoders = Vec::with_capacity(payload.encoders.len());
    for EncoderPayload {
        column,
        transform,
        stage,
    } in payload.encoders
    {
        let column = ColumnSpec::new(column, transform)
            .bind()
            .map_err(|e| DataError::Decode(e.to_string()))?;
        encoders.push(ColumnEncoder {
            column,
            stage: stage_from_payload(stage),
        });
    }

    let mut forest = Forest::new(payload.forest.base_score, payload.forest.missing_as_zero);
    for tree in payload.forest.trees {
        let nodes = tree.nodes.into_iter().map(node_from_payload).collect();
        forest.push_tree(Tree::new(nodes));
    }

    Ok(PriceModel::new(
        encoders,
        forest,
        payload.feature_names,
        payload.config,
    ))
}

fn encoder_transform(encoder: &ColumnEncoder) -> Transform {
    match encoder.stage() {
        FittedStage::Identity => Transform::None,
        FittedStage::OneHot { .. } => Transform::OneHotEncoding,
        FittedStage::OneHotHash { .. } => Transform::OneHotHashEncoding,
        FittedStage::MeanVariance { .. } => Transform::NormalizeMeanVariance,
        FittedStage::MinMax { .. } => Transform::NormalizeMinMax,
    }
}

fn stage_to_payload(stage: &FittedStage) -> StagePayload {
    match stage {
        FittedStage::Identity => StagePayload::Identity,
        FittedStage::OneHot {
            dictionary,
            as_codes,
            ..
        } => StagePayload::OneHot {
            dictionary: dictionary.clone(),
            as_codes: *as_codes,
        },
        FittedStage::OneHotHash {
            n_buckets,
            as_codes,
        } => StagePayload::OneHotHash {
            n_buckets: *n_buckets,
            as_codes: *as_codes,
        },
        FittedStage::MeanVariance { mean, inv_std } => StagePayload::MeanVariance {
            mean: *mean,
            inv_std: *inv_std,
        },
        FittedStage::MinMax { min, inv_range } => StagePayload::MinMax {
            min: *min,
            inv_range: *inv_range,
        },
    }
}

fn stage_from_payload(stage: StagePayload) -> FittedStage {
    match stage {
        StagePayload::Identity => FittedStage::Identity,
        StagePayload::OneHot {
            dictionary,
            as_codes,
        } => {
            let index: HashMap<String, u32> = dictionary
                .iter()
                .enumerate()
                .map(|(i, category)| (category.clone(), i as u32))
                .collect();
            FittedStage::OneHot {
                dictionary,
                index,
                as_codes,
            }
        }
        StagePayload::OneHotHash {
            n_buckets,
            as_codes,
        } => FittedStage::OneHotHash {
            n_buckets,
            as_codes,
        },
        StagePayload::MeanVariance { mean, inv_std } => FittedStage::MeanVariance { mean, inv_std },
        StagePayload::MinMax { min, inv_range } => FittedStage::MinMax { min, inv_range },
    }
}

fn forest_to_payload(forest: &Forest) -> ForestPayload {
    ForestPayload {
        base_score: forest.base_score(),
        missing_as_zero: forest.missing_as_zero(),
        trees: forest
            .trees()
            .iter()
            .map(|tree| TreePayload {
                nodes: tree.nodes().iter().map(node_to_payload).collect(),
            })
            .collect(),
    }
}

fn node_to_payload(node: &Node) -> NodePayload {
    match node {
        Node::Split {
            feature,
            kind,
            left,
            right,
        } => NodePayload::Split {
            feature: *feature,
            kind: match kind {
                SplitKind::Numeric {
                    threshold,
                    default_left,
                } => SplitKindPayload::Numeric {
                    threshold: *threshold,
                    default_left: *default_left,
                },
                SplitKind::Categorical {
                    left_categories,
                    default_left,
                } => SplitKindPayload::Categorical {
                    left_categories: left_categories.clone(),
                    default_left: *default_left,
                },
            },
            left: *left,
            right: *right,
        },
        Node::Leaf { value } => NodePayload::Leaf { value: *value },
    }
}

fn node_from_payload(node: NodePayload) -> Node {
    match node {
        NodePayload::Split {
            feature,
            kind,
            left,
            right,
        } => Node::Split {
            feature,
            kind: match kind {
                SplitKindPayload::Numeric {
                    threshold,
                    default_left,
                } => SplitKind::Numeric {
                    threshold,
                    default_left,
                },
                SplitKindPayload::Categorical {
                    left_categories,
                    default_left,
                } => SplitKind::Categorical {
                    left_categories,
                    default_left,
                },
            },
            left,
            right,
        },
        NodePayload::Leaf { value } => Node::Leaf { value },
    }
}
