//! Pipeline construction and fitting.
//!
//! [`PipelineBuilder::build`] turns an ordered column-spec set and a
//! trainer configuration into an executable [`Pipeline`]: one stage
//! per transformed column (input order preserved), a concatenation
//! stage packing the transformed columns into the feature vector, and
//! the boosted-tree trainer stage. Construction is pure — data is
//! first touched by [`Pipeline::fit`].

use std::collections::HashSet;

use ndarray::Array2;

use crate::data::{RecordTable, LABEL_COLUMN};
use crate::model::PriceModel;
use crate::training::{
    BoosterParams, FeatureKind, FeatureMatrix, GradientBooster, TrainerConfig, TrainingError,
    Verbosity,
};

use super::column::{BoundColumn, ColumnSpec, Transform};
use super::error::ConfigurationError;
use super::stages::{ColumnEncoder, FittedStage};

/// Builds executable pipelines from column specs.
pub struct PipelineBuilder;

impl PipelineBuilder {
    /// Compose a pipeline from the column set and trainer config.
    ///
    /// Inputs are snapshotted: the returned pipeline is unaffected by
    /// later mutation of the caller's specs or config.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError`] on an empty column set, an unknown or
    /// duplicate column name, or an invalid transform/type pairing.
    pub fn build(
        columns: &[ColumnSpec],
        trainer: &TrainerConfig,
    ) -> Result<Pipeline, ConfigurationError> {
        if columns.is_empty() {
            return Err(ConfigurationError::EmptyColumns);
        }

        let mut seen = HashSet::new();
        let mut bound = Vec::with_capacity(columns.len());
        for spec in columns {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigurationError::DuplicateColumn {
                    name: spec.name.clone(),
                });
            }
            bound.push(spec.bind()?);
        }

        Ok(Pipeline {
            columns: bound,
            trainer: trainer.clone(),
            verbosity: Verbosity::default(),
        })
    }
}

/// An executable transform-then-train pipeline.
///
/// Built fresh per training run; fitting consumes nothing and may be
/// repeated, but each fit produces an independent model.
#[derive(Debug, Clone)]
pub struct Pipeline {
    columns: Vec<BoundColumn>,
    trainer: TrainerConfig,
    verbosity: Verbosity,
}

impl Pipeline {
    /// Set training-progress verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Total stage count: one per transformed column, plus the
    /// concatenation stage, plus the trainer stage.
    pub fn n_stages(&self) -> usize {
        let transforms = self
            .columns
            .iter()
            .filter(|c| c.transform != Transform::None)
            .count();
        transforms + 2
    }

    /// The trainer configuration this pipeline was built with.
    pub fn trainer_config(&self) -> &TrainerConfig {
        &self.trainer
    }

    /// The label column the trainer stage regresses on.
    pub fn label_column(&self) -> &'static str {
        LABEL_COLUMN
    }

    /// Fit the pipeline on the training split.
    ///
    /// Transform statistics (dictionaries, normalization parameters)
    /// are computed from `train` only, then the packed feature matrix
    /// is handed to the boosted-tree trainer.
    pub fn fit(&self, train: &RecordTable) -> Result<PriceModel, TrainingError> {
        if train.is_empty() {
            return Err(TrainingError::EmptyTrainingData);
        }

        let as_codes = self.trainer.use_categorical_split;
        let encoders: Vec<ColumnEncoder> = self
            .columns
            .iter()
            .map(|column| ColumnEncoder {
                column: column.clone(),
                stage: FittedStage::fit(column, train, as_codes),
            })
            .collect();

        let (matrix, feature_names) = concatenate(&encoders, train);

        let booster = GradientBooster::new(BoosterParams::from_config(&self.trainer))
            .with_verbosity(self.verbosity);
        let forest = booster.fit(&matrix, &train.labels())?;

        Ok(PriceModel::new(
            encoders,
            forest,
            feature_names,
            self.trainer.clone(),
        ))
    }
}

/// The concatenation stage: pack every encoder's output, in column
/// order, into one feature-major matrix.
fn concatenate(encoders: &[ColumnEncoder], table: &RecordTable) -> (FeatureMatrix, Vec<String>) {
    let n_samples = table.n_rows();
    let total_width: usize = encoders.iter().map(|e| e.stage.width()).sum();

    let mut kinds: Vec<FeatureKind> = Vec::with_capacity(total_width);
    let mut names: Vec<String> = Vec::with_capacity(total_width);
    for encoder in encoders {
        kinds.extend(encoder.stage.kinds());
        names.extend(encoder.stage.feature_names(encoder.column_name()));
    }

    let mut values = Array2::<f32>::zeros((total_width, n_samples));
    let mut buffer = vec![0.0f32; total_width];
    for (sample, record) in table.records().iter().enumerate() {
        let mut offset = 0;
        for encoder in encoders {
            let width = encoder.stage.width();
            encoder.encode_record(record, &mut buffer[offset..offset + width]);
            offset += width;
        }
        for (feature, &value) in buffer.iter().enumerate() {
            values[(feature, sample)] = value;
        }
    }

    (
        FeatureMatrix::new(values, kinds, names.clone()),
        names,
    )
}
