//! The configurable training pipeline.
//!
//! [`ColumnSpec`] names a record column and picks a [`Transform`] for
//! it; [`PipelineBuilder`] composes the specs and a
//! [`crate::training::TrainerConfig`] into a [`Pipeline`] whose fit
//! produces a [`crate::model::PriceModel`].

mod builder;
mod column;
mod error;
mod stages;

pub use builder::{Pipeline, PipelineBuilder};
pub use column::{default_columns, ColumnSpec, Transform};
pub use error::ConfigurationError;
pub use stages::{ColumnEncoder, FittedStage, HASH_BUCKETS};
