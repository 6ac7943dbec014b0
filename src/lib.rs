//! otoprice: used-car price modeling with a configurable feature pipeline.
//!
//! Trains a gradient-boosted regression model on tabular listing data
//! (make, model, year, mileage, engine, fuel) and evaluates it with
//! standard regression metrics plus a diagnostic scatter plot.
//!
//! # Key Types
//!
//! - [`ColumnSpec`] / [`Transform`] - Per-column feature transforms
//! - [`TrainerConfig`] - Boosted-tree hyperparameters
//! - [`PipelineBuilder`] / [`Pipeline`] - Pipeline composition and fitting
//! - [`PriceModel`] - The fitted model, with predict and save/load
//! - [`RegressionMetrics`] - Held-out evaluation results
//! - [`RegressionLine`] - Closed-form fit for the scatter plot
//! - [`TrainingSession`] - Per-run seed and split context
//!
//! # Training
//!
//! ```no_run
//! use otoprice::{
//!     default_columns, load_csv, LoaderOptions, TrainerConfig, TrainingSession,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = load_csv("data/otomoto.csv", &LoaderOptions::default())?;
//! let session = TrainingSession::new(1);
//! let model = session.fit(&table, &default_columns(), &TrainerConfig::default())?;
//! let metrics = session.evaluate(&model, &table)?;
//! println!("{}", otoprice::report::format_regression_metrics(&metrics));
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod eval;
pub mod model;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod session;
pub mod training;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{load_csv, shuffle_split, DataError, LoaderOptions, Record, RecordTable};
pub use eval::{evaluate, RegressionMetrics};
pub use model::PriceModel;
pub use pipeline::{
    default_columns, ColumnSpec, ConfigurationError, Pipeline, PipelineBuilder, Transform,
};
pub use plot::{write_scatter_svg, DegenerateInputError, PlotOptions, RegressionLine};
pub use session::{SessionError, TrainingSession};
pub use training::{TrainerConfig, TrainingError, Verbosity};
