//! Diagnostic plotting: regression-line fit and the scatter artifact.

mod line;
mod scatter;

pub use line::{DegenerateInputError, RegressionLine};
pub use scatter::{render_scatter_svg, write_scatter_svg, PlotOptions};
