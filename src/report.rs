//! Plain-text metrics report.
//!
//! The block layout, field order, and labels are fixed: existing
//! consumers match on them.

use std::fmt::Write as _;

use crate::eval::RegressionMetrics;

/// Format the standard metrics block.
pub fn format_regression_metrics(metrics: &RegressionMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "*************************************************");
    let _ = writeln!(out, "*       Metrics for regression model      ");
    let _ = writeln!(out, "*------------------------------------------------");
    let _ = writeln!(out, "*       LossFn:        {:.2}", metrics.loss_function);
    let _ = writeln!(out, "*       R2 Score:      {:.2}", metrics.r_squared);
    let _ = writeln!(
        out,
        "*       Absolute loss: {:.2}",
        metrics.mean_absolute_error
    );
    let _ = writeln!(
        out,
        "*       Squared loss:  {:.2}",
        metrics.mean_squared_error
    );
    let _ = writeln!(
        out,
        "*       RMS loss:      {:.2}",
        metrics.root_mean_squared_error
    );
    let _ = writeln!(out, "*************************************************");
    out
}
