//! Regression evaluation.

use crate::data::{DataError, RecordTable};
use crate::model::PriceModel;

/// Goodness-of-fit measures for one evaluation run.
///
/// Computed once per call and never mutated. `loss_function` is the
/// training objective's value on the same predictions; with the
/// squared-loss objective it coincides with `mean_squared_error`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub loss_function: f64,
    pub r_squared: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
}

/// Run the model over the held-out split and compute metrics.
///
/// Idempotent: the same model and data always produce the same
/// metrics.
///
/// # Errors
///
/// [`DataError::EmptyDataset`] when `test` holds no records.
pub fn evaluate(model: &PriceModel, test: &RecordTable) -> Result<RegressionMetrics, DataError> {
    if test.is_empty() {
        return Err(DataError::EmptyDataset);
    }
    Ok(metrics_from_pairs(&model.transform(test)))
}

/// Compute metrics from (actual, predicted) pairs.
///
/// When every actual value is identical the total sum of squares is
/// zero and R² is undefined; the result carries `f64::NAN` there
/// rather than dividing by zero.
pub fn metrics_from_pairs(pairs: &[(f32, f32)]) -> RegressionMetrics {
    let n = pairs.len() as f64;
    let mean_actual = pairs.iter().map(|&(a, _)| a as f64).sum::<f64>() / n;

    let mut abs_sum = 0.0f64;
    let mut sq_sum = 0.0f64;
    let mut ss_tot = 0.0f64;
    for &(actual, predicted) in pairs {
        let diff = actual as f64 - predicted as f64;
        abs_sum += diff.abs();
        sq_sum += diff * diff;
        let centered = actual as f64 - mean_actual;
        ss_tot += centered * centered;
    }

    let mean_squared_error = sq_sum / n;
    let r_squared = if ss_tot > 0.0 {
        1.0 - sq_sum / ss_tot
    } else {
        f64::NAN
    };

    RegressionMetrics {
        loss_function: mean_squared_error,
        r_squared,
        mean_absolute_error: abs_sum / n,
        mean_squared_error,
        root_mean_squared_error: mean_squared_error.sqrt(),
    }
}
