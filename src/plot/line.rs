//! Closed-form regression-line fit over (actual, predicted) pairs.

/// The regression-line fit needs variation in the actual values; a
/// zero-variance batch has no defined slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("regression line fit requires variation in the actual values")]
pub struct DegenerateInputError;

/// Best-fit line for the diagnostic scatter plot.
///
/// Computed from raw sums rather than a library call. The slope takes
/// the absolute value of the closed-form estimate — a deliberate
/// reproduction of the reference behavior, which forces a non-negative
/// slope even for negatively correlated data. Recomputed per plot
/// request; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionLine {
    /// Fit the line on (x = actual, y = predicted) pairs.
    ///
    /// # Errors
    ///
    /// [`DegenerateInputError`] when the batch is empty or every
    /// actual value is identical (zero denominator).
    pub fn fit(pairs: &[(f32, f32)]) -> Result<Self, DegenerateInputError> {
        if pairs.is_empty() {
            return Err(DegenerateInputError);
        }
        let n = pairs.len() as f64;

        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;
        let mut sum_xy = 0.0f64;
        let mut sum_xx = 0.0f64;
        for &(x, y) in pairs {
            let (x, y) = (x as f64, y as f64);
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }

        let mean_x = sum_x / n;
        let mean_y = sum_y / n;
        let mean_xy = sum_xy / n;
        let mean_xx = sum_xx / n;

        let denominator = mean_x * mean_x - mean_xx;
        if denominator == 0.0 {
            return Err(DegenerateInputError);
        }

        let slope = ((mean_x * mean_y - mean_xy) / denominator).abs();
        let intercept = mean_y - slope * mean_x;
        Ok(Self { slope, intercept })
    }

    /// Evaluate the line at `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Sample the line at two boundary x-values for plotting.
    pub fn endpoints(&self, x_min: f64, x_max: f64) -> [(f64, f64); 2] {
        [
            (x_min, self.value_at(x_min)),
            (x_max, self.value_at(x_max)),
        ]
    }
}
