//! Statistical building blocks for two-sample comparison.
//!
//! Descriptive helpers plus the four test kernels the analysis pipeline
//! draws from:
//!
//! - [`shapiro`]: Shapiro-Wilk normality test (per group)
//! - [`levene`]: Levene test for variance homogeneity (between groups)
//! - [`ttest_ind`]: independent two-sample t-test (parametric path)
//! - [`mann_whitney_u`]: Mann-Whitney U rank test (non-parametric path)
//!
//! Every kernel returns a [`TestResult`] pairing the test statistic with a
//! two-sided p-value clamped into [0, 1]. The kernels are pure functions of
//! their inputs: the same samples always produce the same pair.

mod levene;
mod mann_whitney;
mod shapiro;
mod ttest;

pub use levene::{levene, Center};
pub use mann_whitney::mann_whitney_u;
pub use shapiro::shapiro;
pub use shapiro::MIN_SAMPLES as SHAPIRO_MIN_SAMPLES;
pub use ttest::ttest_ind;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors from the statistical kernels.
#[derive(Debug, thiserror::Error)]
pub enum StatError {
    /// A sample is too small for the requested test.
    #[error("{test} requires at least {min} observations per sample, got {got}")]
    InsufficientSample {
        /// Name of the test that rejected the sample.
        test: &'static str,
        /// Number of observations supplied.
        got: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// The input carries no usable variation (e.g. all values identical).
    #[error("degenerate sample: {reason}")]
    DegenerateSample {
        /// What exactly collapsed.
        reason: String,
    },
}

/// Outcome of a single hypothesis test: the statistic and its p-value.
///
/// The `Display` form is the canonical report line, with both numbers in
/// fixed-point five-decimal notation:
///
/// ```text
/// Test Stat = -0.94156, p-value = 0.34933
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// The test statistic (W, t or U depending on the kernel).
    pub statistic: f64,
    /// Two-sided p-value in [0, 1].
    pub p_value: f64,
}

impl TestResult {
    /// Pair a statistic with its p-value.
    pub fn new(statistic: f64, p_value: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p_value), "p-value out of range");
        Self { statistic, p_value }
    }

    /// Whether the null hypothesis is rejected at significance level `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Test Stat = {:.5}, p-value = {:.5}",
            self.statistic, self.p_value
        )
    }
}

/// Arithmetic mean.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn mean(values: &[f64]) -> f64 {
    assert!(!values.is_empty(), "Cannot compute mean of empty slice");
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance (denominator n - 1).
///
/// # Panics
///
/// Panics if `values` has fewer than 2 elements.
pub fn sample_variance(values: &[f64]) -> f64 {
    assert!(
        values.len() >= 2,
        "Cannot compute sample variance of fewer than 2 values"
    );
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation (square root of [`sample_variance`]).
pub fn std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Median of a sample (average of the two middle values for even sizes).
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn median(values: &[f64]) -> f64 {
    assert!(!values.is_empty(), "Cannot compute median of empty slice");
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Quantile at probability `q` using linear interpolation between order
/// statistics (Hyndman & Fan 1996, Type 7):
///
/// ```text
/// h = (n - 1) * q
/// value = x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])
/// ```
///
/// # Panics
///
/// Panics if `values` is empty or `q` is outside [0, 1].
pub fn quantile(values: &[f64], q: f64) -> f64 {
    assert!(!values.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&q),
        "Quantile probability must be in [0, 1]"
    );
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Five-number-plus summary of one sample, in the shape analysts expect
/// from a `describe()` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Number of observations.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    /// Smallest observation.
    pub min: f64,
    /// First quartile (linear interpolation).
    pub q25: f64,
    /// Median.
    pub median: f64,
    /// Third quartile (linear interpolation).
    pub q75: f64,
    /// Largest observation.
    pub max: f64,
}

impl SampleSummary {
    /// Summarize a sample.
    ///
    /// # Panics
    ///
    /// Panics if `values` has fewer than 2 elements (the standard deviation
    /// needs at least 2).
    pub fn describe(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self {
            n: values.len(),
            mean: mean(values),
            std_dev: std_dev(values),
            min: sorted[0],
            q25: quantile(values, 0.25),
            median: median(values),
            q75: quantile(values, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((sample_variance(&values) - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert!((median(&[3.0, 1.0, 2.0]) - 2.0).abs() < 1e-12);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        // Sorted: [540, 545, 550, 550, 555, 560]
        // q25: h = 5 * 0.25 = 1.25 -> 545 + 0.25 * (550 - 545) = 546.25
        let values = vec![540.0, 550.0, 560.0, 545.0, 555.0, 550.0];
        assert!((quantile(&values, 0.25) - 546.25).abs() < 1e-12);
        assert!((quantile(&values, 0.5) - 550.0).abs() < 1e-12);
        assert!((quantile(&values, 0.75) - 553.75).abs() < 1e-12);
        assert!((quantile(&values, 0.0) - 540.0).abs() < 1e-12);
        assert!((quantile(&values, 1.0) - 560.0).abs() < 1e-12);
    }

    #[test]
    fn test_describe() {
        let values = vec![
            93.5, 101.2, 88.7, 110.4, 99.6, 105.3, 97.8, 91.1, 103.9, 96.4,
        ];
        let summary = SampleSummary::describe(&values);
        assert_eq!(summary.n, 10);
        assert!((summary.mean - 98.79).abs() < 1e-10);
        assert!((summary.std_dev - 6.7112591963).abs() < 1e-9);
        assert!((summary.min - 88.7).abs() < 1e-12);
        assert!((summary.q25 - 94.225).abs() < 1e-10);
        assert!((summary.median - 98.7).abs() < 1e-10);
        assert!((summary.q75 - 103.225).abs() < 1e-10);
        assert!((summary.max - 110.4).abs() < 1e-12);
    }

    #[test]
    fn test_result_display_five_decimals() {
        let result = TestResult::new(-0.9415584, 0.3493268);
        assert_eq!(
            result.to_string(),
            "Test Stat = -0.94156, p-value = 0.34933"
        );
    }

    #[test]
    fn test_result_significance() {
        let result = TestResult::new(2.5, 0.012);
        assert!(result.is_significant(0.05));
        assert!(!result.is_significant(0.01));
    }

    #[test]
    #[should_panic(expected = "Cannot compute mean of empty slice")]
    fn test_mean_empty_panics() {
        mean(&[]);
    }
}
