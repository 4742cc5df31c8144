//! Levene test for homogeneity of variances.
//!
//! Tests whether two samples share a common variance by running a one-way
//! ANOVA on the absolute deviations from each sample's center:
//!
//! ```text
//! Z_ij = |x_ij - center_i|
//! W = (N - k) / (k - 1) * Σ nᵢ (Z̄ᵢ - Z̄)² / Σ Σ (Z_ij - Z̄ᵢ)²
//! ```
//!
//! with W distributed as F(k - 1, N - k) under the null. Centering on the
//! median (the Brown-Forsythe variant) is the default; it is markedly more
//! robust to skewed data than centering on the mean.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use super::{mean, median, StatError, TestResult};

/// Smallest per-sample size the test accepts.
pub const MIN_SAMPLES: usize = 2;

/// How each sample is centered before taking absolute deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Center {
    /// Absolute deviations from the sample median (Brown-Forsythe).
    #[default]
    Median,
    /// Absolute deviations from the sample mean (original Levene).
    Mean,
}

impl std::fmt::Display for Center {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Center::Median => write!(f, "median"),
            Center::Mean => write!(f, "mean"),
        }
    }
}

/// Test two samples for equal variances.
///
/// Returns the W statistic and its p-value under F(1, N - 2); small
/// p-values reject variance homogeneity. The test is symmetric in its two
/// sample arguments.
///
/// # Errors
///
/// * [`StatError::InsufficientSample`] if either sample has fewer than
///   [`MIN_SAMPLES`] observations.
/// * [`StatError::DegenerateSample`] if the within-sample deviations carry
///   no variation at all (for example two samples of 2 observations each,
///   whose absolute deviations from their centers are always pairwise
///   equal).
pub fn levene(first: &[f64], second: &[f64], center: Center) -> Result<TestResult, StatError> {
    let (n1, n2) = (first.len(), second.len());
    let smallest = n1.min(n2);
    if smallest < MIN_SAMPLES {
        return Err(StatError::InsufficientSample {
            test: "Levene",
            got: smallest,
            min: MIN_SAMPLES,
        });
    }

    let deviations = |sample: &[f64]| -> Vec<f64> {
        let c = match center {
            Center::Median => median(sample),
            Center::Mean => mean(sample),
        };
        sample.iter().map(|x| (x - c).abs()).collect()
    };

    let z1 = deviations(first);
    let z2 = deviations(second);
    let z1_bar = mean(&z1);
    let z2_bar = mean(&z2);
    let n_total = (n1 + n2) as f64;
    let grand = (z1.iter().sum::<f64>() + z2.iter().sum::<f64>()) / n_total;

    let between =
        n1 as f64 * (z1_bar - grand).powi(2) + n2 as f64 * (z2_bar - grand).powi(2);
    let within = z1.iter().map(|z| (z - z1_bar).powi(2)).sum::<f64>()
        + z2.iter().map(|z| (z - z2_bar).powi(2)).sum::<f64>();

    if within <= 0.0 {
        return Err(StatError::DegenerateSample {
            reason: "absolute deviations show no within-sample variation".to_string(),
        });
    }

    // k = 2 groups throughout.
    let statistic = (n_total - 2.0) * between / within;
    let dist = FisherSnedecor::new(1.0, n_total - 2.0).unwrap();
    let p = (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0);

    Ok(TestResult::new(statistic, p))
}
