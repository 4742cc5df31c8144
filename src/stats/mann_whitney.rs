//! Mann-Whitney U rank test.
//!
//! Non-parametric comparison of two independent samples. Observations are
//! pooled and ranked (tied values share their midrank), and U counts how
//! often a value from the first sample beats one from the second:
//!
//! ```text
//! U₁ = R₁ - n₁(n₁ + 1)/2        (R₁ = rank sum of the first sample)
//! U₂ = n₁n₂ - U₁
//! ```
//!
//! The reported statistic is U₁. The two-sided p-value uses the normal
//! approximation on max(U₁, U₂) with a tie-corrected variance and a 0.5
//! continuity correction:
//!
//! ```text
//! σ² = n₁n₂/12 · ((n + 1) - Σ(t³ - t) / (n(n - 1)))
//! z = (max(U₁, U₂) - n₁n₂/2 - 0.5) / σ
//! ```
//!
//! where t runs over the sizes of tied groups in the pooled sample. No
//! exact small-sample enumeration is attempted; the approximation is the
//! only mode.

use statrs::distribution::{ContinuousCDF, Normal};

use super::{StatError, TestResult};

/// Smallest per-sample size the test accepts.
pub const MIN_SAMPLES: usize = 2;

/// Compare two independent samples by ranks.
///
/// Returns U of the first sample and a two-sided p-value; small p-values
/// reject the hypothesis that both samples come from the same distribution.
///
/// # Errors
///
/// * [`StatError::InsufficientSample`] if either sample has fewer than
///   [`MIN_SAMPLES`] observations.
/// * [`StatError::DegenerateSample`] if every pooled value is tied, which
///   collapses the rank variance to zero.
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<TestResult, StatError> {
    let (n1, n2) = (first.len(), second.len());
    let smallest = n1.min(n2);
    if smallest < MIN_SAMPLES {
        return Err(StatError::InsufficientSample {
            test: "Mann-Whitney U",
            got: smallest,
            min: MIN_SAMPLES,
        });
    }

    let mut pooled: Vec<f64> = Vec::with_capacity(n1 + n2);
    pooled.extend_from_slice(first);
    pooled.extend_from_slice(second);
    let ranks = midranks(&pooled);

    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;

    let n = (n1 + n2) as f64;
    let tie_term = tie_correction(&mut pooled);
    let variance = (n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(StatError::DegenerateSample {
            reason: "all pooled values are tied".to_string(),
        });
    }

    let normal = Normal::new(0.0, 1.0).unwrap();
    let z = (u1.max(u2) - (n1 * n2) as f64 / 2.0 - 0.5) / variance.sqrt();
    let p = (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0);

    Ok(TestResult::new(u1, p))
}

/// Ranks of `values` (1-based), with tied values sharing the average of
/// the ranks they span.
fn midranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j (0-based) hold ranks i+1..=j+1; ties share the mean.
        let rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Σ(t³ - t) over tied groups. Sorts the slice in place.
fn tie_correction(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mut sum = 0.0;
    let mut i = 0;
    while i < values.len() {
        let mut j = i;
        while j + 1 < values.len() && values[j + 1] == values[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        sum += t * t * t - t;
        i = j + 1;
    }
    sum
}
