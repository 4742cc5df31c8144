//! Independent two-sample t-test.
//!
//! The default form pools the two sample variances and assumes they are
//! equal:
//!
//! ```text
//! s²_p = ((n₁ - 1) s₁² + (n₂ - 1) s₂²) / (n₁ + n₂ - 2)
//! t = (x̄₁ - x̄₂) / √(s²_p (1/n₁ + 1/n₂))
//! ```
//!
//! with n₁ + n₂ - 2 degrees of freedom. Passing `equal_var = false` switches
//! to the Welch form, which drops the pooling and uses the
//! Welch-Satterthwaite degrees of freedom instead. P-values are two-sided.

use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{mean, sample_variance, StatError, TestResult};

/// Smallest per-sample size the test accepts (a variance needs 2).
pub const MIN_SAMPLES: usize = 2;

/// Compare the means of two independent samples.
///
/// With `equal_var` set, the classic pooled-variance test is used; otherwise
/// the Welch variant. Small p-values reject the hypothesis that both samples
/// share a mean.
///
/// # Errors
///
/// * [`StatError::InsufficientSample`] if either sample has fewer than
///   [`MIN_SAMPLES`] observations.
/// * [`StatError::DegenerateSample`] if both samples have zero variance,
///   leaving the statistic undefined.
pub fn ttest_ind(first: &[f64], second: &[f64], equal_var: bool) -> Result<TestResult, StatError> {
    let (n1, n2) = (first.len(), second.len());
    let smallest = n1.min(n2);
    if smallest < MIN_SAMPLES {
        return Err(StatError::InsufficientSample {
            test: "t-test",
            got: smallest,
            min: MIN_SAMPLES,
        });
    }

    let (m1, m2) = (mean(first), mean(second));
    let (v1, v2) = (sample_variance(first), sample_variance(second));

    let (statistic, freedom) = if equal_var {
        let pooled =
            ((n1 - 1) as f64 * v1 + (n2 - 1) as f64 * v2) / (n1 + n2 - 2) as f64;
        if pooled <= 0.0 {
            return Err(StatError::DegenerateSample {
                reason: "pooled variance is zero".to_string(),
            });
        }
        let se = (pooled * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
        ((m1 - m2) / se, (n1 + n2 - 2) as f64)
    } else {
        let (vn1, vn2) = (v1 / n1 as f64, v2 / n2 as f64);
        if vn1 + vn2 <= 0.0 {
            return Err(StatError::DegenerateSample {
                reason: "both sample variances are zero".to_string(),
            });
        }
        // Welch-Satterthwaite degrees of freedom.
        let freedom = (vn1 + vn2).powi(2)
            / (vn1.powi(2) / (n1 - 1) as f64 + vn2.powi(2) / (n2 - 1) as f64);
        ((m1 - m2) / (vn1 + vn2).sqrt(), freedom)
    };

    let dist = StudentsT::new(0.0, 1.0, freedom).unwrap();
    let p = (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0);

    Ok(TestResult::new(statistic, p))
}
