//! Shapiro-Wilk normality test.
//!
//! Implements the AS R94 approximation (Royston 1995), which extends the
//! original Shapiro-Wilk test to sample sizes from 3 upward. The W statistic
//! measures how well the sorted sample tracks the expected normal order
//! statistics:
//!
//! ```text
//! W = (Σ aᵢ x₍ᵢ₎)² / Σ (xᵢ - x̄)²
//! ```
//!
//! where the weights `aᵢ` come from Blom scores m with polynomial endpoint
//! corrections in u = 1/√n. The p-value uses Royston's three regimes: an
//! exact expression at n = 3, a shifted-log transform for 4 ≤ n ≤ 11, and a
//! log-normal approximation for n ≥ 12.
//!
//! # Reference
//!
//! Royston, P. (1995). "Remark AS R94: A Remark on Algorithm AS 181: The
//! W-test for Normality." Applied Statistics 44(4):547-551.

use statrs::distribution::{ContinuousCDF, Normal};

use super::{mean, StatError, TestResult};

/// Smallest sample size the W test is defined for.
pub const MIN_SAMPLES: usize = 3;

// Royston (1995) polynomial coefficients, constant terms first.
const WEIGHT_N: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const WEIGHT_N1: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SMALL_MEAN: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const SMALL_LN_SD: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const LARGE_MEAN: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const LARGE_LN_SD: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

/// Test a sample against the null hypothesis that it is normally
/// distributed.
///
/// Returns the W statistic and a p-value; small p-values reject normality.
///
/// # Arguments
///
/// * `sample` - Observations in any order. Values must be finite.
///
/// # Errors
///
/// * [`StatError::InsufficientSample`] if the sample has fewer than
///   [`MIN_SAMPLES`] observations.
/// * [`StatError::DegenerateSample`] if all observations are identical
///   (W is undefined for zero range).
pub fn shapiro(sample: &[f64]) -> Result<TestResult, StatError> {
    let n = sample.len();
    if n < MIN_SAMPLES {
        return Err(StatError::InsufficientSample {
            test: "Shapiro-Wilk",
            got: n,
            min: MIN_SAMPLES,
        });
    }

    let mut x = sample.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));
    if x[n - 1] - x[0] <= 0.0 {
        return Err(StatError::DegenerateSample {
            reason: "all values are identical".to_string(),
        });
    }

    // Blom scores: m_i = Phi^-1((i - 3/8) / (n + 1/4))
    let normal = Normal::new(0.0, 1.0).unwrap();
    let m: Vec<f64> = (1..=n)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
        .collect();
    let m_sq_sum: f64 = m.iter().map(|v| v * v).sum();

    let weights = compute_weights(&m, m_sq_sum, n);

    let x_bar = mean(&x);
    let numerator: f64 = weights
        .iter()
        .zip(&x)
        .map(|(w, xi)| w * xi)
        .sum::<f64>()
        .powi(2);
    let denominator: f64 = x.iter().map(|xi| (xi - x_bar).powi(2)).sum();

    // Rounding can push W a hair above 1 for near-perfect samples.
    let w = (numerator / denominator).min(1.0);
    let p = p_value(w, n, &normal);

    Ok(TestResult::new(w, p))
}

/// Weight vector a for the sorted sample.
///
/// Royston adjusts the one (3 < n <= 5) or two (n > 5) extreme weights with
/// polynomials in u = 1/sqrt(n) and rescales the interior from the Blom
/// scores. The weights are antisymmetric: a_i = -a_{n+1-i}.
fn compute_weights(m: &[f64], m_sq_sum: f64, n: usize) -> Vec<f64> {
    let mut a = vec![0.0; n];
    if n == 3 {
        // Exact: a = (-1/sqrt(2), 0, 1/sqrt(2))
        a[2] = std::f64::consts::FRAC_1_SQRT_2;
        a[0] = -a[2];
        return a;
    }

    let u = 1.0 / (n as f64).sqrt();
    let norm = m_sq_sum.sqrt();
    let a_n = m[n - 1] / norm + poly(&WEIGHT_N, u);

    if n > 5 {
        let a_n1 = m[n - 2] / norm + poly(&WEIGHT_N1, u);
        let phi = (m_sq_sum - 2.0 * m[n - 1] * m[n - 1] - 2.0 * m[n - 2] * m[n - 2])
            / (1.0 - 2.0 * a_n * a_n - 2.0 * a_n1 * a_n1);
        let scale = phi.sqrt();
        a[n - 1] = a_n;
        a[0] = -a_n;
        a[n - 2] = a_n1;
        a[1] = -a_n1;
        for i in 2..n - 2 {
            a[i] = m[i] / scale;
        }
    } else {
        let phi = (m_sq_sum - 2.0 * m[n - 1] * m[n - 1]) / (1.0 - 2.0 * a_n * a_n);
        let scale = phi.sqrt();
        a[n - 1] = a_n;
        a[0] = -a_n;
        for i in 1..n - 1 {
            a[i] = m[i] / scale;
        }
    }
    a
}

/// P-value for an observed W at sample size n.
fn p_value(w: f64, n: usize, normal: &Normal) -> f64 {
    let p = if n == 3 {
        // Exact distribution of W at n = 3.
        let stqr = (0.75_f64).sqrt().asin();
        (6.0 / std::f64::consts::PI) * (w.sqrt().asin() - stqr)
    } else if n <= 11 {
        let nf = n as f64;
        let gamma = poly(&[-2.273, 0.459], nf);
        let arg = gamma - (-w).ln_1p();
        if arg <= 0.0 {
            // W far below the support of the transform: reject outright.
            return 0.0;
        }
        let transformed = -arg.ln();
        let mu = poly(&SMALL_MEAN, nf);
        let sigma = poly(&SMALL_LN_SD, nf).exp();
        1.0 - normal.cdf((transformed - mu) / sigma)
    } else {
        let ln_n = (n as f64).ln();
        let transformed = (-w).ln_1p();
        let mu = poly(&LARGE_MEAN, ln_n);
        let sigma = poly(&LARGE_LN_SD, ln_n).exp();
        1.0 - normal.cdf((transformed - mu) / sigma)
    };
    p.clamp(0.0, 1.0)
}

/// Evaluate a polynomial with coefficients in ascending order of degree.
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
