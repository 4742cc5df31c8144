//! Assumption checks, test selection, and the analysis pipeline.
//!
//! The pipeline follows the classical two-sample decision procedure:
//!
//! 1. **Normality** ([`shapiro`]): Shapiro-Wilk on each arm separately
//! 2. **Variance homogeneity** ([`levene`]): Levene across both arms
//! 3. **Selection** ([`select_test`]): both assumptions hold -> pooled
//!    t-test, either fails -> Mann-Whitney U
//! 4. **Report assembly**: summaries, check outcomes and the final
//!    hypothesis test in one [`Report`]

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::data::{self, AbDataset, DataError, Group};
use crate::report::{GroupSummary, Report};
use crate::stats::{
    levene, mann_whitney_u, shapiro, ttest_ind, SampleSummary, StatError, TestResult,
    SHAPIRO_MIN_SAMPLES,
};

/// Error from the end-to-end analysis pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Loading or validating the dataset failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A statistical kernel rejected its input.
    #[error(transparent)]
    Stat(#[from] StatError),
}

/// Hypothesis test chosen by the assumption checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestMethod {
    /// Pooled-variance two-sample t-test. Requires normality in both
    /// arms and homogeneous variances.
    StudentT,
    /// Mann-Whitney U rank test. The fallback when either parametric
    /// assumption fails.
    MannWhitney,
}

impl std::fmt::Display for TestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestMethod::StudentT => write!(f, "Student's t-test"),
            TestMethod::MannWhitney => write!(f, "Mann-Whitney U test"),
        }
    }
}

/// Outcomes of the parametric-assumption checks, with the significance
/// level they are judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssumptionChecks {
    /// Shapiro-Wilk on the control arm.
    pub control_normality: TestResult,
    /// Shapiro-Wilk on the test arm.
    pub test_normality: TestResult,
    /// Levene across both arms.
    pub variance: TestResult,
    /// Significance level the flags below are derived at.
    pub alpha: f64,
}

impl AssumptionChecks {
    /// Whether both arms pass the normality check.
    ///
    /// A significant Shapiro-Wilk result rejects normality, so the
    /// assumption holds only when neither arm's p-value falls below
    /// alpha.
    pub fn normality_holds(&self) -> bool {
        !self.control_normality.is_significant(self.alpha)
            && !self.test_normality.is_significant(self.alpha)
    }

    /// Whether the equal-variance check passes.
    pub fn variances_equal(&self) -> bool {
        !self.variance.is_significant(self.alpha)
    }
}

/// Pick the hypothesis test the assumption outcomes allow.
///
/// The parametric route needs both flags: normality in each arm and
/// homogeneous variances. A single failed assumption routes the
/// comparison through the rank-based test instead.
pub fn select_test(normality_ok: bool, variances_ok: bool) -> TestMethod {
    if normality_ok && variances_ok {
        TestMethod::StudentT
    } else {
        TestMethod::MannWhitney
    }
}

/// Run the full A/B analysis on a loaded dataset.
///
/// This is the main entry point once data is in memory. It:
/// 1. Validates that both arms carry enough rows
/// 2. Summarizes the configured metric per arm
/// 3. Runs the normality and variance checks
/// 4. Selects and runs the hypothesis test
/// 5. Returns a detailed report
///
/// # Arguments
///
/// * `dataset` - Observations from both arms
/// * `config` - Metric, significance level and check options
///
/// # Errors
///
/// [`AnalysisError::Data`] when an arm has fewer rows than the
/// normality check needs, [`AnalysisError::Stat`] when a kernel rejects
/// its input (for example a constant arm).
///
/// # Example
///
/// ```ignore
/// use bidtest::{analyze, load_workbook, Config};
///
/// let config = Config::default();
/// let dataset = load_workbook("ab_data.xlsx".as_ref(), &config.control_sheet, &config.test_sheet)?;
/// let report = analyze(&dataset, &config)?;
///
/// println!("{}", report.hypothesis);
/// ```
pub fn analyze(dataset: &AbDataset, config: &Config) -> Result<Report, AnalysisError> {
    // 1. Validate arm sizes
    dataset.validate(SHAPIRO_MIN_SAMPLES)?;

    // 2. Extract and summarize the metric under test
    let control = dataset.values(Group::Control, config.metric);
    let test = dataset.values(Group::Test, config.metric);
    debug!(
        metric = %config.metric,
        n_control = control.len(),
        n_test = test.len(),
        "analyzing dataset"
    );

    let control_summary = GroupSummary {
        group: Group::Control,
        stats: SampleSummary::describe(&control),
    };
    let test_summary = GroupSummary {
        group: Group::Test,
        stats: SampleSummary::describe(&test),
    };

    // 3. Assumption checks
    let control_normality = shapiro(&control)?;
    let test_normality = shapiro(&test)?;
    let variance = levene(&control, &test, config.levene_center)?;
    let assumptions = AssumptionChecks {
        control_normality,
        test_normality,
        variance,
        alpha: config.alpha,
    };

    // 4. Select and run the hypothesis test
    let method = select_test(assumptions.normality_holds(), assumptions.variances_equal());
    debug!(?method, "selected hypothesis test");
    let hypothesis = match method {
        TestMethod::StudentT => ttest_ind(&control, &test, true)?,
        TestMethod::MannWhitney => mann_whitney_u(&control, &test)?,
    };

    // 5. Assemble the report
    Ok(Report {
        metric: config.metric,
        alpha: config.alpha,
        control: control_summary,
        test: test_summary,
        assumptions,
        method,
        hypothesis,
    })
}

/// Load a workbook and analyze it in one call.
///
/// # Errors
///
/// Any [`AnalysisError`] raised while loading or analyzing.
pub fn run_workbook(path: &Path, config: &Config) -> Result<Report, AnalysisError> {
    let dataset = data::load_workbook(path, &config.control_sheet, &config.test_sheet)?;
    analyze(&dataset, config)
}
