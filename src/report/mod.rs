//! Analysis reports and their rendering.
//!
//! [`Report`] is the complete outcome of one A/B comparison: per-arm
//! summaries, assumption-check results, the selected method and the
//! final hypothesis test. [`Report::summary`] gives an uncolored
//! plain-text rendition, [`format_report`] renders for terminals, and
//! the serde derives cover machine-readable export.

mod terminal;

use serde::{Deserialize, Serialize};

pub use terminal::format_report;

use crate::analysis::{AssumptionChecks, TestMethod};
use crate::data::{Group, Metric};
use crate::stats::{SampleSummary, TestResult};

/// Descriptive summary of one arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Arm the summary describes.
    pub group: Group,
    /// Descriptive statistics of the configured metric.
    pub stats: SampleSummary,
}

/// Complete outcome of one A/B comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Metric the comparison was run on.
    pub metric: Metric,
    /// Significance level for every decision in the report.
    pub alpha: f64,
    /// Control-arm summary.
    pub control: GroupSummary,
    /// Test-arm summary.
    pub test: GroupSummary,
    /// Assumption-check outcomes.
    pub assumptions: AssumptionChecks,
    /// Hypothesis test the checks selected.
    pub method: TestMethod,
    /// Outcome of the selected test.
    pub hypothesis: TestResult,
}

impl Report {
    /// Whether the arms differ significantly at the report's alpha.
    pub fn is_significant(&self) -> bool {
        self.hypothesis.is_significant(self.alpha)
    }

    /// Relative change of the test-arm mean against the control-arm
    /// mean, in percent. `None` when the control mean is zero.
    pub fn relative_lift(&self) -> Option<f64> {
        if self.control.stats.mean == 0.0 {
            return None;
        }
        Some(
            (self.test.stats.mean - self.control.stats.mean) / self.control.stats.mean
                * 100.0,
        )
    }

    /// Plain-text multi-line summary without colors.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "A/B test on {} (alpha = {})\n",
            self.metric, self.alpha
        ));
        for summary in [&self.control, &self.test] {
            let label = match summary.group {
                Group::Control => "Control",
                Group::Test => "Test",
            };
            out.push_str(&format!(
                "{}: n = {}, mean = {:.5}, std = {:.5}\n",
                label, summary.stats.n, summary.stats.mean, summary.stats.std_dev
            ));
        }
        if let Some(lift) = self.relative_lift() {
            out.push_str(&format!("Lift: {:+.2}% vs control\n", lift));
        }
        out.push_str(&format!(
            "Shapiro-Wilk (control): {}\n",
            self.assumptions.control_normality
        ));
        out.push_str(&format!(
            "Shapiro-Wilk (test): {}\n",
            self.assumptions.test_normality
        ));
        out.push_str(&format!("Levene: {}\n", self.assumptions.variance));
        out.push_str(&format!("Method: {}\n", self.method));
        out.push_str(&format!("{}\n", self.hypothesis));
        let verdict = if self.is_significant() {
            "significant difference"
        } else {
            "no significant difference"
        };
        out.push_str(&format!("Verdict: {} at alpha = {}\n", verdict, self.alpha));
        out
    }
}
