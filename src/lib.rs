//! # bidtest
//!
//! Assumption-checked A/B testing for bidding campaign workbooks.
//!
//! The input is an xlsx workbook with one sheet per experiment arm
//! (control and test), each carrying the same four metric columns:
//! Impression, Click, Purchase and Earning. The analysis follows the
//! classical two-sample decision procedure:
//! - Shapiro-Wilk normality check on each arm
//! - Levene variance-homogeneity check across the arms
//! - Both hold: pooled-variance t-test; either fails: Mann-Whitney U
//!
//! Every test reports in the same fixed five-decimal form:
//!
//! ```text
//! Test Stat = -7.36654, p-value = 0.00002
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use bidtest::{run_workbook, Config};
//!
//! let config = Config::default();
//! let report = run_workbook("ab_data.xlsx".as_ref(), &config)?;
//!
//! println!("{}", report.summary());
//! if report.is_significant() {
//!     println!("the arms differ on {}", report.metric);
//! }
//! ```
//!
//! The statistical kernels in [`stats`] are plain functions over slices
//! and can be used on their own, without the workbook layer.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod data;
pub mod stats;

// Pipeline modules
pub mod analysis;
pub mod cli;
pub mod report;

// Re-exports for public API
pub use analysis::{
    analyze, run_workbook, select_test, AnalysisError, AssumptionChecks, TestMethod,
};
pub use config::Config;
pub use data::{load_workbook, AbDataset, DataError, Group, Metric, Observation, Workbook};
pub use report::{format_report, GroupSummary, Report};
pub use stats::{
    levene, mann_whitney_u, shapiro, ttest_ind, Center, SampleSummary, StatError, TestResult,
};
