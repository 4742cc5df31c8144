//! CLI argument parsing for bidtest.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;
use crate::data::Metric;
use crate::stats::Center;

/// Output format for the analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal box (default)
    Text,
    /// Uncolored plain-text summary
    Plain,
    /// JSON for machine parsing
    Json,
}

/// Metric column to compare between the arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Times the ad was shown
    Impression,
    /// Times the ad was clicked
    Click,
    /// Purchases made after clicking (default)
    Purchase,
    /// Revenue attributed to purchases
    Earning,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Impression => Metric::Impression,
            MetricArg::Click => Metric::Click,
            MetricArg::Purchase => Metric::Purchase,
            MetricArg::Earning => Metric::Earning,
        }
    }
}

/// Centering statistic for the Levene variance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CenterArg {
    /// Median-centered deviations (Brown-Forsythe, robust to skew)
    Median,
    /// Mean-centered deviations (original Levene)
    Mean,
}

impl From<CenterArg> for Center {
    fn from(arg: CenterArg) -> Self {
        match arg {
            CenterArg::Median => Center::Median,
            CenterArg::Mean => Center::Mean,
        }
    }
}

/// Command-line arguments for the bidtest binary.
#[derive(Parser, Debug)]
#[command(name = "bidtest")]
#[command(version)]
#[command(about = "A/B test analysis for bidding campaign workbooks", long_about = None)]
pub struct Cli {
    /// Path to the xlsx workbook holding both arms
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Name of the sheet holding the control arm
    #[arg(
        long = "control-sheet",
        value_name = "NAME",
        default_value = "Control Group"
    )]
    pub control_sheet: String,

    /// Name of the sheet holding the test arm
    #[arg(long = "test-sheet", value_name = "NAME", default_value = "Test Group")]
    pub test_sheet: String,

    /// Metric column to compare
    #[arg(short, long, value_enum, default_value = "purchase")]
    pub metric: MetricArg,

    /// Significance level for the checks and the final test
    #[arg(short, long, value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Centering statistic for the Levene variance check
    #[arg(long, value_enum, default_value = "median")]
    pub center: CenterArg,

    /// Report output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Build an analysis [`Config`] from the parsed arguments.
    ///
    /// The result still needs [`Config::validate`]; out-of-range values
    /// like `--alpha 1.5` are reported there rather than panicking here.
    pub fn to_config(&self) -> Config {
        Config {
            control_sheet: self.control_sheet.clone(),
            test_sheet: self.test_sheet.clone(),
            metric: self.metric.into(),
            alpha: self.alpha,
            levene_center: self.center.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["bidtest", "ab_data.xlsx"]);
        assert_eq!(cli.workbook, PathBuf::from("ab_data.xlsx"));
        assert_eq!(cli.control_sheet, "Control Group");
        assert_eq!(cli.test_sheet, "Test Group");
        assert_eq!(cli.metric, MetricArg::Purchase);
        assert_eq!(cli.alpha, 0.05);
        assert_eq!(cli.center, CenterArg::Median);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "bidtest",
            "campaign.xlsx",
            "--control-sheet",
            "Variant A",
            "--test-sheet",
            "Variant B",
            "--metric",
            "earning",
            "--alpha",
            "0.01",
            "--center",
            "mean",
            "--format",
            "json",
            "--debug",
        ]);
        assert_eq!(cli.control_sheet, "Variant A");
        assert_eq!(cli.test_sheet, "Variant B");
        assert_eq!(cli.metric, MetricArg::Earning);
        assert_eq!(cli.alpha, 0.01);
        assert_eq!(cli.center, CenterArg::Mean);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_requires_workbook() {
        assert!(Cli::try_parse_from(["bidtest"]).is_err());
    }

    #[test]
    fn test_config_conversion() {
        let cli = Cli::parse_from(["bidtest", "ab_data.xlsx", "--metric", "click"]);
        let config = cli.to_config();
        assert_eq!(config.metric, Metric::Click);
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.levene_center, Center::Median);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_alpha_is_caught_by_validate() {
        let cli = Cli::parse_from(["bidtest", "ab_data.xlsx", "--alpha", "1.5"]);
        assert!(cli.to_config().validate().is_err());
    }
}
