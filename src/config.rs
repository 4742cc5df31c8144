//! Configuration for A/B test analysis.

use crate::data::Metric;
use crate::stats::Center;

/// Configuration options for one analysis run.
///
/// Covers where the two arms live in the workbook, which metric to
/// compare, and how the assumption checks are judged.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Workbook layout
    // =========================================================================

    /// Name of the sheet holding the control arm.
    ///
    /// Matched exactly against the workbook's sheet names.
    /// Default: "Control Group".
    pub control_sheet: String,

    /// Name of the sheet holding the test arm.
    ///
    /// Matched exactly against the workbook's sheet names.
    /// Default: "Test Group".
    pub test_sheet: String,

    // =========================================================================
    // Analysis settings
    // =========================================================================

    /// Metric column to compare between the arms.
    ///
    /// Default: [`Metric::Purchase`].
    pub metric: Metric,

    /// Significance level for every decision in the run.
    ///
    /// Used three ways: to judge the normality checks, to judge the
    /// variance check, and to judge the final hypothesis test.
    /// Default: 0.05.
    pub alpha: f64,

    /// Centering statistic for the Levene variance check.
    ///
    /// The median-centered form (Brown-Forsythe) is robust to the skewed
    /// revenue data this tool usually sees. Default: [`Center::Median`].
    pub levene_center: Center,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Workbook layout
            control_sheet: "Control Group".to_string(),
            test_sheet: "Test Group".to_string(),

            // Analysis settings
            metric: Metric::Purchase,
            alpha: 0.05,
            levene_center: Center::Median,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a strict configuration for launch decisions.
    ///
    /// Uses alpha = 0.01, so only strong evidence counts as a
    /// significant difference.
    pub fn strict() -> Self {
        Self {
            alpha: 0.01,
            ..Default::default()
        }
    }

    /// Create a lenient configuration for exploratory analysis.
    ///
    /// Uses alpha = 0.10 to surface weaker signals worth a follow-up
    /// experiment.
    pub fn exploratory() -> Self {
        Self {
            alpha: 0.10,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the control-arm sheet name.
    pub fn control_sheet(mut self, name: impl Into<String>) -> Self {
        self.control_sheet = name.into();
        self
    }

    /// Set the test-arm sheet name.
    pub fn test_sheet(mut self, name: impl Into<String>) -> Self {
        self.test_sheet = name.into();
        self
    }

    /// Set the metric to compare.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the significance level.
    pub fn alpha(mut self, alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha < 1.0, "alpha must be in (0, 1)");
        self.alpha = alpha;
        self
    }

    /// Set the Levene centering statistic.
    pub fn levene_center(mut self, center: Center) -> Self {
        self.levene_center = center;
        self
    }

    /// Check if the configuration is valid.
    ///
    /// Returns an error message if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err("alpha must be in (0, 1)".to_string());
        }
        if self.control_sheet.is_empty() {
            return Err("control_sheet must not be empty".to_string());
        }
        if self.test_sheet.is_empty() {
            return Err("test_sheet must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.control_sheet, "Control Group");
        assert_eq!(config.test_sheet, "Test Group");
        assert_eq!(config.metric, Metric::Purchase);
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.levene_center, Center::Median);
    }

    #[test]
    fn test_preset_configs() {
        assert_eq!(Config::strict().alpha, 0.01);
        assert_eq!(Config::exploratory().alpha, 0.10);
        assert_eq!(Config::strict().metric, Metric::Purchase);
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::new()
            .control_sheet("Variant A")
            .test_sheet("Variant B")
            .metric(Metric::Earning)
            .alpha(0.01)
            .levene_center(Center::Mean);

        assert_eq!(config.control_sheet, "Variant A");
        assert_eq!(config.test_sheet, "Variant B");
        assert_eq!(config.metric, Metric::Earning);
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.levene_center, Center::Mean);
    }

    #[test]
    fn test_validation() {
        let valid = Config::default();
        assert!(valid.validate().is_ok());

        let mut invalid = Config::default();
        invalid.alpha = 1.0;
        assert!(invalid.validate().is_err());

        let mut invalid = Config::default();
        invalid.control_sheet = String::new();
        assert!(invalid.validate().is_err());
    }

    #[test]
    #[should_panic]
    fn test_invalid_alpha() {
        Config::new().alpha(1.5);
    }
}
