//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::analysis::TestMethod;
use crate::data::Group;

use super::Report;

/// Format a [`Report`] for human-readable terminal output.
///
/// Uses ANSI colors and Unicode box drawing. The verdict leads, the
/// per-arm summaries and assumption checks follow, and every test
/// outcome appears in the fixed `Test Stat = ..., p-value = ...` form.
pub fn format_report(report: &Report) -> String {
    let mut output = String::new();

    // Header with the verdict
    let header = if report.is_significant() {
        format!(
            "{} {}",
            "\u{2713}".green().bold(),
            "SIGNIFICANT DIFFERENCE".green().bold()
        )
    } else {
        format!(
            "{} {}",
            "\u{2500}".yellow().bold(),
            "NO SIGNIFICANT DIFFERENCE".yellow().bold()
        )
    };

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&header));
    output.push_str(&format_box_separator());

    output.push_str(&format_box_line(&format!(
        "Metric: {}    alpha = {}",
        report.metric, report.alpha
    )));
    output.push_str(&format_box_separator());

    // Per-arm summaries
    for summary in [&report.control, &report.test] {
        let label = match summary.group {
            Group::Control => "Control:",
            Group::Test => "Test:   ",
        };
        output.push_str(&format_box_line(&format!(
            "{} n = {:<3} mean = {:<10.5} std = {:.5}",
            label, summary.stats.n, summary.stats.mean, summary.stats.std_dev
        )));
    }
    if let Some(lift) = report.relative_lift() {
        output.push_str(&format_box_line(&format!("Lift:    {:+.2}% vs control", lift)));
    }
    output.push_str(&format_box_separator());

    // Assumption checks
    output.push_str(&format_box_line(&"Assumption Checks:".bold().to_string()));
    let checks = [
        ("Normality (control)", report.assumptions.control_normality),
        ("Normality (test)", report.assumptions.test_normality),
        ("Equal variance", report.assumptions.variance),
    ];
    for (name, result) in checks {
        let flag = if result.is_significant(report.assumptions.alpha) {
            "FAIL".red().to_string()
        } else {
            "PASS".green().to_string()
        };
        output.push_str(&format_box_line(&format!("  {}: {}", name, flag)));
        output.push_str(&format_box_line(&format!("    {}", result)));
    }
    output.push_str(&format_box_separator());

    // Selected test and its outcome
    output.push_str(&format_box_line(&format!("Method: {}", report.method)));
    output.push_str(&format_box_line(&report.hypothesis.to_string()));

    output.push_str(&format_box_bottom());

    if report.method == TestMethod::MannWhitney {
        output.push_str(&format!(
            "\n{}\n",
            "Note: the rank test compares whole distributions, not means."
                .dimmed()
                .italic()
        ));
    }

    output
}

// Box drawing helpers

const BOX_WIDTH: usize = 60;

fn format_box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_line(content: &str) -> String {
    // Strip ANSI codes for length calculation
    let visible_len = strip_ansi_codes(content).chars().count();
    let padding = if visible_len < BOX_WIDTH - 2 {
        BOX_WIDTH - 2 - visible_len
    } else {
        0
    };
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(padding))
}

/// Strip ANSI escape codes for accurate length calculation.
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of ANSI sequence)
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::super::tests::fixture;
    use super::*;
    use crate::stats::TestResult;

    #[test]
    fn test_format_significant_report() {
        let output = format_report(&fixture());
        assert!(output.contains("SIGNIFICANT DIFFERENCE"));
        assert!(!output.contains("NO SIGNIFICANT DIFFERENCE"));
        assert!(output.contains("Metric: Purchase"));
        assert!(output.contains("Test Stat = -7.36654, p-value = 0.00002"));
        assert!(output.contains("PASS"));
        assert!(!output.contains("FAIL"));
    }

    #[test]
    fn test_format_non_significant_report() {
        let mut report = fixture();
        report.hypothesis = TestResult::new(-0.94156, 0.34933);
        let output = format_report(&report);
        assert!(output.contains("NO SIGNIFICANT DIFFERENCE"));
        assert!(output.contains("Test Stat = -0.94156, p-value = 0.34933"));
    }

    #[test]
    fn test_failed_check_is_flagged() {
        let mut report = fixture();
        report.assumptions.control_normality = TestResult::new(0.4912356796, 0.0000152362);
        report.method = TestMethod::MannWhitney;
        report.hypothesis = TestResult::new(24.0, 0.0060989459);
        let output = format_report(&report);

        assert!(output.contains("FAIL"));
        assert!(output.contains("Test Stat = 0.49124, p-value = 0.00002"));
        assert!(output.contains("Method: Mann-Whitney U test"));
        assert!(output.contains("rank test"));
    }

    #[test]
    fn test_box_lines_align_after_stripping_colors() {
        let output = format_report(&fixture());
        for line in strip_ansi_codes(&output).lines() {
            if line.starts_with('\u{2502}') {
                assert_eq!(
                    line.chars().count(),
                    BOX_WIDTH + 2,
                    "misaligned line: {:?}",
                    line
                );
            }
        }
    }

    #[test]
    fn test_strip_ansi_codes() {
        let colored = "\x1b[32mgreen\x1b[0m";
        assert_eq!(strip_ansi_codes(colored), "green");
    }
}
