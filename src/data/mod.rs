//! Campaign observations and the workbook loader.
//!
//! The input is an xlsx workbook with one sheet per experiment arm. Both
//! sheets carry the same four metric columns:
//!
//! ```text
//! Impression | Click | Purchase | Earning
//! ```
//!
//! [`load_workbook`] reads both sheets, tags every row with its
//! [`Group`], and returns a single [`AbDataset`]. Any structural problem
//! with the file is a [`DataError`]; nothing is silently coerced or
//! dropped, so a loaded dataset is known-clean before analysis starts.

mod xlsx;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use xlsx::{Cell, Sheet, Workbook};

/// Experiment arm a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// The arm running the existing treatment.
    Control,
    /// The arm running the candidate treatment.
    Test,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Control => write!(f, "control"),
            Group::Test => write!(f, "test"),
        }
    }
}

/// Metric column recorded for every observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Times the ad was shown.
    Impression,
    /// Times the ad was clicked.
    Click,
    /// Purchases made after clicking. The primary success metric.
    #[default]
    Purchase,
    /// Revenue attributed to purchases.
    Earning,
}

impl Metric {
    /// The column header this metric is stored under.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Impression => "Impression",
            Metric::Click => "Click",
            Metric::Purchase => "Purchase",
            Metric::Earning => "Earning",
        }
    }

    /// All metrics, in column order.
    pub fn all() -> [Metric; 4] {
        [
            Metric::Impression,
            Metric::Click,
            Metric::Purchase,
            Metric::Earning,
        ]
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// One row of campaign data, tagged with its arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Arm this row came from.
    pub group: Group,
    /// Times the ad was shown.
    pub impression: f64,
    /// Times the ad was clicked.
    pub click: f64,
    /// Purchases made after clicking.
    pub purchase: f64,
    /// Revenue attributed to purchases.
    pub earning: f64,
}

impl Observation {
    /// The value of one metric column.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Impression => self.impression,
            Metric::Click => self.click,
            Metric::Purchase => self.purchase,
            Metric::Earning => self.earning,
        }
    }
}

/// All observations from both arms of an experiment.
#[derive(Debug, Clone)]
pub struct AbDataset {
    /// Rows in load order: the control sheet first, then the test sheet.
    pub observations: Vec<Observation>,
}

impl AbDataset {
    /// Wrap a set of observations.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Number of observations in one arm.
    pub fn count(&self, group: Group) -> usize {
        self.observations.iter().filter(|o| o.group == group).count()
    }

    /// Total number of observations across both arms.
    pub fn total(&self) -> usize {
        self.observations.len()
    }

    /// The values of one metric for one arm, in load order.
    pub fn values(&self, group: Group, metric: Metric) -> Vec<f64> {
        self.observations
            .iter()
            .filter(|o| o.group == group)
            .map(|o| o.value(metric))
            .collect()
    }

    /// Check that both arms carry at least `min_rows` observations.
    ///
    /// # Errors
    ///
    /// [`DataError::InsufficientRows`] naming the first arm that falls
    /// short.
    pub fn validate(&self, min_rows: usize) -> Result<(), DataError> {
        for group in [Group::Control, Group::Test] {
            let got = self.count(group);
            if got < min_rows {
                return Err(DataError::InsufficientRows {
                    group,
                    got,
                    min: min_rows,
                });
            }
        }
        Ok(())
    }
}

/// Everything that can go wrong between a file path and a clean dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The workbook file could not be opened or read.
    #[error("cannot read workbook: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable zip archive.
    #[error("workbook is not a valid xlsx archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An XML part inside the archive failed to parse.
    #[error("workbook XML is malformed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive parses but its parts do not fit together.
    #[error("workbook structure error: {0}")]
    Format(String),

    /// The requested sheet name does not exist in the workbook.
    #[error("sheet '{name}' not found (workbook has: {available:?})")]
    SheetNotFound {
        /// The name that was asked for.
        name: String,
        /// The names that actually exist.
        available: Vec<String>,
    },

    /// A required metric column is absent from a sheet's header row.
    #[error("sheet '{sheet}' has no '{column}' column")]
    MissingColumn {
        /// Sheet whose header was scanned.
        sheet: String,
        /// The column header that was expected.
        column: String,
    },

    /// A data cell in a metric column is not a finite number.
    #[error("sheet '{sheet}' row {row}: '{column}' value '{value}' is not numeric")]
    MalformedValue {
        /// Sheet the cell is in.
        sheet: String,
        /// Column header the cell falls under.
        column: String,
        /// 1-based row position within the sheet.
        row: usize,
        /// The offending cell content.
        value: String,
    },

    /// An arm has too few usable rows for the requested analysis.
    #[error("{group} group has {got} rows, need at least {min}")]
    InsufficientRows {
        /// Arm that fell short.
        group: Group,
        /// Rows actually present.
        got: usize,
        /// Rows required.
        min: usize,
    },
}

/// Load both arms of an experiment from an xlsx workbook.
///
/// Each sheet must carry all four metric columns in its header row (the
/// first row holding any value; leading blank rows are tolerated and
/// header whitespace is trimmed). Data rows follow in sheet order; rows
/// that are entirely blank are skipped, but a blank or non-numeric cell
/// in a row that holds any other value is an error.
///
/// # Errors
///
/// Any [`DataError`] raised while opening the file, locating the sheets,
/// or converting cells.
pub fn load_workbook(
    path: &Path,
    control_sheet: &str,
    test_sheet: &str,
) -> Result<AbDataset, DataError> {
    let mut workbook = Workbook::open(path)?;

    let control = workbook.read_sheet(control_sheet)?;
    let test = workbook.read_sheet(test_sheet)?;

    let mut observations = sheet_observations(&control, Group::Control)?;
    observations.extend(sheet_observations(&test, Group::Test)?);
    Ok(AbDataset::new(observations))
}

/// Convert one sheet's rows into tagged observations.
fn sheet_observations(sheet: &Sheet, group: Group) -> Result<Vec<Observation>, DataError> {
    let header_index = sheet
        .rows
        .iter()
        .position(|row| row.iter().any(|cell| !cell.is_empty()))
        .ok_or_else(|| {
            DataError::Format(format!("sheet '{}' has no header row", sheet.name))
        })?;

    let columns = locate_columns(sheet, &sheet.rows[header_index])?;

    let mut observations = Vec::new();
    for (offset, row) in sheet.rows[header_index + 1..].iter().enumerate() {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let row_number = header_index + offset + 2;
        let mut values = [0.0_f64; 4];
        for (metric, slot) in Metric::all().into_iter().zip(values.iter_mut()) {
            let index = columns[metric_slot(metric)];
            let cell = row.get(index).unwrap_or(&Cell::Empty);
            *slot = numeric_value(cell).ok_or_else(|| DataError::MalformedValue {
                sheet: sheet.name.clone(),
                column: metric.column_name().to_string(),
                row: row_number,
                value: cell_description(cell),
            })?;
        }
        observations.push(Observation {
            group,
            impression: values[0],
            click: values[1],
            purchase: values[2],
            earning: values[3],
        });
    }
    Ok(observations)
}

/// Column index of every metric in the header row.
fn locate_columns(sheet: &Sheet, header: &[Cell]) -> Result<[usize; 4], DataError> {
    let mut columns = [0usize; 4];
    for metric in Metric::all() {
        let index = header
            .iter()
            .position(|cell| match cell {
                Cell::Text(text) => text.trim() == metric.column_name(),
                _ => false,
            })
            .ok_or_else(|| DataError::MissingColumn {
                sheet: sheet.name.clone(),
                column: metric.column_name().to_string(),
            })?;
        columns[metric_slot(metric)] = index;
    }
    Ok(columns)
}

fn metric_slot(metric: Metric) -> usize {
    match metric {
        Metric::Impression => 0,
        Metric::Click => 1,
        Metric::Purchase => 2,
        Metric::Earning => 3,
    }
}

/// A cell's numeric value, if it has one.
///
/// Numeric cells must be finite; text cells are accepted when they parse
/// as a finite number, which covers exports that store numbers as text.
fn numeric_value(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(value) => value.is_finite().then_some(*value),
        Cell::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Cell::Empty => None,
    }
}

fn cell_description(cell: &Cell) -> String {
    match cell {
        Cell::Number(value) => value.to_string(),
        Cell::Text(text) => text.clone(),
        Cell::Empty => "(empty)".to_string(),
    }
}
