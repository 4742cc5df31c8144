//! Minimal xlsx workbook reader.
//!
//! An xlsx file is a zip archive of XML parts. This reader touches only the
//! parts needed to pull tabular data out of named sheets:
//!
//! - `xl/workbook.xml` - sheet names and their relationship ids
//! - `xl/_rels/workbook.xml.rels` - relationship id to worksheet part path
//! - `xl/sharedStrings.xml` - the shared-string table (optional part)
//! - `xl/worksheets/sheetN.xml` - the `sheetData` cell grid
//!
//! Cells resolve to [`Cell::Number`], [`Cell::Text`] or [`Cell::Empty`].
//! Numeric cells (`t` absent or `"n"`), shared strings (`t="s"`), inline
//! strings (`t="inlineStr"`) and formula strings (`t="str"`) are supported,
//! which covers workbooks produced by Excel and the usual dataframe
//! writers. Styling, formulas, merged ranges and everything else in the
//! package is ignored.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::DataError;

/// One worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A numeric cell value.
    Number(f64),
    /// A string cell value (shared, inline or formula result).
    Text(String),
    /// No stored value.
    Empty,
}

impl Cell {
    /// Whether the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A fully read worksheet: rows of cells in document order.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Sheet name as shown in the workbook tab.
    pub name: String,
    /// Cell rows. Gaps between referenced cells are filled with
    /// [`Cell::Empty`]; rows absent from the XML do not appear at all.
    pub rows: Vec<Vec<Cell>>,
}

struct SheetEntry {
    name: String,
    path: String,
}

/// An opened xlsx workbook.
///
/// Opening parses the sheet directory and the shared-string table once;
/// individual sheets are decoded on demand by [`Workbook::read_sheet`].
pub struct Workbook {
    archive: ZipArchive<BufReader<File>>,
    sheets: Vec<SheetEntry>,
    shared_strings: Vec<String>,
}

impl Workbook {
    /// Open a workbook file.
    ///
    /// # Errors
    ///
    /// [`DataError::Io`] if the file cannot be opened, [`DataError::Zip`] /
    /// [`DataError::Format`] if it is not a readable xlsx package.
    pub fn open(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let named = parse_workbook_part(&mut archive)?;
        let targets = parse_relationships(&mut archive)?;
        let sheets = named
            .into_iter()
            .map(|(name, rel_id)| {
                let target = targets
                    .iter()
                    .find(|(id, _)| *id == rel_id)
                    .map(|(_, target)| target.clone())
                    .ok_or_else(|| {
                        DataError::Format(format!(
                            "sheet '{}' references unknown relationship '{}'",
                            name, rel_id
                        ))
                    })?;
                Ok(SheetEntry {
                    name,
                    path: normalize_target(&target),
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let shared_strings = parse_shared_strings(&mut archive)?;

        Ok(Self {
            archive,
            sheets,
            shared_strings,
        })
    }

    /// Names of all sheets, in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Read the sheet with the given (exact) name.
    ///
    /// # Errors
    ///
    /// [`DataError::SheetNotFound`] if no sheet carries that name; the
    /// error lists the names that do exist.
    pub fn read_sheet(&mut self, name: &str) -> Result<Sheet, DataError> {
        let entry = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DataError::SheetNotFound {
                name: name.to_string(),
                available: self.sheets.iter().map(|s| s.name.clone()).collect(),
            })?;
        let path = entry.path.clone();
        let rows = parse_sheet_part(&mut self.archive, &path, &self.shared_strings)?;
        Ok(Sheet {
            name: name.to_string(),
            rows,
        })
    }
}

/// Resolve a relationship target to a package path.
///
/// Targets are normally relative to `xl/` ("worksheets/sheet1.xml"); a
/// leading slash marks an absolute package path.
fn normalize_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("xl/{}", target)
    }
}

/// Sheet (name, relationship id) pairs from `xl/workbook.xml`.
fn parse_workbook_part(
    archive: &mut ZipArchive<BufReader<File>>,
) -> Result<Vec<(String, String)>, DataError> {
    let part = archive.by_name("xl/workbook.xml")?;
    let mut reader = Reader::from_reader(BufReader::new(part));
    reader.trim_text(true);

    let mut sheets = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = Some(attr.unescape_value()?.into_owned()),
                        b"r:id" => rel_id = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(name), Some(rel_id)) = (name, rel_id) {
                    sheets.push((name, rel_id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if sheets.is_empty() {
        return Err(DataError::Format(
            "workbook declares no sheets".to_string(),
        ));
    }
    Ok(sheets)
}

/// (relationship id, target) pairs from `xl/_rels/workbook.xml.rels`.
fn parse_relationships(
    archive: &mut ZipArchive<BufReader<File>>,
) -> Result<Vec<(String, String)>, DataError> {
    let part = archive.by_name("xl/_rels/workbook.xml.rels")?;
    let mut reader = Reader::from_reader(BufReader::new(part));
    reader.trim_text(true);

    let mut relationships = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attr.unescape_value()?.into_owned()),
                        b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    relationships.push((id, target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(relationships)
}

/// The shared-string table, or an empty table when the part is absent.
///
/// Rich-text runs inside one `<si>` are concatenated, matching how
/// spreadsheet applications display them.
fn parse_shared_strings(
    archive: &mut ZipArchive<BufReader<File>>,
) -> Result<Vec<String>, DataError> {
    let part = match archive.by_name("xl/sharedStrings.xml") {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut reader = Reader::from_reader(BufReader::new(part));
    reader.trim_text(true);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_entry = false;
    let mut in_text = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"si" => {
                    in_entry = true;
                    current.clear();
                }
                b"t" if in_entry => in_text = true,
                _ => {}
            },
            Event::Text(ref t) if in_text => current.push_str(&t.unescape()?),
            Event::End(ref e) => match e.name().as_ref() {
                b"si" => {
                    in_entry = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// Decode one worksheet part into cell rows.
fn parse_sheet_part(
    archive: &mut ZipArchive<BufReader<File>>,
    path: &str,
    shared_strings: &[String],
) -> Result<Vec<Vec<Cell>>, DataError> {
    let part = match archive.by_name(path) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DataError::Format(format!(
                "worksheet part '{}' is missing from the archive",
                path
            )));
        }
        Err(e) => return Err(e.into()),
    };
    let mut reader = Reader::from_reader(BufReader::new(part));
    reader.trim_text(true);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut row: Vec<Cell> = Vec::new();
    let mut in_row = false;
    // Per-cell state, live between <c> and </c>.
    let mut cell_type: Vec<u8> = Vec::new();
    let mut cell_column: Option<usize> = None;
    let mut cell_value: Option<String> = None;
    let mut in_value = false;
    let mut in_inline_text = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"row" => {
                if in_row {
                    rows.push(std::mem::take(&mut row));
                }
                in_row = true;
                row.clear();
            }
            Event::Empty(ref e) if e.name().as_ref() == b"row" => {
                if in_row {
                    rows.push(std::mem::take(&mut row));
                    in_row = false;
                }
                rows.push(Vec::new());
            }
            Event::Start(ref e) if e.name().as_ref() == b"c" => {
                cell_type.clear();
                cell_type.extend_from_slice(b"n");
                cell_column = None;
                cell_value = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"r" => {
                            cell_column = column_index(attr.value.as_ref());
                        }
                        b"t" => {
                            cell_type.clear();
                            cell_type.extend_from_slice(attr.value.as_ref());
                        }
                        _ => {}
                    }
                }
            }
            Event::Empty(ref e) if e.name().as_ref() == b"c" => {
                let mut column = None;
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r" {
                        column = column_index(attr.value.as_ref());
                    }
                }
                place_cell(&mut row, column, Cell::Empty);
            }
            Event::Start(ref e) if e.name().as_ref() == b"v" => in_value = true,
            Event::Start(ref e) if e.name().as_ref() == b"t" => in_inline_text = true,
            Event::Text(ref t) if in_value || in_inline_text => {
                let text = t.unescape()?;
                match &mut cell_value {
                    Some(existing) => existing.push_str(&text),
                    None => cell_value = Some(text.into_owned()),
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    let cell = resolve_cell(&cell_type, cell_value.take(), shared_strings)?;
                    place_cell(&mut row, cell_column, cell);
                }
                b"row" => {
                    rows.push(std::mem::take(&mut row));
                    in_row = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    if in_row {
        rows.push(row);
    }
    Ok(rows)
}

/// Turn raw cell state into a [`Cell`].
fn resolve_cell(
    cell_type: &[u8],
    value: Option<String>,
    shared_strings: &[String],
) -> Result<Cell, DataError> {
    let Some(value) = value else {
        return Ok(Cell::Empty);
    };
    match cell_type {
        b"s" => {
            let index: usize = value.trim().parse().map_err(|_| {
                DataError::Format(format!("invalid shared-string index '{}'", value))
            })?;
            let text = shared_strings.get(index).ok_or_else(|| {
                DataError::Format(format!("shared-string index {} out of range", index))
            })?;
            Ok(Cell::Text(text.clone()))
        }
        b"inlineStr" | b"str" => Ok(Cell::Text(value)),
        b"e" => Ok(Cell::Text(value)),
        // "n", "b" and untyped cells all store their value numerically.
        _ => match value.trim().parse::<f64>() {
            Ok(number) => Ok(Cell::Number(number)),
            Err(_) => Ok(Cell::Text(value)),
        },
    }
}

/// Append a cell at its referenced column, padding gaps with empties.
fn place_cell(row: &mut Vec<Cell>, column: Option<usize>, cell: Cell) {
    match column {
        Some(index) => {
            while row.len() < index {
                row.push(Cell::Empty);
            }
            if row.len() == index {
                row.push(cell);
            } else {
                row[index] = cell;
            }
        }
        None => row.push(cell),
    }
}

/// Zero-based column index from an A1-style cell reference (`"B3"` -> 1).
fn column_index(reference: &[u8]) -> Option<usize> {
    let mut index: usize = 0;
    let mut seen_letter = false;
    for &byte in reference {
        if byte.is_ascii_uppercase() {
            index = index * 26 + (byte - b'A' + 1) as usize;
            seen_letter = true;
        } else {
            break;
        }
    }
    if seen_letter {
        Some(index - 1)
    } else {
        None
    }
}
