//! Shared workbook fixtures for integration tests.
//!
//! Builds small but structurally faithful xlsx packages: content types,
//! package relationships, a shared-string table for the headers, and one
//! worksheet part per arm. Headers go through the shared-string table the
//! way spreadsheet applications write them, so the loader's string
//! resolution is exercised end to end.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4"><si><t>Impression</t></si><si><t>Click</t></si><si><t>Purchase</t></si><si><t>Earning</t></si></sst>"#;

/// Write an xlsx workbook with the given sheets.
///
/// Each sheet is a name plus data rows of (impression, click, purchase,
/// earning). The four-column header row is emitted first.
pub fn write_workbook(path: &Path, sheets: &[(&str, &[[f64; 4]])]) {
    let mut workbook_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook_xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            name,
            i + 1,
            i + 1
        ));
        rels_xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    workbook_xml.push_str("</sheets></workbook>");
    rels_xml.push_str("</Relationships>");

    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut put = |name: &str, body: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    };
    put("[Content_Types].xml", CONTENT_TYPES);
    put("_rels/.rels", ROOT_RELS);
    put("xl/workbook.xml", &workbook_xml);
    put("xl/_rels/workbook.xml.rels", &rels_xml);
    put("xl/sharedStrings.xml", SHARED_STRINGS);
    for (i, (_, rows)) in sheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", i + 1), &sheet_xml(rows));
    }
    zip.finish().unwrap();
}

/// Standard two-sheet workbook whose Purchase columns carry the given
/// arms. The other columns are deterministic functions of the purchase
/// value (impression x1000, click x10, earning x2).
pub fn ab_workbook(path: &Path, control_purchases: &[f64], test_purchases: &[f64]) {
    let expand = |values: &[f64]| {
        values
            .iter()
            .map(|&p| [p * 1000.0, p * 10.0, p, p * 2.0])
            .collect::<Vec<_>>()
    };
    let control = expand(control_purchases);
    let test = expand(test_purchases);
    write_workbook(
        path,
        &[
            ("Control Group", control.as_slice()),
            ("Test Group", test.as_slice()),
        ],
    );
}

/// Workbook whose control sheet has a non-numeric Purchase cell in its
/// second data row.
pub fn workbook_with_bad_cell(path: &Path) {
    let sheet1 = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c><c r="D1" t="s"><v>3</v></c></row><row r="2"><c r="A2"><v>1000</v></c><c r="B2"><v>100</v></c><c r="C2"><v>550</v></c><c r="D2"><v>1100</v></c></row><row r="3"><c r="A3"><v>2000</v></c><c r="B3"><v>200</v></c><c r="C3" t="inlineStr"><is><t>n/a</t></is></c><c r="D3"><v>1200</v></c></row></sheetData></worksheet>"#;
    let sheet2 = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c><c r="D1" t="s"><v>3</v></c></row><row r="2"><c r="A2"><v>1000</v></c><c r="B2"><v>100</v></c><c r="C2"><v>560</v></c><c r="D2"><v>1120</v></c></row></sheetData></worksheet>"#;

    let workbook_xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Control Group" sheetId="1" r:id="rId1"/><sheet name="Test Group" sheetId="2" r:id="rId2"/></sheets></workbook>"#;
    let rels_xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut put = |name: &str, body: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    };
    put("[Content_Types].xml", CONTENT_TYPES);
    put("_rels/.rels", ROOT_RELS);
    put("xl/workbook.xml", workbook_xml);
    put("xl/_rels/workbook.xml.rels", rels_xml);
    put("xl/sharedStrings.xml", SHARED_STRINGS);
    put("xl/worksheets/sheet1.xml", sheet1);
    put("xl/worksheets/sheet2.xml", sheet2);
    zip.finish().unwrap();
}

fn sheet_xml(rows: &[[f64; 4]]) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    // Header row through the shared-string table.
    body.push_str(r#"<row r="1">"#);
    for (c, index) in [("A", 0), ("B", 1), ("C", 2), ("D", 3)] {
        body.push_str(&format!(r#"<c r="{}1" t="s"><v>{}</v></c>"#, c, index));
    }
    body.push_str("</row>");
    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 2;
        body.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (column, value) in ["A", "B", "C", "D"].into_iter().zip(row.iter()) {
            body.push_str(&format!(
                r#"<c r="{}{}"><v>{}</v></c>"#,
                column, row_number, value
            ));
        }
        body.push_str("</row>");
    }
    body.push_str("</sheetData></worksheet>");
    body
}

/// Control-arm purchases for the standard significant fixture.
pub const FIX_CONTROL: [f64; 6] = [540.0, 550.0, 560.0, 545.0, 555.0, 550.0];

/// Test-arm purchases for the standard significant fixture.
pub const FIX_TEST: [f64; 6] = [570.11, 578.11, 582.11, 582.11, 586.11, 594.11];

/// Control-arm purchases with two extreme outliers; fails normality.
pub const SKEWED_CONTROL: [f64; 12] = [
    120.0, 121.5, 122.0, 123.5, 124.0, 125.5, 126.0, 127.5, 128.0, 130.0, 580.0, 640.0,
];

/// Well-behaved test-arm purchases paired with [`SKEWED_CONTROL`].
pub const SYMMETRIC_TEST: [f64; 12] = [
    210.5, 234.1, 198.8, 229.9, 223.1, 205.5, 217.7, 236.6, 202.2, 220.0, 214.4, 228.8,
];
