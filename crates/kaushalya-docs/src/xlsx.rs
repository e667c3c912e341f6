//! Minimal single-sheet Office Open XML workbook.
//!
//! Cells are written inline (no shared-string table) and every zip entry
//! carries a fixed timestamp, so the same rows always produce the same bytes.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::DocsError;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Text(String),
    Number(String),
    Bool(bool),
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Excel caps sheet names at 31 characters and forbids a few symbols.
fn sheet_title(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_owned()
    } else {
        cleaned
    }
}

/// `0 → A`, `25 → Z`, `26 → AA`.
pub(crate) fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn xml_err<E: std::fmt::Display>(e: E) -> DocsError {
    DocsError::Xml(e.to_string())
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>, DocsError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("workbook").with_attributes([("xmlns", SHEET_NS), ("xmlns:r", REL_NS)]),
        ))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("sheets")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
            ("name", sheet_title(sheet_name).as_str()),
            ("sheetId", "1"),
            ("r:id", "rId1"),
        ])))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("sheets")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("workbook")))
        .map_err(xml_err)?;
    Ok(writer.into_inner())
}

/// Whether XML 1.0 allows `c` in character data.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Drops characters a workbook reader would reject.
fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn write_cell(
    writer: &mut Writer<Vec<u8>>,
    reference: &str,
    cell: &Cell,
) -> Result<(), DocsError> {
    match cell {
        Cell::Empty => Ok(()),
        Cell::Text(text) => {
            let text = xml_text(text);
            writer
                .write_event(Event::Start(
                    BytesStart::new("c").with_attributes([("r", reference), ("t", "inlineStr")]),
                ))
                .map_err(xml_err)?;
            writer
                .write_event(Event::Start(BytesStart::new("is")))
                .map_err(xml_err)?;
            let mut t = BytesStart::new("t");
            if text.trim() != text.as_ref() {
                t.push_attribute(("xml:space", "preserve"));
            }
            writer.write_event(Event::Start(t)).map_err(xml_err)?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(xml_err)?;
            for end in ["t", "is", "c"] {
                writer
                    .write_event(Event::End(BytesEnd::new(end)))
                    .map_err(xml_err)?;
            }
            Ok(())
        }
        Cell::Number(value) => write_value(writer, reference, None, value),
        Cell::Bool(b) => write_value(writer, reference, Some("b"), if *b { "1" } else { "0" }),
    }
}

/// `<c r=".." [t=".."]><v>value</v></c>`
fn write_value(
    writer: &mut Writer<Vec<u8>>,
    reference: &str,
    cell_type: Option<&str>,
    value: &str,
) -> Result<(), DocsError> {
    let mut start = BytesStart::new("c");
    start.push_attribute(("r", reference));
    if let Some(cell_type) = cell_type {
        start.push_attribute(("t", cell_type));
    }
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("v")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("v")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("c")))
        .map_err(xml_err)?;
    Ok(())
}

fn sheet_xml(rows: &[Vec<Cell>]) -> Result<Vec<u8>, DocsError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("worksheet").with_attributes([("xmlns", SHEET_NS), ("xmlns:r", REL_NS)]),
        ))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("sheetData")))
        .map_err(xml_err)?;

    for (row_index, row) in rows.iter().enumerate() {
        let row_number = (row_index + 1).to_string();
        writer
            .write_event(Event::Start(
                BytesStart::new("row").with_attributes([("r", row_number.as_str())]),
            ))
            .map_err(xml_err)?;
        for (col_index, cell) in row.iter().enumerate() {
            let reference = format!("{}{row_number}", column_letter(col_index));
            write_cell(&mut writer, &reference, cell)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("row")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("sheetData")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("worksheet")))
        .map_err(xml_err)?;
    Ok(writer.into_inner())
}

/// Packages `rows` as a workbook with a single sheet called `sheet_name`.
pub(crate) fn write_workbook(sheet_name: &str, rows: &[Vec<Cell>]) -> Result<Vec<u8>, DocsError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let workbook = workbook_xml(sheet_name)?;
    let sheet = sheet_xml(rows)?;
    let entries: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/styles.xml", STYLES.as_bytes()),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        zip.start_file(name, options)?;
        zip.write_all(bytes).map_err(|source| DocsError::Io {
            path: name.to_owned(),
            source,
        })?;
    }
    Ok(zip.finish()?.into_inner())
}
