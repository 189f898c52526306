//! Turns raw response bytes into sheet-aware cell grids.
//!
//! Formats are declared by the metric configuration rather than sniffed:
//! upstream sources serve stable content types per endpoint even when the
//! layout inside the file shifts between releases.

use std::fmt;
use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook_auto_from_rs, Data, Ods, Reader, Xlsx};
use tracing::{debug, warn};

use super::{Cell, Grid, Workbook};

/// Declared format of a fetched payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Csv,
    Excel,
    Ods,
    Zip,
}

impl fmt::Display for FormatHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatHint::Csv => "csv",
            FormatHint::Excel => "excel",
            FormatHint::Ods => "ods",
            FormatHint::Zip => "zip",
        };
        f.write_str(name)
    }
}

/// Bytes could not be parsed as the declared format. Callers route this to
/// the fallback path; it never aborts a whole metric batch.
#[derive(Debug, thiserror::Error)]
#[error("could not load {byte_len} bytes as {format}: {reason}")]
pub struct LoadError {
    pub format: FormatHint,
    pub byte_len: usize,
    reason: String,
}

impl LoadError {
    fn new(format: FormatHint, byte_len: usize, reason: impl Into<String>) -> Self {
        Self {
            format,
            byte_len,
            reason: reason.into(),
        }
    }
}

/// Load raw bytes into a workbook of grids, one per sheet.
pub fn load(bytes: &[u8], format: FormatHint) -> Result<Workbook, LoadError> {
    let workbook = match format {
        FormatHint::Csv => {
            let grid = load_csv(bytes)
                .map_err(|err| LoadError::new(format, bytes.len(), err.to_string()))?;
            let mut workbook = Workbook::new();
            workbook.push("data", grid);
            workbook
        }
        FormatHint::Excel => load_excel(bytes)?,
        FormatHint::Ods => load_ods(bytes)?,
        FormatHint::Zip => load_zip(bytes)?,
    };
    debug!(
        format = %format,
        sheets = workbook.len(),
        bytes = bytes.len(),
        "loaded publication"
    );
    Ok(workbook)
}

fn load_csv(bytes: &[u8]) -> Result<Grid, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::text).collect());
    }
    Ok(Grid::from_rows(rows))
}

fn load_excel(bytes: &[u8]) -> Result<Workbook, LoadError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut reader = Xlsx::new(cursor)
        .map_err(|err| LoadError::new(FormatHint::Excel, bytes.len(), err.to_string()))?;
    collect_sheets(&mut reader)
        .map_err(|reason| LoadError::new(FormatHint::Excel, bytes.len(), reason))
}

/// ODS first; when that engine rejects the payload, retry with the
/// auto-detecting opener before giving up.
fn load_ods(bytes: &[u8]) -> Result<Workbook, LoadError> {
    match Ods::new(Cursor::new(bytes.to_vec())) {
        Ok(mut reader) => collect_sheets(&mut reader)
            .map_err(|reason| LoadError::new(FormatHint::Ods, bytes.len(), reason)),
        Err(ods_err) => {
            warn!(error = %ods_err, "ods engine rejected payload, retrying with auto-detect");
            let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
                .map_err(|err| LoadError::new(FormatHint::Ods, bytes.len(), err.to_string()))?;
            collect_sheets(&mut reader)
                .map_err(|reason| LoadError::new(FormatHint::Ods, bytes.len(), reason))
        }
    }
}

/// Enumerate zip entries, loading `.csv` and `.xlsx` members as nested grids
/// keyed by entry name. Other entries are ignored; a member that fails to
/// parse is skipped rather than failing the whole archive.
fn load_zip(bytes: &[u8]) -> Result<Workbook, LoadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| LoadError::new(FormatHint::Zip, bytes.len(), err.to_string()))?;
    let mut workbook = Workbook::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| LoadError::new(FormatHint::Zip, bytes.len(), err.to_string()))?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();
        let lower = name.to_ascii_lowercase();
        if !lower.ends_with(".csv") && !lower.ends_with(".xlsx") {
            continue;
        }

        let mut buf = Vec::new();
        if let Err(err) = entry.read_to_end(&mut buf) {
            warn!(entry = %name, error = %err, "skipping unreadable zip entry");
            continue;
        }

        if lower.ends_with(".csv") {
            match load_csv(&buf) {
                Ok(grid) => workbook.push(name, grid),
                Err(err) => warn!(entry = %name, error = %err, "skipping malformed csv entry"),
            }
        } else {
            match load_excel(&buf) {
                Ok(nested) => {
                    for (sheet, grid) in nested.iter() {
                        workbook.push(format!("{name}:{sheet}"), grid.clone());
                    }
                }
                Err(err) => warn!(entry = %name, error = %err, "skipping malformed xlsx entry"),
            }
        }
    }

    Ok(workbook)
}

fn collect_sheets<RS, R>(reader: &mut R) -> Result<Workbook, String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: fmt::Display,
{
    let mut workbook = Workbook::new();
    for name in reader.sheet_names().to_owned() {
        let range = reader
            .worksheet_range(&name)
            .map_err(|err| err.to_string())?;
        workbook.push(name, grid_from_range(&range));
    }
    Ok(workbook)
}

fn grid_from_range(range: &calamine::Range<Data>) -> Grid {
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Grid::from_rows(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::text(value.to_string()),
        Data::String(raw) => Cell::text(raw.clone()),
        Data::DateTime(value) => Cell::Number(value.as_f64()),
        Data::DateTimeIso(raw) | Data::DurationIso(raw) => Cell::text(raw.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            for (name, content) in entries {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .expect("start entry");
                writer.write_all(content).expect("write entry");
            }
            writer.finish().expect("finish zip");
        }
        cursor.into_inner()
    }

    #[test]
    fn csv_bytes_become_a_single_sheet_grid() {
        let workbook = load(b"a,b\n1,2\n", FormatHint::Csv).expect("load csv");
        assert_eq!(workbook.sheet_names(), vec!["data"]);
        let grid = workbook.first().expect("grid");
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.rows()[1][0].as_number(), Some(1.0));
    }

    #[test]
    fn quoted_ons_style_csv_keeps_fields_intact() {
        let payload = b"\"Title\",\"CPI ANNUAL RATE\"\n\"2024 Q1\",\"3.5\"\n";
        let workbook = load(payload, FormatHint::Csv).expect("load csv");
        let grid = workbook.first().expect("grid");
        assert_eq!(grid.rows()[1][0].label().as_deref(), Some("2024 Q1"));
        assert_eq!(grid.rows()[1][1].as_number(), Some(3.5));
    }

    #[test]
    fn zip_loader_keeps_csv_entries_and_ignores_the_rest() {
        let payload = zip_with(&[
            ("perceptions.csv", b"area,safe\nEngland,72.1\n" as &[u8]),
            ("readme.txt", b"notes" as &[u8]),
        ]);
        let workbook = load(&payload, FormatHint::Zip).expect("load zip");
        assert_eq!(workbook.sheet_names(), vec!["perceptions.csv"]);
        let grid = workbook.first().expect("grid");
        assert_eq!(grid.rows()[1][1].as_number(), Some(72.1));
    }

    #[test]
    fn zip_loader_skips_malformed_members_without_failing() {
        let payload = zip_with(&[
            ("broken.xlsx", b"not really a workbook" as &[u8]),
            ("data.csv", b"k,v\nx,1\n" as &[u8]),
        ]);
        let workbook = load(&payload, FormatHint::Zip).expect("load zip");
        assert_eq!(workbook.sheet_names(), vec!["data.csv"]);
    }

    #[test]
    fn garbage_bytes_surface_a_load_error_with_context() {
        let err = load(b"definitely not a zip", FormatHint::Zip).expect_err("load error");
        assert_eq!(err.format, FormatHint::Zip);
        assert_eq!(err.byte_len, 20);
    }

    #[test]
    fn garbage_bytes_fail_excel_and_ods_loading() {
        assert!(load(b"\x00\x01\x02", FormatHint::Excel).is_err());
        assert!(load(b"\x00\x01\x02", FormatHint::Ods).is_err());
    }

    /// Minimal but complete xlsx package, assembled entry by entry.
    fn minimal_xlsx() -> Vec<u8> {
        let content_types = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;
        let root_rels = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;
        let workbook = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;
        let workbook_rels = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;
        let sheet = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData><row r="1"><c r="A1"><v>42</v></c></row></sheetData>
</worksheet>"#;
        zip_with(&[
            ("[Content_Types].xml", content_types as &[u8]),
            ("_rels/.rels", root_rels as &[u8]),
            ("xl/workbook.xml", workbook as &[u8]),
            ("xl/_rels/workbook.xml.rels", workbook_rels as &[u8]),
            ("xl/worksheets/sheet1.xml", sheet as &[u8]),
        ])
    }

    #[test]
    fn ods_loader_degrades_to_the_auto_engine() {
        // The ODS engine rejects an xlsx package (no content.xml); the
        // auto-detecting retry must still open it.
        let payload = minimal_xlsx();
        let workbook = load(&payload, FormatHint::Ods).expect("auto-detect retry");
        assert!(!workbook.is_empty());
        let grid = workbook.first().expect("grid");
        assert_eq!(grid.rows()[0][0].as_number(), Some(42.0));
    }
}
