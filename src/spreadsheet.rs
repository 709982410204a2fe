//! In-memory tabular documents and their xlsx serialization.
//!
//! Workflows describe sheets as plain rows of [`Cell`]s so layouts can be asserted in tests
//! without parsing a binary workbook; [`Document::to_xlsx`] produces the attachment bytes.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{DocProperties, Format, Workbook, Worksheet, XlsxError};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Rupee amount mask applied to money cells.
pub const CURRENCY_FORMAT: &str = "₹#,##0.00";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Count(u64),
    Money(Decimal),
    Blank,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<Decimal> {
        match self {
            Self::Money(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub bold: bool,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells, bold: false }
    }

    pub fn bold(cells: Vec<Cell>) -> Self {
        Self { cells, bold: true }
    }

    pub fn blank(width: usize) -> Self {
        Self::new(vec![Cell::Blank; width])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
}

impl Column {
    pub const fn new(header: &'static str, width: f64) -> Self {
        Self { header, width }
    }
}

/// One worksheet. The header row built from `columns` is always bold.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: &'static str, columns: Vec<Column>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.header).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub author: Option<&'static str>,
    pub sheets: Vec<Sheet>,
}

impl Document {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn to_xlsx(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        if let Some(author) = self.author {
            let properties = DocProperties::new().set_author(author);
            workbook.set_properties(&properties);
        }

        let formats = CellFormats::new();
        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            write_sheet(worksheet, sheet, &formats)?;
        }

        workbook.save_to_buffer()
    }
}

struct CellFormats {
    plain: Format,
    bold: Format,
    money: Format,
    bold_money: Format,
}

impl CellFormats {
    fn new() -> Self {
        Self {
            plain: Format::new(),
            bold: Format::new().set_bold(),
            money: Format::new().set_num_format(CURRENCY_FORMAT),
            bold_money: Format::new().set_bold().set_num_format(CURRENCY_FORMAT),
        }
    }

    fn pick(&self, bold: bool, money: bool) -> &Format {
        match (bold, money) {
            (false, false) => &self.plain,
            (true, false) => &self.bold,
            (false, true) => &self.money,
            (true, true) => &self.bold_money,
        }
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, formats: &CellFormats) -> Result<(), XlsxError> {
    worksheet.set_name(sheet.name)?;

    for (col, column) in sheet.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, column.width)?;
        worksheet.write_string_with_format(0, col, column.header, &formats.bold)?;
    }

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_number = index as u32 + 1;
        for (col, cell) in row.cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string_with_format(
                        row_number,
                        col,
                        value.as_str(),
                        formats.pick(row.bold, false),
                    )?;
                }
                Cell::Count(value) => {
                    worksheet.write_number_with_format(
                        row_number,
                        col,
                        *value as f64,
                        formats.pick(row.bold, false),
                    )?;
                }
                Cell::Money(value) => {
                    worksheet.write_number_with_format(
                        row_number,
                        col,
                        value.to_f64().unwrap_or_default(),
                        formats.pick(row.bold, true),
                    )?;
                }
                Cell::Blank => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn serializes_to_a_zip_container() {
        let mut sheet = Sheet::new("Totals", vec![Column::new("Metric", 30.0), Column::new("Amount", 20.0)]);
        sheet.push(Row::new(vec![
            Cell::text("Collected"),
            Cell::Money(Decimal::new(40050, 2)),
        ]));
        sheet.push(Row::blank(2));
        sheet.push(Row::bold(vec![Cell::text("Breakdown"), Cell::Blank]));

        let document = Document {
            author: Some("Hostel Management System"),
            sheets: vec![sheet],
        };

        let bytes = document.to_xlsx().expect("workbook serializes");
        assert!(bytes.starts_with(b"PK"), "xlsx payloads are zip archives");
    }

    fn archive_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("xlsx is a zip archive");
        let mut entry = archive.by_name(name).expect("entry present");
        let mut content = String::new();
        entry.read_to_string(&mut content).expect("entry is utf-8 xml");
        content
    }

    #[test]
    fn written_workbook_keeps_bold_headers_and_currency_mask() {
        let mut sheet = Sheet::new("Totals", vec![Column::new("Metric", 30.0), Column::new("Amount", 20.0)]);
        sheet.push(Row::new(vec![
            Cell::text("Collected"),
            Cell::Money(Decimal::new(40050, 2)),
        ]));
        let document = Document {
            author: None,
            sheets: vec![sheet],
        };

        let bytes = document.to_xlsx().expect("workbook serializes");

        let styles = archive_entry(&bytes, "xl/styles.xml");
        assert!(styles.contains(&format!("formatCode=\"{CURRENCY_FORMAT}\"")));
        assert!(styles.contains("<b/>"));
        assert!(archive_entry(&bytes, "xl/workbook.xml").contains("name=\"Totals\""));
        let strings = archive_entry(&bytes, "xl/sharedStrings.xml");
        assert!(strings.contains("Metric"));
        assert!(strings.contains("Collected"));
    }

    #[test]
    fn rejects_invalid_sheet_names() {
        let document = Document {
            author: None,
            sheets: vec![Sheet::new("bad/name", vec![Column::new("A", 10.0)])],
        };
        assert!(document.to_xlsx().is_err());
    }
}
