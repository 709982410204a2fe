use rust_decimal::Decimal;

use super::domain::{DateRange, ExportLine};
use crate::spreadsheet::{Cell, Column, Document, Row, Sheet};

pub const INCOME_REPORT: &str = "Income Report";
const MISSING: &str = "-";

pub fn export_filename(range: DateRange) -> String {
    format!(
        "Income_Report_{}_to_{}.xlsx",
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d")
    )
}

/// One sheet listing the income lines followed by a bold total row.
pub fn build_export(lines: &[ExportLine]) -> Document {
    let mut sheet = Sheet::new(
        INCOME_REPORT,
        vec![
            Column::new("Date", 15.0),
            Column::new("Source", 20.0),
            Column::new("Amount", 15.0),
            Column::new("Payment Mode", 15.0),
            Column::new("Receipt No", 15.0),
            Column::new("Description", 30.0),
        ],
    );

    let mut total = Decimal::ZERO;
    for line in lines {
        total += line.amount;
        sheet.push(Row::new(vec![
            Cell::text(line.income_date.format("%Y-%m-%d").to_string()),
            Cell::text(line.source.as_str()),
            Cell::Money(line.amount),
            line.payment_mode
                .as_deref()
                .map(Cell::text)
                .unwrap_or(Cell::Blank),
            Cell::text(line.receipt_number.as_deref().unwrap_or(MISSING)),
            Cell::text(line.description.as_deref().unwrap_or(MISSING)),
        ]));
    }

    sheet.push(Row::blank(6));
    sheet.push(Row::bold(vec![
        Cell::Blank,
        Cell::text("Total"),
        Cell::Money(total),
    ]));

    Document {
        author: None,
        sheets: vec![sheet],
    }
}
