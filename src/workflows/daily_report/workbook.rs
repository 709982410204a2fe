use super::aggregate::DailyAggregate;
use crate::domain::full_name;
use crate::spreadsheet::{Cell, Column, Document, Row, Sheet};

pub const STUDENT_SUMMARY: &str = "Student Summary";
pub const PAYMENT_SUMMARY: &str = "Payment Summary";
pub const TODAY_TRANSACTIONS: &str = "Today Transactions";
pub const PENDING_FEES: &str = "Pending Fees List";

pub const MODE_BREAKDOWN_HEADER: &str = "Payment Mode Breakdown (Today)";
const NO_ROOM: &str = "N/A";
const AUTHOR: &str = "Hostel Management System";

/// Lays out the four report sheets for one hostel and day.
pub fn build_document(aggregate: &DailyAggregate) -> Document {
    Document {
        author: Some(AUTHOR),
        sheets: vec![
            student_summary(aggregate),
            payment_summary(aggregate),
            transactions(aggregate),
            pending_fees(aggregate),
        ],
    }
}

pub fn attachment_name(aggregate: &DailyAggregate) -> String {
    format!("Hostel_Report_{}.xlsx", aggregate.date.format("%Y-%m-%d"))
}

fn student_summary(aggregate: &DailyAggregate) -> Sheet {
    let mut sheet = Sheet::new(
        STUDENT_SUMMARY,
        vec![Column::new("Metric", 30.0), Column::new("Count", 15.0)],
    );

    let students = &aggregate.students;
    let metrics = [
        ("Total Students", students.total),
        ("Active Students", students.active),
        ("New Students (Today)", students.joined_today),
        ("Vacated Students (Today)", students.vacated_today),
        ("Students with Room", students.with_room),
        ("Pending Fees Count", aggregate.pending_fees.len() as u64),
        ("Overdue Fees Count", aggregate.overdue_fees.len() as u64),
    ];

    for (metric, count) in metrics {
        sheet.push(Row::new(vec![Cell::text(metric), Cell::Count(count)]));
    }

    sheet
}

fn payment_summary(aggregate: &DailyAggregate) -> Sheet {
    let mut sheet = Sheet::new(
        PAYMENT_SUMMARY,
        vec![Column::new("Metric", 30.0), Column::new("Amount", 20.0)],
    );

    sheet.push(Row::new(vec![
        Cell::text("Total Collected Today"),
        Cell::Money(aggregate.total_collected),
    ]));
    sheet.push(Row::new(vec![
        Cell::text("Total Pending Amount"),
        Cell::Money(aggregate.total_pending),
    ]));
    sheet.push(Row::new(vec![
        Cell::text("Total Overdue Amount"),
        Cell::Money(aggregate.total_overdue),
    ]));

    sheet.push(Row::blank(2));
    sheet.push(Row::bold(vec![Cell::text(MODE_BREAKDOWN_HEADER), Cell::Blank]));
    for entry in &aggregate.mode_breakdown {
        sheet.push(Row::new(vec![
            Cell::text(entry.mode.as_str()),
            Cell::Money(entry.amount),
        ]));
    }

    sheet
}

fn transactions(aggregate: &DailyAggregate) -> Sheet {
    let mut sheet = Sheet::new(
        TODAY_TRANSACTIONS,
        vec![
            Column::new("Student Name", 25.0),
            Column::new("Room", 10.0),
            Column::new("Amount", 15.0),
            Column::new("Mode", 15.0),
            Column::new("Receipt", 20.0),
            Column::new("Date", 15.0),
        ],
    );

    let date = aggregate.date.format("%Y-%m-%d").to_string();
    for payment in &aggregate.payments {
        sheet.push(Row::new(vec![
            Cell::text(full_name(&payment.first_name, &payment.last_name)),
            Cell::text(payment.room_number.as_deref().unwrap_or(NO_ROOM)),
            Cell::Money(payment.amount),
            optional_text(payment.mode_name.as_deref()),
            optional_text(payment.receipt_number.as_deref()),
            Cell::text(date.as_str()),
        ]));
    }

    sheet
}

fn pending_fees(aggregate: &DailyAggregate) -> Sheet {
    let mut sheet = Sheet::new(
        PENDING_FEES,
        vec![
            Column::new("Student Name", 25.0),
            Column::new("Room", 10.0),
            Column::new("Balance", 15.0),
            Column::new("Month", 15.0),
            Column::new("Status", 15.0),
        ],
    );

    for fee in &aggregate.pending_fees {
        sheet.push(Row::new(vec![
            Cell::text(full_name(&fee.first_name, &fee.last_name)),
            Cell::text(fee.room_number.as_deref().unwrap_or(NO_ROOM)),
            Cell::Money(fee.balance),
            Cell::text(fee.period.as_str()),
            Cell::text(fee.status.as_str()),
        ]));
    }

    sheet
}

fn optional_text(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::text(value),
        None => Cell::Blank,
    }
}
