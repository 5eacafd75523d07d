//! Spreadsheet export of a user's transactions.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::{
    error::AppError,
    models::{
        account::account_display,
        category::{expense_label, income_label},
        transaction::{TransactionDetail, TransactionType},
    },
};

pub const SHEET_NAME: &str = "Transactions";

pub const HEADERS: [&str; 8] = [
    "Date",
    "Type",
    "Account",
    "Amount",
    "Description",
    "Expense Category",
    "Income Category",
    "To Account",
];

const AMOUNT_COLUMN: u16 = 3;
const AMOUNT_FORMAT: &str = "#,##0.00";

/// Download name of the export for `username`.
pub fn export_filename(username: &str) -> String {
    format!("{}-Transactions.xlsx", username)
}

fn cents_to_units(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Text cells of one transaction row; the amount column holds its display text.
fn row_cells(t: &TransactionDetail) -> [String; 8] {
    let kind = t
        .transaction_type
        .parse::<TransactionType>()
        .map(|k| k.label().to_string())
        .unwrap_or_else(|_| t.transaction_type.clone());

    let to_account = match (&t.to_account_name, &t.to_account_type) {
        (Some(name), Some(account_type)) => account_display(name, account_type),
        _ => String::new(),
    };

    [
        t.transaction_date.format("%Y-%m-%d").to_string(),
        kind,
        account_display(&t.account_name, &t.account_type),
        format!("{:.2}", cents_to_units(t.amount_cents)),
        t.description.clone(),
        t.expense_category.as_deref().map(expense_label).unwrap_or_default(),
        t.income_category.as_deref().map(income_label).unwrap_or_default(),
        to_account,
    ]
}

/// Width of each column: longest header or data cell plus two.
fn column_widths(rows: &[[String; 8]]) -> [usize; 8] {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| w + 2)
}

/// Render the export workbook.
///
/// `transactions` are written in the given order, expected newest first.
/// A blank row separates the data from the `Total Expense` and
/// `Total Income` rows.
pub fn build_transactions_workbook(transactions: &[TransactionDetail]) -> Result<Vec<u8>, AppError> {
    write_workbook(transactions).map_err(|e| AppError::Internal(format!("xlsx export failed: {}", e)))
}

fn write_workbook(transactions: &[TransactionDetail]) -> Result<Vec<u8>, XlsxError> {
    let bold = Format::new().set_bold();
    let amount = Format::new().set_num_format(AMOUNT_FORMAT);

    let rows: Vec<[String; 8]> = transactions.iter().map(row_cells).collect();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, (t, cells)) in transactions.iter().zip(&rows).enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            if col == AMOUNT_COLUMN {
                sheet.write_number_with_format(row, col, cents_to_units(t.amount_cents), &amount)?;
            } else if !cell.is_empty() {
                sheet.write_string(row, col, cell)?;
            }
        }
    }

    let total = |kind: TransactionType| -> i64 {
        transactions
            .iter()
            .filter(|t| t.transaction_type == kind.as_str())
            .map(|t| t.amount_cents)
            .sum()
    };

    let expense_row = transactions.len() as u32 + 2;
    let income_row = expense_row + 1;

    sheet.write_string(expense_row, 1, "Total Expense")?;
    sheet.write_number_with_format(
        expense_row,
        AMOUNT_COLUMN,
        cents_to_units(total(TransactionType::Expense)),
        &amount,
    )?;
    sheet.write_string(income_row, 1, "Total Income")?;
    sheet.write_number_with_format(
        income_row,
        AMOUNT_COLUMN,
        cents_to_units(total(TransactionType::Income)),
        &amount,
    )?;

    for (col, width) in column_widths(&rows).iter().enumerate() {
        sheet.set_column_width(col as u16, *width as f64)?;
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofilter(0, 0, income_row, HEADERS.len() as u16 - 1)?;

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn detail(kind: &str, amount_cents: i64) -> TransactionDetail {
        TransactionDetail {
            id: Uuid::new_v4(),
            transaction_type: kind.to_string(),
            account_id: Uuid::new_v4(),
            account_name: "HDFC".into(),
            account_type: "bank".into(),
            amount_cents,
            description: "Groceries for the week".into(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            expense_category: (kind == "expense").then(|| "food".to_string()),
            income_category: (kind == "income").then(|| "salary".to_string()),
            to_account_id: None,
            to_account_name: None,
            to_account_type: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filename_uses_username() {
        assert_eq!(export_filename("asha"), "asha-Transactions.xlsx");
    }

    #[test]
    fn row_uses_labels_and_account_display() {
        let cells = row_cells(&detail("expense", 123_456));
        assert_eq!(cells[0], "2025-04-12");
        assert_eq!(cells[1], "Expense");
        assert_eq!(cells[2], "HDFC (Bank Account)");
        assert_eq!(cells[3], "1234.56");
        assert_eq!(cells[5], "Food");
        assert_eq!(cells[6], "");
        assert_eq!(cells[7], "");
    }

    #[test]
    fn transfer_row_names_destination() {
        let mut t = detail("transfer", 5_000);
        t.to_account_name = Some("Wallet".into());
        t.to_account_type = Some("cash".into());

        assert_eq!(row_cells(&t)[7], "Wallet (Cash)");
    }

    #[test]
    fn widths_cover_headers_and_longest_value() {
        let rows = vec![row_cells(&detail("income", 100))];
        let widths = column_widths(&rows);

        assert_eq!(widths[0], "2025-04-12".len() + 2);
        assert_eq!(widths[4], "Groceries for the week".len() + 2);
        assert_eq!(widths[5], "Expense Category".len() + 2);
    }

    #[test]
    fn workbook_is_a_zip_archive() {
        let bytes =
            build_transactions_workbook(&[detail("expense", 2_500), detail("income", 90_000)])
                .unwrap();
        assert!(bytes.starts_with(b"PK"));

        let empty = build_transactions_workbook(&[]).unwrap();
        assert!(empty.starts_with(b"PK"));
    }
}
