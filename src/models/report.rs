//! Dashboard and chart payloads.

use serde::Serialize;

use crate::models::{account::AccountResponse, transaction::TransactionDetail};

/// Pie-chart data for expenses grouped by category.
///
/// `labels`, `amounts_cents` and `colors` are parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseChart {
    pub labels: Vec<String>,
    pub amounts_cents: Vec<i64>,
    pub colors: Vec<String>,
    pub total_expense_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub accounts: Vec<AccountResponse>,
    pub recent_transactions: Vec<TransactionDetail>,
    pub total_balance_cents: i64,
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    pub expense_chart: ExpenseChart,
}
