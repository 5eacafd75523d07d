//! Dashboard, expense chart and spreadsheet export handlers.

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::report::{DashboardResponse, ExpenseChart},
    services::{export_service, report_service, transaction_service},
};
use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `GET /api/v1/dashboard`
///
/// Accounts, the five most recent transactions, balance/income/expense
/// totals and the expense chart.
pub async fn dashboard(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DashboardResponse>, AppError> {
    Ok(Json(report_service::dashboard(&pool, auth.user_id).await?))
}

/// `GET /api/v1/charts/expenses`
///
/// ```json
/// {
///   "labels": ["Food", "Transport"],
///   "amounts_cents": [300000, 250000],
///   "colors": ["#FF6384", "#36A2EB"],
///   "total_expense_cents": 550000
/// }
/// ```
pub async fn expense_chart(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ExpenseChart>, AppError> {
    Ok(Json(report_service::expense_chart(&pool, auth.user_id).await?))
}

/// `GET /api/v1/export/transactions`: all transactions as an xlsx attachment
/// named `<username>-Transactions.xlsx`.
pub async fn export_transactions(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    let transactions = transaction_service::list_for_user(&pool, auth.user_id, None).await?;
    let workbook = export_service::build_transactions_workbook(&transactions)?;

    tracing::info!(
        user_id = %auth.user_id,
        rows = transactions.len(),
        "Transactions exported"
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_service::export_filename(&auth.username)
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        workbook,
    )
        .into_response())
}
