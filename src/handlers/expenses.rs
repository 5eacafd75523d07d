//! Standalone expense record HTTP handlers.
//!
//! - GET /api/v1/expenses - List, newest date first
//! - POST /api/v1/expenses - Add
//! - PUT /api/v1/expenses/{id} - Edit
//! - DELETE /api/v1/expenses/{id} - Delete
//!
//! Expense records never touch account balances.

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::expense::{Expense, ExpenseDetail, ExpenseRequest},
    services::validation,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

async fn validate_request(pool: &DbPool, request: &ExpenseRequest) -> Result<(), AppError> {
    validation::validate_amount(request.amount_cents)?;

    let category_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM expense_categories WHERE id = $1)")
            .bind(request.category_id)
            .fetch_one(pool)
            .await?;
    if !category_exists {
        return Err(AppError::invalid("Select a valid expense category."));
    }

    Ok(())
}

pub async fn list_expenses(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ExpenseDetail>>, AppError> {
    let expenses = sqlx::query_as::<_, ExpenseDetail>(
        r#"
        SELECT e.id,
               e.amount_cents,
               e.description,
               e.category_id,
               ec.name AS category,
               e.date,
               e.payment_method,
               e.created_at,
               e.updated_at
        FROM expenses e
        JOIN expense_categories ec ON ec.id = e.category_id
        WHERE e.user_id = $1
        ORDER BY e.date DESC, e.created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(expenses))
}

/// Add an expense record.
///
/// # Request Body
///
/// ```json
/// {
///   "amount_cents": 45000,
///   "description": "Groceries",
///   "category_id": "550e8400-...",
///   "date": "2025-06-02",
///   "payment_method": "debit_card"
/// }
/// ```
pub async fn create_expense(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<ExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    validate_request(&pool, &request).await?;

    let expense = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (user_id, amount_cents, description, category_id, date, payment_method)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(request.amount_cents)
    .bind(request.description.trim())
    .bind(request.category_id)
    .bind(request.date)
    .bind(request.payment_method.as_str())
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Edit an expense record owned by the caller.
pub async fn update_expense(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(expense_id): Path<Uuid>,
    Json(request): Json<ExpenseRequest>,
) -> Result<Json<Expense>, AppError> {
    validate_request(&pool, &request).await?;

    let expense = sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses
        SET amount_cents = $3,
            description = $4,
            category_id = $5,
            date = $6,
            payment_method = $7,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(expense_id)
    .bind(auth.user_id)
    .bind(request.amount_cents)
    .bind(request.description.trim())
    .bind(request.category_id)
    .bind(request.date)
    .bind(request.payment_method.as_str())
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Expense not found"))?;

    Ok(Json(expense))
}

/// Delete an expense record owned by the caller. Returns 204.
pub async fn delete_expense(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
        .bind(expense_id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::not_found("Expense not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
