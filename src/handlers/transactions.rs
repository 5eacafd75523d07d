//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - GET /api/v1/transactions - List the caller's transactions
//! - POST /api/v1/transactions - Record income, expense or transfer
//! - GET /api/v1/transactions/{id} - Get transaction details
//! - PUT /api/v1/transactions/{id} - Edit a transaction
//! - DELETE /api/v1/transactions/{id} - Delete a transaction
//!
//! Balance effects are applied by [`transaction_service`].

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::transaction::{TransactionDetail, TransactionRequest, TransactionResponse},
    services::transaction_service,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// List transactions, newest `transaction_date` first.
pub async fn list_transactions(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<TransactionDetail>>, AppError> {
    let transactions = transaction_service::list_for_user(&pool, auth.user_id, None).await?;
    Ok(Json(transactions))
}

/// Record a transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "transaction_type": "expense",
///   "account_id": "550e8400-...",
///   "amount_cents": 45000,
///   "description": "Groceries",
///   "transaction_date": "2025-06-02",
///   "expense_category_id": "770e8400-..."
/// }
/// ```
///
/// # Validation
///
/// - `amount_cents` must be positive
/// - transfers need `to_account_id`, at least two accounts, distinct endpoints
/// - every referenced account must belong to the caller (404 otherwise)
///
/// # Response (201)
///
/// The stored transaction.
pub async fn create_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let transaction = transaction_service::add_transaction(&pool, auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// Get a transaction with account and category names.
///
/// # Response
///
/// - **Success (200 OK)**
/// - **Error (404)**: not found, or its account belongs to someone else
pub async fn get_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionDetail>, AppError> {
    let transaction =
        transaction_service::get_for_user(&pool, auth.user_id, transaction_id).await?;
    Ok(Json(transaction))
}

/// Edit a transaction. Same body and rules as create.
///
/// The stored transaction's balance effect is reverted before the new one
/// is applied, in one database transaction.
pub async fn update_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<TransactionRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction =
        transaction_service::edit_transaction(&pool, auth.user_id, transaction_id, request)
            .await?;
    Ok(Json(transaction.into()))
}

/// Delete a transaction and restore the balances it changed. Returns 204.
pub async fn delete_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    transaction_service::delete_transaction(&pool, auth.user_id, transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
