//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/v1/accounts - Create new account
//! - GET /api/v1/accounts/{id} - Account with its transactions
//! - GET /api/v1/accounts - List the caller's accounts

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::account::{Account, AccountDetailResponse, AccountResponse, CreateAccountRequest},
    services::{transaction_service, validation},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "account_type": "credit",
///   "account_name": "Visa",
///   "balance_cents": -125000
/// }
/// ```
///
/// The opening balance may be negative (credit cards).
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created account
/// - **Error (400)**: Name missing, too long or without a letter, or the
///   balance is outside ±100,000,000.00
/// - **Error (422)**: Unknown `account_type`
pub async fn create_account(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    validation::validate_account_name(&request.account_name)?;
    validation::validate_balance(request.balance_cents)?;

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (user_id, account_type, account_name, balance_cents)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(request.account_type.as_str())
    .bind(request.account_name.trim())
    .bind(request.balance_cents)
    .fetch_one(&pool)
    .await?;

    tracing::info!(account_id = %account.id, "Account created");

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Get an account and every transaction touching it.
///
/// # Security Note
///
/// The query filters by BOTH `id` AND `user_id`, so another user's account
/// is reported as 404 rather than 403.
///
/// # Response
///
/// - **Success (200 OK)**: account plus transactions, newest date first,
///   where the account is the source or the destination
/// - **Error (404)**: Account not found or not owned by the caller
pub async fn get_account(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountDetailResponse>, AppError> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE id = $1 AND user_id = $2",
    )
    .bind(account_id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Account not found"))?;

    let transactions =
        transaction_service::list_for_account(&pool, auth.user_id, account_id).await?;

    Ok(Json(AccountDetailResponse {
        account: account.into(),
        transactions,
    }))
}

/// List all accounts of the caller, newest first.
pub async fn list_accounts(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;

    let responses: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}
