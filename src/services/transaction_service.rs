//! Transaction service - ledger transactions and their balance effects.
//!
//! This service handles:
//! - Atomic balance updates on create, edit and delete
//! - Transfer preconditions
//! - Joined listings used by pages, dashboard and export
//!
//! # Atomicity Guarantees
//!
//! Every operation that moves a balance runs in one PostgreSQL transaction.
//! The affected account rows are locked `FOR UPDATE` in id order, the
//! netted postings from [`ledger`] are written, and the transaction row is
//! inserted, updated or deleted before commit. Any error drops the
//! transaction, which rolls everything back.

use std::collections::BTreeMap;

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, NUMERIC_OUT_OF_RANGE, is_sqlstate},
    models::transaction::{Transaction, TransactionDetail, TransactionRequest, TransactionType},
    services::ledger::{self, Draft, Entry},
};

/// Transaction columns joined with account and category names.
///
/// Callers append the `WHERE`, `ORDER BY` and `LIMIT` clauses.
const DETAIL_SELECT: &str = r#"
    SELECT t.id,
           t.transaction_type,
           t.account_id,
           a.account_name,
           a.account_type,
           t.amount_cents,
           t.description,
           t.transaction_date,
           ec.name AS expense_category,
           ic.name AS income_category,
           t.to_account_id,
           ta.account_name AS to_account_name,
           ta.account_type AS to_account_type,
           t.created_at
    FROM transactions t
    JOIN accounts a ON a.id = t.account_id
    LEFT JOIN expense_categories ec ON ec.id = t.expense_category_id
    LEFT JOIN income_categories ic ON ic.id = t.income_category_id
    LEFT JOIN accounts ta ON ta.id = t.to_account_id
"#;

/// List the user's transactions, newest `transaction_date` first.
///
/// `limit = None` returns everything.
pub async fn list_for_user(
    pool: &DbPool,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<TransactionDetail>, AppError> {
    let sql = format!(
        "{} WHERE a.user_id = $1 ORDER BY t.transaction_date DESC, t.created_at DESC LIMIT $2",
        DETAIL_SELECT
    );

    let rows = sqlx::query_as::<_, TransactionDetail>(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Transactions where the account is the source or the destination.
pub async fn list_for_account(
    pool: &DbPool,
    user_id: Uuid,
    account_id: Uuid,
) -> Result<Vec<TransactionDetail>, AppError> {
    let sql = format!(
        "{} WHERE a.user_id = $1 AND (t.account_id = $2 OR t.to_account_id = $2) \
         ORDER BY t.transaction_date DESC, t.created_at DESC",
        DETAIL_SELECT
    );

    let rows = sqlx::query_as::<_, TransactionDetail>(&sql)
        .bind(user_id)
        .bind(account_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn get_for_user(
    pool: &DbPool,
    user_id: Uuid,
    transaction_id: Uuid,
) -> Result<TransactionDetail, AppError> {
    let sql = format!("{} WHERE a.user_id = $1 AND t.id = $2", DETAIL_SELECT);

    sqlx::query_as::<_, TransactionDetail>(&sql)
        .bind(user_id)
        .bind(transaction_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// Record a new transaction and apply its postings.
///
/// # Errors
///
/// - `InvalidRequest`: non-positive amount, transfer preconditions, unknown category
/// - `NotFound`: an account does not exist or belongs to someone else
pub async fn add_transaction(
    pool: &DbPool,
    user_id: Uuid,
    request: TransactionRequest,
) -> Result<Transaction, AppError> {
    let draft = Draft::from_request(request)?;

    let mut tx = pool.begin().await?;

    ensure_transfer_allowed(&mut tx, user_id, &draft).await?;
    lock_accounts(&mut tx, user_id, &draft.entry.accounts()).await?;
    ensure_categories_exist(&mut tx, &draft).await?;

    apply_postings(&mut tx, &ledger::net_postings(draft.entry.postings())?).await?;

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            account_id,
            transaction_type,
            amount_cents,
            description,
            transaction_date,
            expense_category_id,
            income_category_id,
            to_account_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(draft.entry.account_id)
    .bind(draft.entry.kind.as_str())
    .bind(draft.entry.amount_cents)
    .bind(&draft.description)
    .bind(draft.transaction_date)
    .bind(draft.expense_category_id)
    .bind(draft.income_category_id)
    .bind(draft.entry.to_account_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        transaction_id = %transaction.id,
        kind = %draft.entry.kind,
        amount_cents = draft.entry.amount_cents,
        "Transaction recorded"
    );

    Ok(transaction)
}

/// Replace a transaction, reverting its old balance effect first.
pub async fn edit_transaction(
    pool: &DbPool,
    user_id: Uuid,
    transaction_id: Uuid,
    request: TransactionRequest,
) -> Result<Transaction, AppError> {
    let draft = Draft::from_request(request)?;

    let mut tx = pool.begin().await?;

    let existing = fetch_owned_for_update(&mut tx, user_id, transaction_id).await?;
    let old = Entry::from_stored(&existing)?;

    ensure_transfer_allowed(&mut tx, user_id, &draft).await?;

    let mut involved = old.accounts();
    involved.extend(draft.entry.accounts());
    lock_accounts(&mut tx, user_id, &involved).await?;
    ensure_categories_exist(&mut tx, &draft).await?;

    apply_postings(&mut tx, &ledger::edit_postings(&old, &draft.entry)?).await?;

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET account_id = $2,
            transaction_type = $3,
            amount_cents = $4,
            description = $5,
            transaction_date = $6,
            expense_category_id = $7,
            income_category_id = $8,
            to_account_id = $9,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(transaction_id)
    .bind(draft.entry.account_id)
    .bind(draft.entry.kind.as_str())
    .bind(draft.entry.amount_cents)
    .bind(&draft.description)
    .bind(draft.transaction_date)
    .bind(draft.expense_category_id)
    .bind(draft.income_category_id)
    .bind(draft.entry.to_account_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(transaction_id = %transaction_id, "Transaction updated");

    Ok(transaction)
}

/// Delete a transaction and undo its balance effect.
pub async fn delete_transaction(
    pool: &DbPool,
    user_id: Uuid,
    transaction_id: Uuid,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existing = fetch_owned_for_update(&mut tx, user_id, transaction_id).await?;
    let old = Entry::from_stored(&existing)?;

    lock_accounts(&mut tx, user_id, &old.accounts()).await?;
    apply_postings(&mut tx, &ledger::net_postings(old.reversal())?).await?;

    sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(transaction_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(transaction_id = %transaction_id, "Transaction deleted");

    Ok(())
}

async fn fetch_owned_for_update(
    conn: &mut PgConnection,
    user_id: Uuid,
    transaction_id: Uuid,
) -> Result<Transaction, AppError> {
    sqlx::query_as::<_, Transaction>(
        r#"
        SELECT t.*
        FROM transactions t
        JOIN accounts a ON a.id = t.account_id
        WHERE t.id = $1 AND a.user_id = $2
        FOR UPDATE OF t
        "#,
    )
    .bind(transaction_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// Transfers need two owned accounts and distinct endpoints.
async fn ensure_transfer_allowed(
    conn: &mut PgConnection,
    user_id: Uuid,
    draft: &Draft,
) -> Result<(), AppError> {
    if draft.entry.kind != TransactionType::Transfer {
        return Ok(());
    }

    let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

    if owned < 2 {
        return Err(AppError::invalid(
            "You need at least two accounts to make a transfer. Please add another account first.",
        ));
    }

    if draft.is_same_account_transfer() {
        return Err(AppError::invalid(
            "Cannot transfer money to the same account. Please select a different destination account.",
        ));
    }

    Ok(())
}

/// Lock the given accounts in id order, failing if any is missing or foreign.
async fn lock_accounts(
    conn: &mut PgConnection,
    user_id: Uuid,
    account_ids: &[Uuid],
) -> Result<(), AppError> {
    let mut ids = account_ids.to_vec();
    ids.sort();
    ids.dedup();

    let locked: Vec<Uuid> = sqlx::query_scalar(
        "SELECT id FROM accounts WHERE id = ANY($1) AND user_id = $2 ORDER BY id FOR UPDATE",
    )
    .bind(&ids)
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    if locked.len() != ids.len() {
        return Err(AppError::not_found("Account not found"));
    }

    Ok(())
}

async fn ensure_categories_exist(conn: &mut PgConnection, draft: &Draft) -> Result<(), AppError> {
    if let Some(category_id) = draft.expense_category_id {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM expense_categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&mut *conn)
                .await?;
        if !exists {
            return Err(AppError::invalid("Select a valid expense category."));
        }
    }

    if let Some(category_id) = draft.income_category_id {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM income_categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&mut *conn)
                .await?;
        if !exists {
            return Err(AppError::invalid("Select a valid income category."));
        }
    }

    Ok(())
}

async fn apply_postings(
    conn: &mut PgConnection,
    net: &BTreeMap<Uuid, i64>,
) -> Result<(), AppError> {
    for (account_id, delta) in net {
        if *delta == 0 {
            continue;
        }
        sqlx::query(
            r#"
            UPDATE accounts
            SET balance_cents = balance_cents + $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(delta)
        .bind(account_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_sqlstate(&e, NUMERIC_OUT_OF_RANGE) {
                AppError::invalid("Account balance is out of range.")
            } else {
                AppError::Database(e)
            }
        })?;
    }

    Ok(())
}
