//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a transaction
//! - `TransactionRequest`: Request body shared by create and edit
//! - `TransactionDetail`: Transaction joined with account and category names

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// What a transaction does to balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Transfer => "Transfer",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a transaction record from the database.
///
/// - `account_id` is always set: the credited account for income, the
///   debited account for expense and transfer.
/// - `to_account_id` is only set for transfers, and never equals
///   `account_id` (CHECK constraint).
/// - Only the category matching the type is set.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub transaction_type: String,

    /// Must be positive (enforced by CHECK constraint)
    pub amount_cents: i64,

    pub description: String,
    pub transaction_date: NaiveDate,
    pub expense_category_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or editing a transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "transaction_type": "transfer",
///   "account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "to_account_id": "660e8400-e29b-41d4-a716-446655440001",
///   "amount_cents": 25000,
///   "description": "Move to savings",
///   "transaction_date": "2025-06-01"
/// }
/// ```
///
/// Fields that do not apply to the type (a category on a transfer, a
/// destination on an expense) are dropped before saving.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRequest {
    pub transaction_type: TransactionType,
    pub account_id: Uuid,
    pub amount_cents: i64,

    #[serde(default)]
    pub description: String,

    pub transaction_date: NaiveDate,
    pub expense_category_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
}

/// Response returned after a transaction is created or edited.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub transaction_type: String,
    pub account_id: Uuid,
    pub to_account_id: Option<Uuid>,
    pub amount_cents: i64,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub expense_category_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            transaction_type: transaction.transaction_type,
            account_id: transaction.account_id,
            to_account_id: transaction.to_account_id,
            amount_cents: transaction.amount_cents,
            description: transaction.description,
            transaction_date: transaction.transaction_date,
            expense_category_id: transaction.expense_category_id,
            income_category_id: transaction.income_category_id,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

/// Transaction joined with the names needed for listings and exports.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TransactionDetail {
    pub id: Uuid,
    pub transaction_type: String,
    pub account_id: Uuid,
    pub account_name: String,
    pub account_type: String,
    pub amount_cents: i64,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub expense_category: Option<String>,
    pub income_category: Option<String>,
    pub to_account_id: Option<Uuid>,
    pub to_account_name: Option<String>,
    pub to_account_type: Option<String>,
    pub created_at: DateTime<Utc>,
}
