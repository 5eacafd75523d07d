//! Standalone expense records.
//!
//! Unlike transactions, expenses are not tied to an account and never move
//! a balance. They still count towards dashboard totals and the expense chart.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub description: String,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or editing an expense.
///
/// ```json
/// {
///   "amount_cents": 45000,
///   "description": "Groceries",
///   "category_id": "550e8400-e29b-41d4-a716-446655440000",
///   "date": "2025-06-02",
///   "payment_method": "debit_card"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    pub amount_cents: i64,
    #[serde(default)]
    pub description: String,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
}

/// Expense joined with its category name.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ExpenseDetail {
    pub id: Uuid,
    pub amount_cents: i64,
    pub description: String,
    pub category_id: Uuid,
    pub category: String,
    pub date: NaiveDate,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
