//! Account data models and API request/response types.
//!
//! # Balance Storage
//!
//! Balances are stored as `i64` cents. A balance may go negative: credit
//! card accounts routinely carry a debt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::models::transaction::TransactionDetail;

/// Kind of money account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Cash,
    Bank,
    Credit,
    Investment,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "cash",
            AccountType::Bank => "bank",
            AccountType::Credit => "credit",
            AccountType::Investment => "investment",
            AccountType::Other => "other",
        }
    }

    /// Human-readable label, as shown in exports.
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Cash => "Cash",
            AccountType::Bank => "Bank Account",
            AccountType::Credit => "Credit Card",
            AccountType::Investment => "Investment",
            AccountType::Other => "Other",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(AccountType::Cash),
            "bank" => Ok(AccountType::Bank),
            "credit" => Ok(AccountType::Credit),
            "investment" => Ok(AccountType::Investment),
            "other" => Ok(AccountType::Other),
            other => Err(format!("Unknown account type: {}", other)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"<name> (<type label>)"`, falling back to the raw type string.
pub fn account_display(account_name: &str, account_type: &str) -> String {
    let label = account_type
        .parse::<AccountType>()
        .map(|t| t.label())
        .unwrap_or(account_type);
    format!("{} ({})", account_name, label)
}

/// Represents an account record from the database.
///
/// Every query filters by `user_id`, so a user never sees another user's
/// accounts.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_type: String,
    pub account_name: String,
    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_type": "bank",
///   "account_name": "Salary Account",
///   "balance_cents": 250000
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub account_type: AccountType,

    #[serde(default)]
    pub account_name: String,

    /// Opening balance in cents (defaults to 0)
    #[serde(default)]
    pub balance_cents: i64,
}

/// Response body for account endpoints.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub account_type: String,
    pub account_name: String,
    pub display_name: String,
    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            display_name: account_display(&account.account_name, &account.account_type),
            id: account.id,
            account_type: account.account_type,
            account_name: account.account_name,
            balance_cents: account.balance_cents,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// `GET /api/v1/accounts/{id}`: the account and every transaction touching it.
#[derive(Debug, Serialize)]
pub struct AccountDetailResponse {
    pub account: AccountResponse,
    pub transactions: Vec<TransactionDetail>,
}
