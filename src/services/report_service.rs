//! Dashboard figures and the expense-by-category chart.

use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{Account, AccountResponse},
        category::expense_label,
        report::{DashboardResponse, ExpenseChart},
    },
    services::transaction_service,
};

/// Palette handed to the front-end chart, one colour per category slice.
pub const CHART_COLORS: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
];

/// Number of transactions shown on the dashboard.
const RECENT_TRANSACTIONS: i64 = 5;

/// Merge per-category totals from several sources into chart data.
///
/// Slices are ordered by descending total, ties broken by name. Colours are
/// taken from [`CHART_COLORS`] in order and run out after eight slices.
pub fn build_expense_chart(totals: impl IntoIterator<Item = (String, i64)>) -> ExpenseChart {
    let mut merged: HashMap<String, i64> = HashMap::new();
    for (category, amount) in totals {
        *merged.entry(category).or_insert(0) += amount;
    }

    let mut slices: Vec<(String, i64)> = merged.into_iter().collect();
    slices.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let colors = CHART_COLORS
        .iter()
        .take(slices.len())
        .map(|c| c.to_string())
        .collect();

    ExpenseChart {
        total_expense_cents: slices.iter().map(|(_, amount)| amount).sum(),
        labels: slices.iter().map(|(name, _)| expense_label(name)).collect(),
        amounts_cents: slices.into_iter().map(|(_, amount)| amount).collect(),
        colors,
    }
}

/// Expense totals per category, from expense transactions and expense records.
pub async fn expense_chart(pool: &DbPool, user_id: Uuid) -> Result<ExpenseChart, AppError> {
    let from_transactions = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT ec.name, COALESCE(SUM(t.amount_cents), 0)::BIGINT
        FROM transactions t
        JOIN accounts a ON a.id = t.account_id
        JOIN expense_categories ec ON ec.id = t.expense_category_id
        WHERE a.user_id = $1 AND t.transaction_type = 'expense'
        GROUP BY ec.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let from_expenses = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT ec.name, COALESCE(SUM(e.amount_cents), 0)::BIGINT
        FROM expenses e
        JOIN expense_categories ec ON ec.id = e.category_id
        WHERE e.user_id = $1
        GROUP BY ec.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(build_expense_chart(
        from_transactions.into_iter().chain(from_expenses),
    ))
}

async fn transaction_total(pool: &DbPool, user_id: Uuid, kind: &str) -> Result<i64, AppError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(t.amount_cents), 0)::BIGINT
        FROM transactions t
        JOIN accounts a ON a.id = t.account_id
        WHERE a.user_id = $1 AND t.transaction_type = $2
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

pub async fn dashboard(pool: &DbPool, user_id: Uuid) -> Result<DashboardResponse, AppError> {
    let accounts = sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let recent_transactions =
        transaction_service::list_for_user(pool, user_id, Some(RECENT_TRANSACTIONS)).await?;

    let total_balance_cents = accounts.iter().map(|a| a.balance_cents).sum();
    let total_income_cents = transaction_total(pool, user_id, "income").await?;

    let expense_records: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM expenses WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    let total_expense_cents = transaction_total(pool, user_id, "expense").await? + expense_records;

    let expense_chart = expense_chart(pool, user_id).await?;

    Ok(DashboardResponse {
        accounts: accounts.into_iter().map(AccountResponse::from).collect(),
        recent_transactions,
        total_balance_cents,
        total_income_cents,
        total_expense_cents,
        expense_chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_sources_and_orders_by_total() {
        let chart = build_expense_chart(vec![
            ("food".to_string(), 1_000),
            ("transport".to_string(), 2_500),
            ("food".to_string(), 2_000),
            ("social_life".to_string(), 400),
        ]);

        assert_eq!(chart.labels, vec!["Food", "Transport", "Social Life"]);
        assert_eq!(chart.amounts_cents, vec![3_000, 2_500, 400]);
        assert_eq!(chart.colors, vec!["#FF6384", "#36A2EB", "#FFCE56"]);
        assert_eq!(chart.total_expense_cents, 5_900);
    }

    #[test]
    fn empty_chart_has_no_slices() {
        let chart = build_expense_chart(Vec::new());

        assert!(chart.labels.is_empty());
        assert!(chart.colors.is_empty());
        assert_eq!(chart.total_expense_cents, 0);
    }

    #[test]
    fn colours_run_out_after_the_palette() {
        let totals = (0..10).map(|i| (format!("c{}", i), 100 - i as i64));
        let chart = build_expense_chart(totals);

        assert_eq!(chart.labels.len(), 10);
        assert_eq!(chart.colors.len(), CHART_COLORS.len());
    }
}
