//! Shared expense and income categories.

use crate::{
    db::DbPool,
    error::AppError,
    models::category::{
        CategoriesResponse, Category, CategoryResponse, ExpenseCategoryName, IncomeCategoryName,
    },
};

/// Insert every default category that does not exist yet.
///
/// Idempotent; returns how many expense and income categories were created.
pub async fn ensure_default_categories(pool: &DbPool) -> Result<(u64, u64), AppError> {
    let mut created_expense = 0;
    for name in ExpenseCategoryName::ALL {
        created_expense += sqlx::query(
            "INSERT INTO expense_categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name.as_str())
        .execute(pool)
        .await?
        .rows_affected();
    }

    let mut created_income = 0;
    for name in IncomeCategoryName::ALL {
        created_income += sqlx::query(
            "INSERT INTO income_categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name.as_str())
        .execute(pool)
        .await?
        .rows_affected();
    }

    if created_expense + created_income > 0 {
        tracing::info!(
            "Created {} expense categories and {} income categories",
            created_expense,
            created_income
        );
    }

    Ok((created_expense, created_income))
}

pub async fn list_categories(pool: &DbPool) -> Result<CategoriesResponse, AppError> {
    let expense = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM expense_categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    let income = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM income_categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(CategoriesResponse {
        expense_categories: expense.into_iter().map(CategoryResponse::expense).collect(),
        income_categories: income.into_iter().map(CategoryResponse::income).collect(),
    })
}

pub async fn add_expense_category(
    pool: &DbPool,
    name: ExpenseCategoryName,
) -> Result<CategoryResponse, AppError> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO expense_categories (name) VALUES ($1)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name, created_at
        "#,
    )
    .bind(name.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::invalid("Expense category with this name already exists."))?;

    Ok(CategoryResponse::expense(category))
}

pub async fn add_income_category(
    pool: &DbPool,
    name: IncomeCategoryName,
) -> Result<CategoryResponse, AppError> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO income_categories (name) VALUES ($1)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name, created_at
        "#,
    )
    .bind(name.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::invalid("Income category with this name already exists."))?;

    Ok(CategoryResponse::income(category))
}
