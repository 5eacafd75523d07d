//! Category HTTP handlers.
//!
//! Categories are shared by all users; names are limited to fixed choices.

use crate::{
    db::DbPool,
    error::AppError,
    models::category::{
        AddExpenseCategoryRequest, AddIncomeCategoryRequest, CategoriesResponse, CategoryResponse,
    },
    services::category_service,
};
use axum::{Json, extract::State, http::StatusCode};

/// `GET /api/v1/categories`: expense and income categories with labels.
pub async fn list_categories(
    State(pool): State<DbPool>,
) -> Result<Json<CategoriesResponse>, AppError> {
    Ok(Json(category_service::list_categories(&pool).await?))
}

/// `POST /api/v1/categories/expense`
///
/// ```json
/// { "name": "pets" }
/// ```
///
/// 400 when the category already exists, 422 when `name` is not a choice.
pub async fn add_expense_category(
    State(pool): State<DbPool>,
    Json(request): Json<AddExpenseCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let category = category_service::add_expense_category(&pool, request.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// `POST /api/v1/categories/income`
pub async fn add_income_category(
    State(pool): State<DbPool>,
    Json(request): Json<AddIncomeCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let category = category_service::add_income_category(&pool, request.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
