//! User profile handlers: display currency and monthly budget.

use crate::{
    app::AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::profile::{UpdateProfileRequest, UserProfile},
    services::validation,
};
use axum::{Extension, Json, extract::State};

/// `GET /api/v1/profile`
///
/// Users created before profiles existed get one with the default currency.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (user_id, currency)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING user_id, currency, monthly_budget_cents
        "#,
    )
    .bind(auth.user_id)
    .bind(state.default_currency.code())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(profile))
}

/// `PUT /api/v1/profile`
///
/// ```json
/// { "currency": "USD", "monthly_budget_cents": 5000000 }
/// ```
///
/// 400 for a negative budget, 422 for an unsupported currency.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if request.monthly_budget_cents < 0 {
        return Err(AppError::invalid("Monthly budget cannot be negative."));
    }
    if request.monthly_budget_cents >= validation::MAX_AMOUNT_CENTS {
        return Err(AppError::invalid(
            "Monthly budget must be less than 100,000,000.00",
        ));
    }

    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (user_id, currency, monthly_budget_cents)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
        SET currency = EXCLUDED.currency,
            monthly_budget_cents = EXCLUDED.monthly_budget_cents
        RETURNING user_id, currency, monthly_budget_cents
        "#,
    )
    .bind(auth.user_id)
    .bind(request.currency.code())
    .bind(request.monthly_budget_cents)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(profile))
}
