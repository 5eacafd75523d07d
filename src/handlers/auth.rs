//! Ledger user registration and session HTTP handlers.
//!
//! - POST /api/v1/auth/register - Create a user and log in
//! - POST /api/v1/auth/login - Start a session
//! - POST /api/v1/auth/logout - End the current session

use crate::{
    app::AppState,
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::user::{AuthResponse, LoginRequest, RegisterRequest},
    services::auth_service,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

/// Register a new ledger user.
///
/// # Request Body
///
/// ```json
/// {
///   "username": "asha",
///   "email": "asha@example.com",
///   "password1": "correct horse",
///   "password2": "correct horse"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the user and a session token
/// - **Error (400)**: validation failure or username taken
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response =
        auth_service::register(&state.pool, request, state.default_currency, state.session_ttl)
            .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with username and password.
///
/// # Response
///
/// - **Success (200 OK)**: the user and a session token
/// - **Error (401)**: unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = auth_service::login(&state.pool, request, state.session_ttl).await?;
    Ok(Json(response))
}

/// End the session used for this request. Returns 204.
pub async fn logout(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    auth_service::logout(&pool, &auth.token).await?;
    tracing::info!(user_id = %auth.user_id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
