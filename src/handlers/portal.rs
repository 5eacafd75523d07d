//! Attendance portal signup.

use crate::{
    db::DbPool,
    error::AppError,
    models::attendance::{MessageResponse, PortalSignupRequest},
    services::portal_service,
};
use axum::{Json, extract::State, http::StatusCode};

/// `POST /api/signup`
///
/// ```json
/// { "username": "office", "password": "s3cret" }
/// ```
///
/// 201 on success, 400 when a field is missing or the username is taken.
pub async fn signup(
    State(pool): State<DbPool>,
    Json(request): Json<PortalSignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    portal_service::signup(&pool, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully.")),
    ))
}
