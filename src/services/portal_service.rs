//! Username/password accounts of the attendance portal.

use crate::{
    db::DbPool,
    error::AppError,
    models::attendance::{AttendanceUser, PortalSignupRequest},
    services::{password, validation},
};

pub async fn signup(pool: &DbPool, request: PortalSignupRequest) -> Result<AttendanceUser, AppError> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::invalid("Username and password required."));
    }
    validation::validate_max_length(username, validation::MAX_USERNAME_CHARS, "Username")?;

    let password_hash = password::hash_password(&request.password)?;

    let user = sqlx::query_as::<_, AttendanceUser>(
        r#"
        INSERT INTO attendance_users (username, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (username) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(&password_hash)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::invalid("Username already exists."))?;

    tracing::info!(username = %user.username, "Portal user created");

    Ok(user)
}
