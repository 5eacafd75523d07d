//! Ledger user registration, login and sessions.
//!
//! Sessions are opaque bearer tokens. The client receives the token once;
//! the `sessions` table stores only its SHA-256 digest and an expiry.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        profile::Currency,
        user::{AuthResponse, LoginRequest, RegisterRequest, SessionUser, User},
    },
    services::{category_service, password, validation},
};

const INVALID_LOGIN: &str = "Invalid username or password";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Checks that need no database access, in the order a form reports them.
pub fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    let username = request.username.trim();
    validation::require(username, "Username is required.")?;
    if username.chars().count() > validation::MAX_USERNAME_CHARS {
        return Err(AppError::invalid(
            "Username must be 150 characters or fewer.",
        ));
    }

    validation::validate_email(request.email.trim())?;

    if let Some(phone) = request.phone.as_deref() {
        if phone.trim().chars().count() > validation::MAX_PHONE_CHARS {
            return Err(AppError::invalid(
                "Phone number must be 15 characters or fewer.",
            ));
        }
    }

    if request.password1 != request.password2 {
        return Err(AppError::invalid("The two password fields didn't match."));
    }
    if request.password1.chars().count() < 8 {
        return Err(AppError::invalid(
            "This password is too short. It must contain at least 8 characters.",
        ));
    }
    if request.password1.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::invalid("This password is entirely numeric."));
    }

    Ok(())
}

/// Create a user with a profile and log them in.
pub async fn register(
    pool: &DbPool,
    request: RegisterRequest,
    default_currency: Currency,
    session_ttl: Duration,
) -> Result<AuthResponse, AppError> {
    validate_registration(&request)?;

    let username = request.username.trim().to_string();

    let password_hash = password::hash_password(&request.password1)?;
    let phone = request.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    let address = request.address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

    let mut tx = pool.begin().await?;

    // Empty when the username exists, also when a concurrent insert won
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, phone, address, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (username) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(&username)
    .bind(request.email.trim())
    .bind(phone)
    .bind(address)
    .bind(&password_hash)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::invalid(USERNAME_TAKEN))?;

    sqlx::query("INSERT INTO user_profiles (user_id, currency) VALUES ($1, $2)")
        .bind(user.id)
        .bind(default_currency.code())
        .execute(&mut *tx)
        .await?;

    let (token, expires_at) = create_session(&mut tx, user.id, session_ttl).await?;

    tx.commit().await?;

    category_service::ensure_default_categories(pool).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(AuthResponse {
        user: user.into(),
        token,
        expires_at,
    })
}

pub async fn login(
    pool: &DbPool,
    request: LoginRequest,
    session_ttl: Duration,
) -> Result<AuthResponse, AppError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::unauthorized(INVALID_LOGIN));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(request.username.trim())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_LOGIN))?;

    if !password::verify_password(&request.password, &user.password_hash) {
        return Err(AppError::unauthorized(INVALID_LOGIN));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= NOW()")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

    let (token, expires_at) = create_session(&mut tx, user.id, session_ttl).await?;

    tx.commit().await?;

    Ok(AuthResponse {
        user: user.into(),
        token,
        expires_at,
    })
}

pub async fn logout(pool: &DbPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(password::hash_token(token))
        .execute(pool)
        .await?;
    Ok(())
}

/// Look up the live session for a bearer token.
pub async fn resolve_session(pool: &DbPool, token: &str) -> Result<SessionUser, AppError> {
    sqlx::query_as::<_, SessionUser>(
        r#"
        SELECT s.user_id, u.username, s.expires_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(password::hash_token(token))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::InvalidSession)
}

async fn create_session(
    conn: &mut PgConnection,
    user_id: Uuid,
    ttl: Duration,
) -> Result<(String, DateTime<Utc>), AppError> {
    let token = password::generate_token();
    let expires_at = Utc::now() + ttl;

    sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(password::hash_token(&token))
        .bind(user_id)
        .bind(expires_at)
        .execute(&mut *conn)
        .await?;

    Ok((token, expires_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password1: &str, password2: &str) -> RegisterRequest {
        RegisterRequest {
            username: "asha".into(),
            email: "asha@example.com".into(),
            phone: Some("9876543210".into()),
            address: None,
            password1: password1.into(),
            password2: password2.into(),
        }
    }

    #[test]
    fn accepts_a_complete_registration() {
        assert!(validate_registration(&request("ledger-pass", "ledger-pass")).is_ok());
    }

    #[test]
    fn rejects_mismatched_short_or_numeric_passwords() {
        assert_eq!(
            validate_registration(&request("ledger-pass", "ledger-pas"))
                .unwrap_err()
                .to_string(),
            "The two password fields didn't match."
        );
        assert!(validate_registration(&request("short", "short")).is_err());
        assert_eq!(
            validate_registration(&request("12345678", "12345678"))
                .unwrap_err()
                .to_string(),
            "This password is entirely numeric."
        );
    }

    #[test]
    fn usernames_may_contain_spaces_and_symbols() {
        let mut req = request("ledger-pass", "ledger-pass");
        req.username = "Asha R. (home)".into();
        assert!(validate_registration(&req).is_ok());

        req.username = "   ".into();
        assert!(validate_registration(&req).is_err());
    }
}
