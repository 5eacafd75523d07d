//! Bearer session authentication middleware.
//!
//! This middleware intercepts every protected ledger request to:
//! 1. Extract the session token from the Authorization header
//! 2. Resolve it to a live session (hashed lookup, expiry checked)
//! 3. Inject authentication context into the request
//! 4. Reject unauthenticated requests with HTTP 401

use crate::{db::DbPool, error::AppError, services::auth_service};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; handlers extract it with
/// `Extension<AuthContext>` and scope every query by `user_id`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,

    /// Raw bearer token, kept so logout can end this session
    pub token: String,
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Session authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Look up the SHA-256 digest of `<token>` among unexpired sessions
/// 3. If found: inject `AuthContext` into request, call next handler
/// 4. If not found: return 401 `invalid_session`
///
/// A request without a token never reaches the database.
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or(AppError::InvalidSession)?
        .to_string();

    let session = auth_service::resolve_session(&pool, &token).await?;

    request.extensions_mut().insert(AuthContext {
        user_id: session.user_id,
        username: session.username,
        token,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        assert_eq!(bearer_token(&headers("Basic abc123")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
