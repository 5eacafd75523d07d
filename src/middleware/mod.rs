//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit a request,
//! e.g. reject one without a valid session.

/// Bearer session authentication middleware
pub mod auth;
