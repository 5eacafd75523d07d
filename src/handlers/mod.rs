//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service or runs a simple owner-scoped query
//! 3. Returns HTTP response (JSON, status code, file)

/// Account management endpoints
pub mod accounts;

/// Attendance records, statistics and chart
pub mod attendance;

/// Ledger registration, login and logout
pub mod auth;

pub mod categories;
pub mod expenses;
pub mod faculty;

/// Health check endpoint
pub mod health;

/// Attendance portal signup
pub mod portal;

pub mod profile;

/// Dashboard, expense chart and xlsx export
pub mod reports;

pub mod students;

/// Transaction endpoints
pub mod transactions;
