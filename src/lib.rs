//! Campus ledger: a personal expense ledger and a student attendance
//! register served from one axum application.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
