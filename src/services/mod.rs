//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and complex operations.
//! Pure helpers ([`ledger`], [`validation`], the report builders) do no I/O
//! and carry most of the unit tests.

pub mod attendance_service;
pub mod auth_service;
pub mod category_service;
pub mod chart_service;
pub mod export_service;
pub mod faculty_service;
pub mod ledger;
pub mod password;
pub mod portal_service;
pub mod report_service;
pub mod student_service;
pub mod transaction_service;
pub mod validation;
