//! Data models representing database entities and API payloads.

/// Ledger user accounts and login sessions
pub mod user;
/// Money accounts (cash, bank, credit card, ...)
pub mod account;
/// Income, expense and transfer transactions
pub mod transaction;
/// Shared expense and income categories
pub mod category;
/// Standalone expense records
pub mod expense;
/// Per-user currency and budget settings
pub mod profile;
/// Dashboard and chart payloads
pub mod report;
/// Registered students
pub mod student;
/// Registered faculty members
pub mod faculty;
/// Student and faculty attendance records
pub mod attendance;
