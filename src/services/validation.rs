//! Input validation rules shared by the ledger and attendance endpoints.
//!
//! Each check returns `AppError::InvalidRequest` carrying the message shown
//! to the user. Checks run in the order callers invoke them, so the first
//! failing rule decides the message.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;

/// Amounts and balances stay below 100,000,000.00, ten digits in cents.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;

// Column widths of the attendance and user tables.
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_BRANCH_CHARS: usize = 100;
pub const MAX_ROLL_CHARS: usize = 50;
pub const MAX_ENROLLMENT_CHARS: usize = 50;
pub const MAX_BATCH_CHARS: usize = 50;
pub const MAX_PHONE_CHARS: usize = 15;
pub const MAX_USERNAME_CHARS: usize = 150;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PERSON_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").unwrap());
static ENROLLMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{14}$").unwrap());
static ROLL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static SPECIAL_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap());

pub fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(message));
    }
    Ok(())
}

/// `field` may hold at most `max` characters.
pub fn validate_max_length(value: &str, max: usize, field: &str) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::invalid(format!(
            "{} must be at most {} characters.",
            field, max
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if !EMAIL.is_match(email) {
        return Err(AppError::invalid("Please enter a valid email address"));
    }
    Ok(())
}

/// Letters and spaces only.
pub fn validate_person_name(name: &str) -> Result<(), AppError> {
    if !PERSON_NAME.is_match(name) {
        return Err(AppError::invalid(
            "Name can only contain letters (A-Z) and spaces",
        ));
    }
    Ok(())
}

/// Profile edits also demand at least two characters.
pub fn validate_profile_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    require(name, "Name is required")?;
    validate_person_name(name)?;
    if name.chars().count() < 2 {
        return Err(AppError::invalid("Name must be at least 2 characters long"));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    if !PHONE.is_match(phone) {
        return Err(AppError::invalid("Phone number must be exactly 10 digits"));
    }
    Ok(())
}

pub fn validate_enrollment_number(enrollment_nu: &str) -> Result<(), AppError> {
    if !ENROLLMENT.is_match(enrollment_nu) {
        return Err(AppError::invalid(
            "Enrollment number must be exactly 14 digits",
        ));
    }
    Ok(())
}

pub fn validate_roll_number(roll_nu: &str) -> Result<(), AppError> {
    if !ROLL_NUMBER.is_match(roll_nu) {
        return Err(AppError::invalid("Roll number must contain only digits"));
    }
    Ok(())
}

pub fn validate_min_length_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < 8 {
        return Err(AppError::invalid(
            "Password must be at least 8 characters long",
        ));
    }
    Ok(())
}

/// Length, lowercase, uppercase, digit, special character; in that order.
pub fn validate_strong_password(password: &str) -> Result<(), AppError> {
    validate_min_length_password(password)?;
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::invalid(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::invalid(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::invalid(
            "Password must contain at least one number",
        ));
    }
    if !SPECIAL_CHAR.is_match(password) {
        return Err(AppError::invalid(
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), AppError> {
    if password != confirmation {
        return Err(AppError::invalid(
            "Password and confirm password do not match",
        ));
    }
    Ok(())
}

/// Optional password change on profile edits.
///
/// Returns the new password when one was supplied and passes every rule,
/// `None` when both fields are blank.
pub fn optional_password_change<'a>(
    new_password: &'a str,
    confirm_password: &str,
) -> Result<Option<&'a str>, AppError> {
    if new_password.is_empty() && confirm_password.is_empty() {
        return Ok(None);
    }
    if new_password.is_empty() {
        return Err(AppError::invalid(
            "New password is required if changing password.",
        ));
    }
    if confirm_password.is_empty() {
        return Err(AppError::invalid("Please confirm your new password."));
    }
    if new_password != confirm_password {
        return Err(AppError::invalid("Passwords do not match."));
    }
    validate_strong_password(new_password)?;
    Ok(Some(new_password))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::invalid("Invalid date format. Please use YYYY-MM-DD format.")
    })
}

/// Parse an optional date, falling back to `today` when absent or blank.
pub fn parse_date_or(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => parse_date(v),
        _ => Ok(today),
    }
}

pub fn validate_date_of_birth(value: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    require(value, "Date of birth is required")?;
    let dob = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid("Invalid date format"))?;
    if dob > today {
        return Err(AppError::invalid("Date of birth cannot be in the future"));
    }
    Ok(dob)
}

pub fn validate_present_flag(present: i32) -> Result<(), AppError> {
    if present != 0 && present != 1 {
        return Err(AppError::invalid(
            "Present must be 1 (present) or 0 (absent)",
        ));
    }
    Ok(())
}

/// Account names need at least one ASCII letter.
pub fn validate_account_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    require(name, "Account name is required.")?;
    if name.chars().count() > 100 {
        return Err(AppError::invalid(
            "Account name must be at most 100 characters.",
        ));
    }
    if !name.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::invalid(
            "Account name must contain at least one letter.",
        ));
    }
    Ok(())
}

pub fn validate_amount(amount_cents: i64) -> Result<(), AppError> {
    if amount_cents <= 0 {
        return Err(AppError::invalid("Amount must be positive"));
    }
    if amount_cents >= MAX_AMOUNT_CENTS {
        return Err(AppError::invalid(
            "Amount must be less than 100,000,000.00",
        ));
    }
    Ok(())
}

/// Opening balances may be negative but share the amount bound.
pub fn validate_balance(balance_cents: i64) -> Result<(), AppError> {
    if balance_cents <= -MAX_AMOUNT_CENTS || balance_cents >= MAX_AMOUNT_CENTS {
        return Err(AppError::invalid(
            "Balance must be between -100,000,000.00 and 100,000,000.00",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), AppError>) -> String {
        result.unwrap_err().to_string()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn strong_password_reports_first_missing_rule() {
        assert_eq!(
            message(validate_strong_password("Ab1!")),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            message(validate_strong_password("ABCDEFG1!")),
            "Password must contain at least one lowercase letter"
        );
        assert_eq!(
            message(validate_strong_password("abcdefg1!")),
            "Password must contain at least one uppercase letter"
        );
        assert_eq!(
            message(validate_strong_password("Abcdefgh!")),
            "Password must contain at least one number"
        );
        assert_eq!(
            message(validate_strong_password("Abcdefgh1")),
            "Password must contain at least one special character"
        );
        assert!(validate_strong_password("Abcdefg1!").is_ok());
    }

    #[test]
    fn enrollment_numbers_are_fourteen_digits() {
        assert!(validate_enrollment_number("12345678901234").is_ok());
        assert!(validate_enrollment_number("1234567890123").is_err());
        assert!(validate_enrollment_number("1234567890123a").is_err());
    }

    #[test]
    fn phone_numbers_are_ten_digits() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("98765 43210").is_err());
        assert!(validate_phone("+919876543210").is_err());
    }

    #[test]
    fn email_needs_local_part_domain_and_dot() {
        assert!(validate_email("lecturer@college.edu").is_ok());
        assert!(validate_email("lecturer@college").is_err());
        assert!(validate_email("tea cher@college.edu").is_err());
    }

    #[test]
    fn names_reject_digits_and_short_values() {
        assert!(validate_person_name("Asha Rao").is_ok());
        assert!(validate_person_name("R2D2").is_err());
        assert_eq!(
            message(validate_profile_name(" A ")),
            "Name must be at least 2 characters long"
        );
    }

    #[test]
    fn account_name_needs_a_letter() {
        assert_eq!(
            message(validate_account_name("1234")),
            "Account name must contain at least one letter."
        );
        assert!(validate_account_name("Wallet 2").is_ok());
    }

    #[test]
    fn dates_use_iso_format() {
        assert_eq!(parse_date("2025-03-09").unwrap(), day(2025, 3, 9));
        assert_eq!(
            parse_date("09/03/2025").unwrap_err().to_string(),
            "Invalid date format. Please use YYYY-MM-DD format."
        );
        assert_eq!(parse_date_or(None, day(2025, 1, 1)).unwrap(), day(2025, 1, 1));
        assert_eq!(parse_date_or(Some(""), day(2025, 1, 1)).unwrap(), day(2025, 1, 1));
    }

    #[test]
    fn date_of_birth_cannot_be_in_the_future() {
        let today = day(2025, 6, 1);
        assert!(validate_date_of_birth("2000-01-15", today).is_ok());
        assert_eq!(
            validate_date_of_birth("2025-06-02", today).unwrap_err().to_string(),
            "Date of birth cannot be in the future"
        );
    }

    #[test]
    fn optional_password_change_rules() {
        assert_eq!(optional_password_change("", "").unwrap(), None);
        assert_eq!(
            optional_password_change("", "Abcdefg1!").unwrap_err().to_string(),
            "New password is required if changing password."
        );
        assert_eq!(
            optional_password_change("Abcdefg1!", "Abcdefg1?").unwrap_err().to_string(),
            "Passwords do not match."
        );
        assert_eq!(
            optional_password_change("Abcdefg1!", "Abcdefg1!").unwrap(),
            Some("Abcdefg1!")
        );
    }

    #[test]
    fn amounts_are_positive_and_bounded() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(MAX_AMOUNT_CENTS - 1).is_ok());
        assert_eq!(
            message(validate_amount(MAX_AMOUNT_CENTS)),
            "Amount must be less than 100,000,000.00"
        );
        assert!(validate_amount(i64::MAX).is_err());
        assert!(validate_amount(0).is_err());
    }

    #[test]
    fn opening_balance_may_be_negative_within_bound() {
        assert!(validate_balance(-125_000).is_ok());
        assert!(validate_balance(0).is_ok());
        assert!(validate_balance(-MAX_AMOUNT_CENTS).is_err());
        assert!(validate_balance(i64::MIN).is_err());
        assert!(validate_balance(MAX_AMOUNT_CENTS).is_err());
    }

    #[test]
    fn max_length_counts_characters() {
        assert!(validate_max_length(&"a".repeat(100), MAX_NAME_CHARS, "Name").is_ok());
        assert_eq!(
            message(validate_max_length(&"a".repeat(101), MAX_NAME_CHARS, "Name")),
            "Name must be at most 100 characters."
        );
        // multi-byte characters count once
        assert!(validate_max_length(&"é".repeat(15), MAX_PHONE_CHARS, "Phone number").is_ok());
    }

    #[test]
    fn present_flag_is_zero_or_one() {
        assert!(validate_present_flag(0).is_ok());
        assert!(validate_present_flag(1).is_ok());
        assert!(validate_present_flag(2).is_err());
    }
}
