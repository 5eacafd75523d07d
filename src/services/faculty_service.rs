//! Faculty signup, credentials and profile.

use crate::{
    db::DbPool,
    error::{AppError, UNIQUE_VIOLATION, is_sqlstate},
    models::faculty::{
        Faculty, FacultyForgotPasswordRequest, FacultyLoginRequest, FacultyLoginResponse,
        FacultyProfileUpdateResponse, FacultySignupRequest, FacultySignupResponse,
        UpdateFacultyProfileRequest,
    },
    services::{password, validation},
};

const FACULTY_DOES_NOT_EXIST: &str = "Faculty with this email does not exist.";
const EMAIL_IN_USE: &str = "Email address is already in use by another faculty member.";

pub fn validate_signup(request: &FacultySignupRequest) -> Result<(), AppError> {
    let required = [
        request.name.trim(),
        request.email.trim(),
        request.phone.trim(),
        request.password.as_str(),
        request.confirmpassword.as_str(),
    ];
    if required.iter().any(|v| v.is_empty()) {
        return Err(AppError::invalid(
            "All fields are required: name, email, phone, password, confirmpassword",
        ));
    }

    validation::validate_max_length(request.name.trim(), validation::MAX_NAME_CHARS, "Name")?;
    validation::validate_person_name(request.name.trim())?;
    validation::validate_email(request.email.trim())?;
    validation::validate_phone(request.phone.trim())?;
    validation::validate_strong_password(&request.password)?;
    validation::validate_confirmation(&request.password, &request.confirmpassword)?;

    Ok(())
}

pub async fn signup(
    pool: &DbPool,
    request: FacultySignupRequest,
) -> Result<FacultySignupResponse, AppError> {
    validate_signup(&request)?;

    let password_hash = password::hash_password(&request.password)?;

    let faculty = sqlx::query_as::<_, Faculty>(
        r#"
        INSERT INTO faculty (name, email, phone, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(request.name.trim())
    .bind(request.email.trim())
    .bind(request.phone.trim())
    .bind(&password_hash)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::invalid("Faculty with this email already exists."))?;

    tracing::info!(faculty_id = %faculty.id, "Faculty registered");

    Ok(FacultySignupResponse {
        message: "Faculty registered successfully.".to_string(),
        faculty_id: faculty.id,
        name: faculty.name,
        email: faculty.email,
        phone: faculty.phone,
    })
}

pub async fn login(
    pool: &DbPool,
    request: FacultyLoginRequest,
) -> Result<FacultyLoginResponse, AppError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::invalid("Email and password are required."));
    }
    validation::validate_email(email)?;

    let faculty = sqlx::query_as::<_, Faculty>("SELECT * FROM faculty WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Faculty not found with this email."))?;

    if !password::verify_password(&request.password, &faculty.password_hash) {
        return Err(AppError::unauthorized("Invalid password."));
    }

    Ok(FacultyLoginResponse {
        message: "Login successful!".to_string(),
        faculty: faculty.into(),
    })
}

pub async fn forgot_password(
    pool: &DbPool,
    request: FacultyForgotPasswordRequest,
) -> Result<String, AppError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() || request.confirmpassword.is_empty() {
        return Err(AppError::invalid(
            "All fields are required: email, password, confirmpassword",
        ));
    }
    validation::validate_email(email)?;
    validation::validate_strong_password(&request.password)?;
    validation::validate_confirmation(&request.password, &request.confirmpassword)?;

    let password_hash = password::hash_password(&request.password)?;

    let updated = sqlx::query("UPDATE faculty SET password_hash = $1 WHERE email = $2")
        .bind(&password_hash)
        .bind(email)
        .execute(pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::not_found(FACULTY_DOES_NOT_EXIST));
    }

    Ok("Password updated successfully. You can now login with your new password.".to_string())
}

/// Update the faculty member identified by `current_email`.
///
/// The email itself may change as long as no other faculty member uses it.
pub async fn update_profile(
    pool: &DbPool,
    current_email: &str,
    request: UpdateFacultyProfileRequest,
) -> Result<FacultyProfileUpdateResponse, AppError> {
    let name = request.name.trim();
    let email = request.email.trim();
    let phone = request.phone.trim();
    if name.is_empty() || email.is_empty() || phone.is_empty() {
        return Err(AppError::invalid("All fields are required: name, email, phone"));
    }

    validation::validate_max_length(name, validation::MAX_NAME_CHARS, "Name")?;
    validation::validate_profile_name(name)?;
    validation::validate_email(email)?;
    validation::validate_phone(phone)?;
    let new_password =
        validation::optional_password_change(&request.new_password, &request.confirm_password)?;
    let password_hash = new_password.map(password::hash_password).transpose()?;

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, Faculty>("SELECT * FROM faculty WHERE email = $1 FOR UPDATE")
        .bind(current_email)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(FACULTY_DOES_NOT_EXIST))?;

    if email != existing.email {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM faculty WHERE email = $1)")
                .bind(email)
                .fetch_one(&mut *tx)
                .await?;
        if taken {
            return Err(AppError::invalid(EMAIL_IN_USE));
        }
    }

    let faculty = sqlx::query_as::<_, Faculty>(
        r#"
        UPDATE faculty
        SET name = $1,
            email = $2,
            phone = $3,
            password_hash = COALESCE($4, password_hash)
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .bind(existing.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        // Another profile claimed the email after the check above
        if is_sqlstate(&e, UNIQUE_VIOLATION) {
            AppError::invalid(EMAIL_IN_USE)
        } else {
            AppError::Database(e)
        }
    })?;

    tx.commit().await?;

    let mut message = "Profile updated successfully.".to_string();
    if new_password.is_some() {
        message.push_str(" Password changed.");
    }

    Ok(FacultyProfileUpdateResponse {
        success: true,
        message,
        faculty: faculty.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FacultySignupRequest {
        FacultySignupRequest {
            name: "Ravi Sharma".into(),
            email: "ravi.sharma@college.edu".into(),
            phone: "9876543210".into(),
            password: "Lecture@42".into(),
            confirmpassword: "Lecture@42".into(),
        }
    }

    #[test]
    fn accepts_a_complete_signup() {
        assert!(validate_signup(&request()).is_ok());
    }

    #[test]
    fn name_is_limited_to_one_hundred_characters() {
        let mut req = request();
        req.name = "R".repeat(101);
        assert_eq!(
            validate_signup(&req).unwrap_err().to_string(),
            "Name must be at most 100 characters."
        );
    }

    #[test]
    fn every_field_is_required() {
        let mut req = request();
        req.phone = String::new();
        assert_eq!(
            validate_signup(&req).unwrap_err().to_string(),
            "All fields are required: name, email, phone, password, confirmpassword"
        );
    }

    #[test]
    fn rejects_bad_name_email_and_phone() {
        let mut req = request();
        req.name = "Ravi 2".into();
        assert_eq!(
            validate_signup(&req).unwrap_err().to_string(),
            "Name can only contain letters (A-Z) and spaces"
        );

        let mut req = request();
        req.email = "ravi@college".into();
        assert_eq!(
            validate_signup(&req).unwrap_err().to_string(),
            "Please enter a valid email address"
        );

        let mut req = request();
        req.phone = "98765".into();
        assert_eq!(
            validate_signup(&req).unwrap_err().to_string(),
            "Phone number must be exactly 10 digits"
        );
    }

    #[test]
    fn confirmation_is_checked_after_strength() {
        let mut req = request();
        req.password = "weak".into();
        req.confirmpassword = "other".into();
        assert_eq!(
            validate_signup(&req).unwrap_err().to_string(),
            "Password must be at least 8 characters long"
        );
    }
}
