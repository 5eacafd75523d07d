//! Student registration, credentials, profile and batch listings.

use chrono::NaiveDate;

use crate::{
    db::DbPool,
    error::AppError,
    models::student::{
        BatchListResponse, RegisterStudentRequest, Student, StudentForgotPasswordRequest,
        StudentLoginRequest, StudentLoginResponse, StudentProfileUpdateResponse, StudentResponse,
        StudentsByBatchResponse, UpdateStudentProfileRequest,
    },
    services::{password, validation},
};

const STUDENT_NOT_FOUND: &str = "Student not found with this enrollment number.";

/// Field checks for a new student, returning the parsed date of birth.
pub fn validate_registration(
    request: &RegisterStudentRequest,
    today: NaiveDate,
) -> Result<NaiveDate, AppError> {
    let required = [
        &request.name,
        &request.roll_nu,
        &request.enrollment_nu,
        &request.branch,
        &request.batch,
        &request.date_of_birth,
        &request.password,
        &request.confirmpassword,
    ];
    if required.iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::invalid(
            "All fields are required: name, roll_nu, enrollment_nu, branch, batch, date_of_birth, password, confirmpassword",
        ));
    }

    validation::validate_max_length(request.name.trim(), validation::MAX_NAME_CHARS, "Name")?;
    validation::validate_person_name(request.name.trim())?;
    validation::validate_max_length(
        request.roll_nu.trim(),
        validation::MAX_ROLL_CHARS,
        "Roll number",
    )?;
    validation::validate_roll_number(request.roll_nu.trim())?;
    validation::validate_enrollment_number(request.enrollment_nu.trim())?;
    validation::validate_max_length(request.branch.trim(), validation::MAX_BRANCH_CHARS, "Branch")?;
    validation::validate_max_length(request.batch.trim(), validation::MAX_BATCH_CHARS, "Batch")?;
    let date_of_birth = validation::validate_date_of_birth(&request.date_of_birth, today)?;
    validation::validate_strong_password(&request.password)?;
    validation::validate_confirmation(&request.password, &request.confirmpassword)?;

    Ok(date_of_birth)
}

pub async fn register_student(
    pool: &DbPool,
    request: RegisterStudentRequest,
    today: NaiveDate,
) -> Result<StudentResponse, AppError> {
    let date_of_birth = validate_registration(&request, today)?;
    let password_hash = password::hash_password(&request.password)?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (name, roll_nu, enrollment_nu, branch, batch, date_of_birth, password_hash)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (enrollment_nu) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(request.name.trim())
    .bind(request.roll_nu.trim())
    .bind(request.enrollment_nu.trim())
    .bind(request.branch.trim())
    .bind(request.batch.trim())
    .bind(date_of_birth)
    .bind(&password_hash)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::invalid("Student with this enrollment number already exists."))?;

    tracing::info!(enrollment_nu = %student.enrollment_nu, "Student registered");

    Ok(student.into())
}

pub async fn list_students(pool: &DbPool) -> Result<Vec<StudentResponse>, AppError> {
    let students = sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    Ok(students.into_iter().map(StudentResponse::from).collect())
}

pub async fn login(
    pool: &DbPool,
    request: StudentLoginRequest,
) -> Result<StudentLoginResponse, AppError> {
    let enrollment_nu = request.enrollment_nu.trim();
    if enrollment_nu.is_empty() || request.password.is_empty() {
        return Err(AppError::invalid(
            "Enrollment number and password are required.",
        ));
    }
    validation::validate_enrollment_number(enrollment_nu)?;

    let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE enrollment_nu = $1")
        .bind(enrollment_nu)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found(STUDENT_NOT_FOUND))?;

    let Some(hash) = student.password_hash.as_deref() else {
        return Err(AppError::unauthorized(
            "Student account not properly set up. Please contact administrator.",
        ));
    };
    if !password::verify_password(&request.password, hash) {
        return Err(AppError::unauthorized("Invalid password."));
    }

    Ok(StudentLoginResponse {
        message: "Login successful!".to_string(),
        student: student.into(),
    })
}

pub async fn forgot_password(
    pool: &DbPool,
    request: StudentForgotPasswordRequest,
) -> Result<String, AppError> {
    let enrollment_nu = request.enrollment_nu.trim();
    if enrollment_nu.is_empty() || request.new_password.is_empty() || request.confirm_password.is_empty()
    {
        return Err(AppError::invalid(
            "Enrollment number, new password, and confirm password are required.",
        ));
    }
    validation::validate_enrollment_number(enrollment_nu)?;
    validation::validate_min_length_password(&request.new_password)?;
    validation::validate_confirmation(&request.new_password, &request.confirm_password)?;

    let password_hash = password::hash_password(&request.new_password)?;

    let updated = sqlx::query("UPDATE students SET password_hash = $1 WHERE enrollment_nu = $2")
        .bind(&password_hash)
        .bind(enrollment_nu)
        .execute(pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::not_found(STUDENT_NOT_FOUND));
    }

    Ok("Password updated successfully! You can now login with your new password.".to_string())
}

/// Update name, roll number and date of birth, and optionally the password.
///
/// Enrollment number, branch and batch are fixed after registration.
pub async fn update_profile(
    pool: &DbPool,
    enrollment_nu: &str,
    request: UpdateStudentProfileRequest,
    today: NaiveDate,
) -> Result<StudentProfileUpdateResponse, AppError> {
    let name = request.name.trim();
    let roll_nu = request.roll_nu.trim();
    if name.is_empty() || roll_nu.is_empty() || request.date_of_birth.trim().is_empty() {
        return Err(AppError::invalid(
            "All fields are required: name, roll_nu, date_of_birth",
        ));
    }

    validation::validate_max_length(name, validation::MAX_NAME_CHARS, "Name")?;
    validation::validate_profile_name(name)?;
    validation::require(roll_nu, "Roll number is required")?;
    validation::validate_max_length(roll_nu, validation::MAX_ROLL_CHARS, "Roll number")?;
    let date_of_birth = validation::validate_date_of_birth(&request.date_of_birth, today)?;
    let new_password =
        validation::optional_password_change(&request.new_password, &request.confirm_password)?;

    let password_hash = new_password.map(password::hash_password).transpose()?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        UPDATE students
        SET name = $1,
            roll_nu = $2,
            date_of_birth = $3,
            password_hash = COALESCE($4, password_hash)
        WHERE enrollment_nu = $5
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(roll_nu)
    .bind(date_of_birth)
    .bind(password_hash)
    .bind(enrollment_nu)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Student with this enrollment number does not exist."))?;

    let mut message = "Profile updated successfully.".to_string();
    if new_password.is_some() {
        message.push_str(" Password changed.");
    }

    Ok(StudentProfileUpdateResponse {
        success: true,
        message,
        student: student.into(),
    })
}

pub async fn list_batches(pool: &DbPool) -> Result<BatchListResponse, AppError> {
    let batches: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT batch FROM students ORDER BY batch")
            .fetch_all(pool)
            .await?;

    Ok(BatchListResponse {
        total_batches: batches.len(),
        batches,
    })
}

pub async fn students_by_batch(
    pool: &DbPool,
    batch: &str,
) -> Result<StudentsByBatchResponse, AppError> {
    let batch = batch.trim();
    validation::require(batch, "Batch parameter is required.")?;

    let students = sqlx::query_as::<_, Student>(
        "SELECT * FROM students WHERE batch = $1 ORDER BY roll_nu",
    )
    .bind(batch)
    .fetch_all(pool)
    .await?;

    let students: Vec<StudentResponse> = students.into_iter().map(StudentResponse::from).collect();

    Ok(StudentsByBatchResponse {
        batch: batch.to_string(),
        total_students: students.len(),
        students,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn request() -> RegisterStudentRequest {
        RegisterStudentRequest {
            name: "Asha Rao".into(),
            roll_nu: "17".into(),
            enrollment_nu: "12345678901234".into(),
            branch: "Computer Science".into(),
            batch: "CS2023".into(),
            date_of_birth: "2004-02-29".into(),
            password: "Campus#2025".into(),
            confirmpassword: "Campus#2025".into(),
        }
    }

    fn error(request: &RegisterStudentRequest) -> String {
        validate_registration(request, today()).unwrap_err().to_string()
    }

    #[test]
    fn accepts_a_complete_registration() {
        assert_eq!(
            validate_registration(&request(), today()).unwrap(),
            NaiveDate::from_ymd_opt(2004, 2, 29).unwrap()
        );
    }

    #[test]
    fn over_long_fields_are_rejected() {
        let mut req = request();
        req.name = "A".repeat(101);
        assert_eq!(error(&req), "Name must be at most 100 characters.");

        let mut req = request();
        req.roll_nu = "1".repeat(51);
        assert_eq!(error(&req), "Roll number must be at most 50 characters.");

        let mut req = request();
        req.branch = "B".repeat(101);
        assert_eq!(error(&req), "Branch must be at most 100 characters.");

        let mut req = request();
        req.batch = "C".repeat(51);
        assert_eq!(error(&req), "Batch must be at most 50 characters.");

        let mut req = request();
        req.name = "A".repeat(100);
        assert!(validate_registration(&req, today()).is_ok());
    }

    #[test]
    fn missing_field_is_reported_first() {
        let mut req = request();
        req.batch = " ".into();
        req.name = "R2D2".into();
        assert!(error(&req).starts_with("All fields are required"));
    }

    #[test]
    fn reports_format_errors_in_field_order() {
        let mut req = request();
        req.roll_nu = "17A".into();
        req.enrollment_nu = "123".into();
        assert_eq!(error(&req), "Roll number must contain only digits");

        let mut req = request();
        req.enrollment_nu = "1234567890123".into();
        assert_eq!(error(&req), "Enrollment number must be exactly 14 digits");

        let mut req = request();
        req.date_of_birth = "2030-01-01".into();
        assert_eq!(error(&req), "Date of birth cannot be in the future");
    }

    #[test]
    fn password_must_be_strong_and_confirmed() {
        let mut req = request();
        req.password = "campus#2025".into();
        req.confirmpassword = "campus#2025".into();
        assert_eq!(
            error(&req),
            "Password must contain at least one uppercase letter"
        );

        let mut req = request();
        req.confirmpassword = "Campus#2026".into();
        assert_eq!(error(&req), "Password and confirm password do not match");
    }
}
