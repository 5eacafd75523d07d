//! Student HTTP handlers of the attendance register.
//!
//! - GET/POST /api/students - List / register students
//! - POST /api/students/login
//! - POST /api/students/forgot-password
//! - PUT /api/students/update-profile/{enrollment_nu}
//! - GET /api/batches - Distinct batches
//! - GET /api/students/by-batch?batch=CS2023

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        attendance::MessageResponse,
        student::{
            BatchListResponse, BatchQuery, RegisterStudentRequest, StudentForgotPasswordRequest,
            StudentLoginRequest, StudentLoginResponse, StudentProfileUpdateResponse,
            StudentResponse, StudentsByBatchResponse, UpdateStudentProfileRequest,
        },
    },
    services::student_service,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

/// Register a student.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Asha Rao",
///   "roll_nu": "17",
///   "enrollment_nu": "12345678901234",
///   "branch": "Computer Science",
///   "batch": "CS2023",
///   "date_of_birth": "2004-02-29",
///   "password": "Campus#2025",
///   "confirmpassword": "Campus#2025"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the student, without credentials
/// - **Error (400)**: first failing field rule, or duplicate enrollment number
pub async fn register_student(
    State(pool): State<DbPool>,
    Json(request): Json<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let today = Utc::now().date_naive();
    let student = student_service::register_student(&pool, request, today).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn list_students(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    Ok(Json(student_service::list_students(&pool).await?))
}

/// Log in with enrollment number and password.
///
/// - **Error (400)**: missing fields or malformed enrollment number
/// - **Error (404)**: no student with this enrollment number
/// - **Error (401)**: no password set, or wrong password
pub async fn login(
    State(pool): State<DbPool>,
    Json(request): Json<StudentLoginRequest>,
) -> Result<Json<StudentLoginResponse>, AppError> {
    Ok(Json(student_service::login(&pool, request).await?))
}

pub async fn forgot_password(
    State(pool): State<DbPool>,
    Json(request): Json<StudentForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = student_service::forgot_password(&pool, request).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Update name, roll number and date of birth; optionally the password.
pub async fn update_profile(
    State(pool): State<DbPool>,
    Path(enrollment_nu): Path<String>,
    Json(request): Json<UpdateStudentProfileRequest>,
) -> Result<Json<StudentProfileUpdateResponse>, AppError> {
    let today = Utc::now().date_naive();
    let response = student_service::update_profile(&pool, &enrollment_nu, request, today).await?;
    Ok(Json(response))
}

pub async fn list_batches(State(pool): State<DbPool>) -> Result<Json<BatchListResponse>, AppError> {
    Ok(Json(student_service::list_batches(&pool).await?))
}

/// Students of one batch ordered by roll number. 400 without `batch`.
pub async fn students_by_batch(
    State(pool): State<DbPool>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<StudentsByBatchResponse>, AppError> {
    Ok(Json(
        student_service::students_by_batch(&pool, &query.batch).await?,
    ))
}
