//! Faculty HTTP handlers of the attendance register.
//!
//! - POST /api/faculty/signup
//! - POST /api/faculty/login
//! - POST /api/faculty/forgot-password
//! - PUT /api/faculty/update-profile/{email}
//! - POST /api/faculty/attendance - Mark own attendance for a day
//! - GET /api/faculty/attendance/history?email=...
//! - GET /api/faculty/absent-today?branch=...

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        attendance::{
            AbsentTodayQuery, AbsentTodayResponse, FacultyHistoryQuery, FacultyHistoryResponse,
            MarkFacultyAttendanceRequest, MarkFacultyAttendanceResponse, MessageResponse,
        },
        faculty::{
            FacultyForgotPasswordRequest, FacultyLoginRequest, FacultyLoginResponse,
            FacultyProfileUpdateResponse, FacultySignupRequest, FacultySignupResponse,
            UpdateFacultyProfileRequest,
        },
    },
    services::{attendance_service, faculty_service},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

/// Register a faculty member.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Ravi Sharma",
///   "email": "ravi.sharma@college.edu",
///   "phone": "9876543210",
///   "password": "Lecture@42",
///   "confirmpassword": "Lecture@42"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: id, name, email and phone
/// - **Error (400)**: first failing field rule, or email already registered
pub async fn signup(
    State(pool): State<DbPool>,
    Json(request): Json<FacultySignupRequest>,
) -> Result<(StatusCode, Json<FacultySignupResponse>), AppError> {
    let response = faculty_service::signup(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(pool): State<DbPool>,
    Json(request): Json<FacultyLoginRequest>,
) -> Result<Json<FacultyLoginResponse>, AppError> {
    Ok(Json(faculty_service::login(&pool, request).await?))
}

pub async fn forgot_password(
    State(pool): State<DbPool>,
    Json(request): Json<FacultyForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = faculty_service::forgot_password(&pool, request).await?;
    Ok(Json(MessageResponse::new(message)))
}

pub async fn update_profile(
    State(pool): State<DbPool>,
    Path(email): Path<String>,
    Json(request): Json<UpdateFacultyProfileRequest>,
) -> Result<Json<FacultyProfileUpdateResponse>, AppError> {
    let response = faculty_service::update_profile(&pool, &email, request).await?;
    Ok(Json(response))
}

/// Mark attendance for a day; marking the same day again overwrites it.
///
/// # Request Body
///
/// ```json
/// {
///   "faculty_name": "Ravi Sharma",
///   "email": "ravi.sharma@college.edu",
///   "phone_no": "9876543210",
///   "present": 1,
///   "date": "2025-07-14"
/// }
/// ```
///
/// `date` defaults to today (UTC).
pub async fn mark_attendance(
    State(pool): State<DbPool>,
    Json(request): Json<MarkFacultyAttendanceRequest>,
) -> Result<(StatusCode, Json<MarkFacultyAttendanceResponse>), AppError> {
    let today = Utc::now().date_naive();
    let response = attendance_service::mark_faculty_attendance(&pool, request, today).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn attendance_history(
    State(pool): State<DbPool>,
    Query(query): Query<FacultyHistoryQuery>,
) -> Result<Json<FacultyHistoryResponse>, AppError> {
    Ok(Json(
        attendance_service::faculty_history(&pool, &query.email).await?,
    ))
}

/// Students without a present mark today, optionally for one branch.
pub async fn absent_today(
    State(pool): State<DbPool>,
    Query(query): Query<AbsentTodayQuery>,
) -> Result<Json<AbsentTodayResponse>, AppError> {
    let today = Utc::now().date_naive();
    let response = attendance_service::absent_today(&pool, query.branch.as_deref(), today).await?;
    Ok(Json(response))
}
