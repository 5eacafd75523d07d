//! Student attendance record handlers.
//!
//! - GET/POST /api/student-attendance - Raw records
//! - POST /api/class-attendance - Mark a whole class for one day
//! - GET /api/class-attendance/history?batch=...&date=...
//! - GET /api/students/attendance/history?enrollment_nu=...
//! - GET /api/students/attendance/stats[?enrollment_nu=...]
//! - GET /api/attendance-chart/{enrollment_nu} - SVG chart

use crate::{
    db::DbPool,
    error::AppError,
    models::attendance::{
        AttendanceStatsResponse, ClassAttendanceRequest, ClassAttendanceResponse,
        ClassHistoryQuery, ClassHistoryResponse, CreateStudentAttendanceRequest, EnrollmentQuery,
        StatsQuery, StudentAttendance, StudentHistoryResponse,
    },
    services::{attendance_service, chart_service},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;

pub async fn list_student_attendance(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<StudentAttendance>>, AppError> {
    Ok(Json(attendance_service::list_student_attendance(&pool).await?))
}

pub async fn create_student_attendance(
    State(pool): State<DbPool>,
    Json(request): Json<CreateStudentAttendanceRequest>,
) -> Result<(StatusCode, Json<StudentAttendance>), AppError> {
    let record = attendance_service::create_student_attendance(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Replace one day's attendance for a class.
///
/// # Request Body
///
/// ```json
/// {
///   "faculty_name": "Ravi Sharma",
///   "date": "2025-07-14",
///   "attendance_data": [
///     { "enrollment_no": "12345678901234", "batch": "CS2023", "present": 1 }
///   ]
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: created records ordered by roll number
/// - **Error (400)**: empty `attendance_data`, bad date or bad `present` flag
pub async fn mark_class_attendance(
    State(pool): State<DbPool>,
    Json(request): Json<ClassAttendanceRequest>,
) -> Result<(StatusCode, Json<ClassAttendanceResponse>), AppError> {
    let today = Utc::now().date_naive();
    let response = attendance_service::mark_class_attendance(&pool, request, today).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn class_history(
    State(pool): State<DbPool>,
    Query(query): Query<ClassHistoryQuery>,
) -> Result<Json<ClassHistoryResponse>, AppError> {
    Ok(Json(
        attendance_service::class_history(&pool, &query.batch, &query.date).await?,
    ))
}

pub async fn student_history(
    State(pool): State<DbPool>,
    Query(query): Query<EnrollmentQuery>,
) -> Result<Json<StudentHistoryResponse>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(
        attendance_service::student_history(&pool, &query.enrollment_nu, today).await?,
    ))
}

/// Totals for one student when `enrollment_nu` is given, otherwise for
/// every registered student.
pub async fn stats(
    State(pool): State<DbPool>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<AttendanceStatsResponse>, AppError> {
    Ok(Json(
        attendance_service::stats(&pool, query.enrollment_nu.as_deref()).await?,
    ))
}

/// Cumulative presents over time as `image/svg+xml`. 404 without records.
pub async fn attendance_chart(
    State(pool): State<DbPool>,
    Path(enrollment_nu): Path<String>,
) -> Result<Response, AppError> {
    let points = attendance_service::chart_points(&pool, &enrollment_nu).await?;
    let svg = chart_service::attendance_chart_svg(&points)?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
