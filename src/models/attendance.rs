//! Attendance records, statistics and the payloads of the attendance endpoints.
//!
//! `present` is stored as an integer: 1 for present, 0 for absent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display label for a `present` flag.
pub fn status_label(present: i32) -> &'static str {
    if present == 1 { "Present" } else { "Absent" }
}

/// Generic `{ "message": ... }` body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Represents a row of the `student_attendance` table.
///
/// Student details are copied into each record, so history survives edits
/// to (or removal of) the student.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StudentAttendance {
    pub id: Uuid,
    pub name: String,
    pub enrollment_no: String,
    pub batch: String,
    pub branch: String,
    pub roll_no: String,
    pub present: i32,
    pub date: NaiveDate,
    pub faculty_name: Option<String>,
}

/// `POST /api/student-attendance`: one raw record.
#[derive(Debug, Deserialize)]
pub struct CreateStudentAttendanceRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enrollment_no: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub roll_no: String,
    #[serde(default)]
    pub present: i32,
    #[serde(default)]
    pub date: String,
    pub faculty_name: Option<String>,
}

/// One student's mark inside a class attendance submission.
///
/// Only `enrollment_no` and `present` matter for registered students; the
/// remaining fields fill the record when the enrollment is unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassAttendanceEntry {
    #[serde(default)]
    pub enrollment_no: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub roll_no: String,
    #[serde(default)]
    pub present: i32,
}

/// `POST /api/class-attendance`.
///
/// ```json
/// {
///   "faculty_name": "R Sharma",
///   "date": "2025-07-14",
///   "attendance_data": [
///     { "enrollment_no": "12345678901234", "batch": "CS2023", "present": 1 },
///     { "enrollment_no": "12345678901235", "batch": "CS2023", "present": 0 }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct ClassAttendanceRequest {
    #[serde(default)]
    pub attendance_data: Vec<ClassAttendanceEntry>,
    #[serde(default)]
    pub faculty_name: String,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassAttendanceResponse {
    pub message: String,
    pub total_students: usize,
    pub attendance_records: Vec<StudentAttendance>,
}

#[derive(Debug, Deserialize)]
pub struct ClassHistoryQuery {
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct ClassHistoryRecord {
    pub id: Uuid,
    pub student_name: String,
    pub roll_no: String,
    pub enrollment_no: String,
    pub batch: String,
    pub branch: String,
    pub present: i32,
    pub date: NaiveDate,
    pub faculty_name: Option<String>,
    pub status: &'static str,
}

impl From<StudentAttendance> for ClassHistoryRecord {
    fn from(record: StudentAttendance) -> Self {
        Self {
            status: status_label(record.present),
            id: record.id,
            student_name: record.name,
            roll_no: record.roll_no,
            enrollment_no: record.enrollment_no,
            batch: record.batch,
            branch: record.branch,
            present: record.present,
            date: record.date,
            faculty_name: record.faculty_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassHistoryResponse {
    pub batch: String,
    pub total_records: usize,
    pub attendance_history: Vec<ClassHistoryRecord>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentQuery {
    #[serde(default)]
    pub enrollment_nu: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentHistoryRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub present: i32,
    pub status: &'static str,
}

impl From<&StudentAttendance> for StudentHistoryRecord {
    fn from(record: &StudentAttendance) -> Self {
        Self {
            id: record.id,
            date: record.date,
            present: record.present,
            status: status_label(record.present),
        }
    }
}

/// Today's record, or a message saying there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TodayAttendance {
    Recorded(StudentHistoryRecord),
    Missing { message: String },
}

#[derive(Debug, Serialize)]
pub struct StudentHistoryResponse {
    pub today_attendance: TodayAttendance,
    pub attendance_history: Vec<StudentHistoryRecord>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub enrollment_nu: Option<String>,
}

/// Totals for a single enrollment number.
#[derive(Debug, Serialize)]
pub struct StudentStats {
    pub enrollment_nu: String,
    pub total_records: i64,
    pub present_count: i64,
    pub absent_count: i64,
    pub attendance_percentage: f64,
}

/// Per-student counters as aggregated by the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StudentStatsRow {
    pub student_id: Uuid,
    pub name: String,
    pub roll_nu: String,
    pub enrollment_nu: String,
    pub batch: String,
    pub branch: String,
    pub total_lectures: i64,
    pub present_lectures: i64,
    pub absent_lectures: i64,
}

#[derive(Debug, Serialize)]
pub struct StudentStatsEntry {
    pub student_id: Uuid,
    pub name: String,
    pub roll_nu: String,
    pub enrollment_nu: String,
    pub batch: String,
    pub branch: String,
    pub total_lectures: i64,
    pub present_lectures: i64,
    pub absent_lectures: i64,
    pub attendance_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct AllStudentStats {
    pub students_stats: Vec<StudentStatsEntry>,
    pub total_students: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AttendanceStatsResponse {
    Student(StudentStats),
    All(AllStudentStats),
}

/// Represents a row of the `faculty_attendance` table. One row per (email, date).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FacultyAttendance {
    pub id: Uuid,
    pub faculty_name: String,
    pub email: String,
    pub phone_no: String,
    pub present: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct MarkFacultyAttendanceRequest {
    #[serde(default)]
    pub faculty_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_no: String,
    #[serde(default)]
    pub present: i32,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkFacultyAttendanceResponse {
    pub message: String,
    pub faculty_name: String,
    pub email: String,
    pub present: i32,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct FacultyHistoryQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct FacultyHistoryRecord {
    pub id: Uuid,
    pub faculty_name: String,
    pub email: String,
    pub phone_no: String,
    pub present: i32,
    pub date: NaiveDate,
    pub status: &'static str,
}

impl From<FacultyAttendance> for FacultyHistoryRecord {
    fn from(record: FacultyAttendance) -> Self {
        Self {
            status: status_label(record.present),
            id: record.id,
            faculty_name: record.faculty_name,
            email: record.email,
            phone_no: record.phone_no,
            present: record.present,
            date: record.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FacultyHistoryResponse {
    pub faculty_email: String,
    pub total_records: usize,
    pub attendance_history: Vec<FacultyHistoryRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AbsentTodayQuery {
    pub branch: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AbsentStudent {
    pub name: String,
    pub enrollment_nu: String,
    pub roll_nu: String,
    pub batch: String,
}

#[derive(Debug, Serialize)]
pub struct AbsentTodayResponse {
    pub date: NaiveDate,
    pub absent_students: Vec<AbsentStudent>,
}

/// Plain username/password account of the attendance portal.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PortalSignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
