//! Registered students and the payloads of the student endpoints.
//!
//! Request fields default to empty strings so that a missing field is
//! reported with the same "required" message as a blank one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a row of the `students` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub roll_nu: String,

    /// 14-digit university enrollment number, unique per student
    pub enrollment_nu: String,

    pub branch: String,
    pub batch: String,
    pub date_of_birth: NaiveDate,

    /// `None` for students imported without credentials; they cannot log in
    pub password_hash: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentResponse {
    pub id: Uuid,
    pub name: String,
    pub enrollment_nu: String,
    pub roll_nu: String,
    pub branch: String,
    pub batch: String,
    pub date_of_birth: NaiveDate,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            enrollment_nu: student.enrollment_nu,
            roll_nu: student.roll_nu,
            branch: student.branch,
            batch: student.batch,
            date_of_birth: student.date_of_birth,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterStudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll_nu: String,
    #[serde(default)]
    pub enrollment_nu: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmpassword: String,
}

#[derive(Debug, Deserialize)]
pub struct StudentLoginRequest {
    #[serde(default)]
    pub enrollment_nu: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StudentLoginResponse {
    pub message: String,
    pub student: StudentResponse,
}

#[derive(Debug, Deserialize)]
pub struct StudentForgotPasswordRequest {
    #[serde(default)]
    pub enrollment_nu: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// `PUT /api/students/update-profile/{enrollment_nu}`.
///
/// The password pair is optional; leaving both blank keeps the current one.
#[derive(Debug, Deserialize)]
pub struct UpdateStudentProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll_nu: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct StudentProfileUpdateResponse {
    pub success: bool,
    pub message: String,
    pub student: StudentResponse,
}

#[derive(Debug, Serialize)]
pub struct BatchListResponse {
    pub batches: Vec<String>,
    pub total_batches: usize,
}

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    #[serde(default)]
    pub batch: String,
}

#[derive(Debug, Serialize)]
pub struct StudentsByBatchResponse {
    pub batch: String,
    pub students: Vec<StudentResponse>,
    pub total_students: usize,
}
