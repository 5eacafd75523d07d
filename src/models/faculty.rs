//! Faculty members and the payloads of the faculty endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Faculty {
    pub id: Uuid,
    pub name: String,

    /// Login identifier, unique
    pub email: String,

    pub phone: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacultyResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<Faculty> for FacultyResponse {
    fn from(faculty: Faculty) -> Self {
        Self {
            id: faculty.id,
            name: faculty.name,
            email: faculty.email,
            phone: faculty.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FacultySignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmpassword: String,
}

#[derive(Debug, Serialize)]
pub struct FacultySignupResponse {
    pub message: String,
    pub faculty_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct FacultyLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct FacultyLoginResponse {
    pub message: String,
    pub faculty: FacultyResponse,
}

#[derive(Debug, Deserialize)]
pub struct FacultyForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmpassword: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFacultyProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct FacultyProfileUpdateResponse {
    pub success: bool,
    pub message: String,
    pub faculty: FacultyResponse,
}
