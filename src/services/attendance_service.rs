//! Student and faculty attendance: marking, history and statistics.
//!
//! "Today" is always passed in by the caller (UTC date at request time) so
//! the date-dependent rules can be exercised without a clock.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        attendance::{
            AbsentStudent, AbsentTodayResponse, AllStudentStats, AttendanceStatsResponse,
            ClassAttendanceEntry, ClassAttendanceRequest, ClassAttendanceResponse,
            ClassHistoryRecord, ClassHistoryResponse, CreateStudentAttendanceRequest,
            FacultyAttendance, FacultyHistoryRecord, FacultyHistoryResponse,
            MarkFacultyAttendanceRequest, MarkFacultyAttendanceResponse, StudentAttendance,
            StudentHistoryRecord, StudentHistoryResponse, StudentStats, StudentStatsEntry,
            StudentStatsRow, TodayAttendance,
        },
        student::Student,
    },
    services::validation,
};

/// Present share of `total`, in percent, rounded to two decimals. Zero when
/// there are no records.
pub fn attendance_percentage(present: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let percentage = present as f64 / total as f64 * 100.0;
    (percentage * 100.0).round() / 100.0
}

/// Today's record among `records`, if any.
pub fn today_attendance(records: &[StudentAttendance], today: NaiveDate) -> TodayAttendance {
    records
        .iter()
        .find(|r| r.date == today)
        .map(|r| TodayAttendance::Recorded(StudentHistoryRecord::from(r)))
        .unwrap_or_else(|| TodayAttendance::Missing {
            message: "Today attendance not available".to_string(),
        })
}

/// Column values of one class attendance row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub name: String,
    pub enrollment_no: String,
    pub batch: String,
    pub branch: String,
    pub roll_no: String,
    pub present: i32,
}

/// Column widths of one attendance row, checked before anything is stored.
pub fn validate_record_lengths(
    name: &str,
    enrollment_no: &str,
    batch: &str,
    branch: &str,
    roll_no: &str,
) -> Result<(), AppError> {
    validation::validate_max_length(name, validation::MAX_NAME_CHARS, "Name")?;
    validation::validate_max_length(
        enrollment_no,
        validation::MAX_ENROLLMENT_CHARS,
        "Enrollment number",
    )?;
    validation::validate_max_length(batch, validation::MAX_BATCH_CHARS, "Batch")?;
    validation::validate_max_length(branch, validation::MAX_BRANCH_CHARS, "Branch")?;
    validation::validate_max_length(roll_no, validation::MAX_ROLL_CHARS, "Roll number")
}

fn validate_faculty_name(faculty_name: &str) -> Result<(), AppError> {
    validation::validate_max_length(faculty_name, validation::MAX_NAME_CHARS, "Faculty name")
}

/// Registered students supply their own details; unknown enrollments fall
/// back to what the entry carries.
pub fn resolve_class_entry(entry: &ClassAttendanceEntry, student: Option<&Student>) -> NewAttendance {
    match student {
        Some(s) => NewAttendance {
            name: s.name.clone(),
            enrollment_no: s.enrollment_nu.clone(),
            batch: s.batch.clone(),
            branch: s.branch.clone(),
            roll_no: s.roll_nu.clone(),
            present: entry.present,
        },
        None => NewAttendance {
            name: entry.student_name.clone(),
            enrollment_no: entry.enrollment_no.clone(),
            batch: entry.batch.clone(),
            branch: entry.branch.clone(),
            roll_no: entry.roll_no.clone(),
            present: entry.present,
        },
    }
}

fn stats_entry(row: StudentStatsRow) -> StudentStatsEntry {
    StudentStatsEntry {
        attendance_percentage: attendance_percentage(row.present_lectures, row.total_lectures),
        student_id: row.student_id,
        name: row.name,
        roll_nu: row.roll_nu,
        enrollment_nu: row.enrollment_nu,
        batch: row.batch,
        branch: row.branch,
        total_lectures: row.total_lectures,
        present_lectures: row.present_lectures,
        absent_lectures: row.absent_lectures,
    }
}

async fn insert_record(
    conn: &mut sqlx::PgConnection,
    record: &NewAttendance,
    date: NaiveDate,
    faculty_name: Option<&str>,
) -> Result<StudentAttendance, AppError> {
    let row = sqlx::query_as::<_, StudentAttendance>(
        r#"
        INSERT INTO student_attendance (name, enrollment_no, batch, branch, roll_no, present, date, faculty_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&record.name)
    .bind(&record.enrollment_no)
    .bind(&record.batch)
    .bind(&record.branch)
    .bind(&record.roll_no)
    .bind(record.present)
    .bind(date)
    .bind(faculty_name)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn list_student_attendance(pool: &DbPool) -> Result<Vec<StudentAttendance>, AppError> {
    let records = sqlx::query_as::<_, StudentAttendance>(
        "SELECT * FROM student_attendance ORDER BY date DESC, batch, roll_no",
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}

pub async fn create_student_attendance(
    pool: &DbPool,
    request: CreateStudentAttendanceRequest,
) -> Result<StudentAttendance, AppError> {
    let required = [
        &request.name,
        &request.enrollment_no,
        &request.batch,
        &request.branch,
        &request.roll_no,
        &request.date,
    ];
    if required.iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::invalid(
            "All fields are required: name, enrollment_no, batch, branch, roll_no, date",
        ));
    }
    validation::validate_present_flag(request.present)?;
    let date = validation::parse_date(&request.date)?;

    let record = NewAttendance {
        name: request.name.trim().to_string(),
        enrollment_no: request.enrollment_no.trim().to_string(),
        batch: request.batch.trim().to_string(),
        branch: request.branch.trim().to_string(),
        roll_no: request.roll_no.trim().to_string(),
        present: request.present,
    };
    let faculty_name = request
        .faculty_name
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());

    validate_record_lengths(
        &record.name,
        &record.enrollment_no,
        &record.batch,
        &record.branch,
        &record.roll_no,
    )?;
    if let Some(faculty_name) = faculty_name {
        validate_faculty_name(faculty_name)?;
    }

    let mut conn = pool.acquire().await?;
    insert_record(&mut conn, &record, date, faculty_name).await
}

/// Replace a class's attendance for one day.
///
/// Existing rows for the date and the batch of the first entry are deleted
/// and one row per entry is inserted, all in one database transaction.
/// The returned records are ordered by roll number.
pub async fn mark_class_attendance(
    pool: &DbPool,
    request: ClassAttendanceRequest,
    today: NaiveDate,
) -> Result<ClassAttendanceResponse, AppError> {
    let Some(first) = request.attendance_data.first() else {
        return Err(AppError::invalid("Attendance data is required."));
    };
    let date = validation::parse_date_or(request.date.as_deref(), today)?;
    for entry in &request.attendance_data {
        validation::validate_present_flag(entry.present)?;
        validate_record_lengths(
            &entry.student_name,
            &entry.enrollment_no,
            &entry.batch,
            &entry.branch,
            &entry.roll_no,
        )?;
    }

    let batch = first.batch.trim().to_string();
    let faculty_name = request.faculty_name.trim();
    validate_faculty_name(faculty_name)?;
    let faculty_name = (!faculty_name.is_empty()).then_some(faculty_name);

    let enrollments: Vec<String> = request
        .attendance_data
        .iter()
        .map(|e| e.enrollment_no.clone())
        .collect();

    let mut tx = pool.begin().await?;

    if !batch.is_empty() {
        sqlx::query("DELETE FROM student_attendance WHERE date = $1 AND batch = $2")
            .bind(date)
            .bind(&batch)
            .execute(&mut *tx)
            .await?;
    }

    let known: HashMap<String, Student> =
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE enrollment_nu = ANY($1)")
            .bind(&enrollments)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(|s| (s.enrollment_nu.clone(), s))
            .collect();

    let mut records = Vec::with_capacity(request.attendance_data.len());
    for entry in &request.attendance_data {
        let record = resolve_class_entry(entry, known.get(&entry.enrollment_no));
        records.push(insert_record(&mut tx, &record, date, faculty_name).await?);
    }

    tx.commit().await?;

    records.sort_by(|a, b| a.roll_no.cmp(&b.roll_no));

    tracing::info!(
        batch = %batch,
        date = %date,
        students = records.len(),
        "Class attendance marked"
    );

    Ok(ClassAttendanceResponse {
        message: format!("Class attendance marked successfully for {}!", date),
        total_students: records.len(),
        attendance_records: records,
    })
}

pub async fn class_history(
    pool: &DbPool,
    batch: &str,
    date: &str,
) -> Result<ClassHistoryResponse, AppError> {
    let batch = batch.trim();
    validation::require(batch, "Batch parameter is required.")?;
    let date = match date.trim() {
        "" => None,
        value => Some(validation::parse_date(value)?),
    };

    let records = sqlx::query_as::<_, StudentAttendance>(
        r#"
        SELECT * FROM student_attendance
        WHERE batch = $1 AND ($2::date IS NULL OR date = $2)
        ORDER BY date DESC, roll_no
        "#,
    )
    .bind(batch)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(ClassHistoryResponse {
        batch: batch.to_string(),
        total_records: records.len(),
        attendance_history: records.into_iter().map(ClassHistoryRecord::from).collect(),
    })
}

async fn records_for_student(
    pool: &DbPool,
    enrollment_nu: &str,
    newest_first: bool,
) -> Result<Vec<StudentAttendance>, AppError> {
    let sql = if newest_first {
        "SELECT * FROM student_attendance WHERE enrollment_no = $1 ORDER BY date DESC"
    } else {
        "SELECT * FROM student_attendance WHERE enrollment_no = $1 ORDER BY date"
    };

    let records = sqlx::query_as::<_, StudentAttendance>(sql)
        .bind(enrollment_nu)
        .fetch_all(pool)
        .await?;

    Ok(records)
}

pub async fn student_history(
    pool: &DbPool,
    enrollment_nu: &str,
    today: NaiveDate,
) -> Result<StudentHistoryResponse, AppError> {
    let enrollment_nu = enrollment_nu.trim();
    validation::require(enrollment_nu, "Enrollment number is required.")?;

    let records = records_for_student(pool, enrollment_nu, true).await?;

    Ok(StudentHistoryResponse {
        today_attendance: today_attendance(&records, today),
        attendance_history: records.iter().map(StudentHistoryRecord::from).collect(),
    })
}

/// `(date, present)` pairs for one student, oldest first.
pub async fn chart_points(
    pool: &DbPool,
    enrollment_nu: &str,
) -> Result<Vec<(NaiveDate, i32)>, AppError> {
    let records = records_for_student(pool, enrollment_nu.trim(), false).await?;
    Ok(records.into_iter().map(|r| (r.date, r.present)).collect())
}

/// Totals for one enrollment number, or for every registered student.
pub async fn stats(
    pool: &DbPool,
    enrollment_nu: Option<&str>,
) -> Result<AttendanceStatsResponse, AppError> {
    if let Some(enrollment_nu) = enrollment_nu.map(str::trim).filter(|e| !e.is_empty()) {
        let (total, present, absent) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE present = 1),
                   COUNT(*) FILTER (WHERE present = 0)
            FROM student_attendance
            WHERE enrollment_no = $1
            "#,
        )
        .bind(enrollment_nu)
        .fetch_one(pool)
        .await?;

        return Ok(AttendanceStatsResponse::Student(StudentStats {
            enrollment_nu: enrollment_nu.to_string(),
            total_records: total,
            present_count: present,
            absent_count: absent,
            attendance_percentage: attendance_percentage(present, total),
        }));
    }

    let rows = sqlx::query_as::<_, StudentStatsRow>(
        r#"
        SELECT s.id AS student_id,
               s.name,
               s.roll_nu,
               s.enrollment_nu,
               s.batch,
               s.branch,
               COUNT(a.id) AS total_lectures,
               COUNT(a.id) FILTER (WHERE a.present = 1) AS present_lectures,
               COUNT(a.id) FILTER (WHERE a.present = 0) AS absent_lectures
        FROM students s
        LEFT JOIN student_attendance a ON a.enrollment_no = s.enrollment_nu
        GROUP BY s.id
        ORDER BY s.created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    let students_stats: Vec<StudentStatsEntry> = rows.into_iter().map(stats_entry).collect();

    Ok(AttendanceStatsResponse::All(AllStudentStats {
        total_students: students_stats.len(),
        students_stats,
    }))
}

/// Record or overwrite a faculty member's attendance for one day.
pub async fn mark_faculty_attendance(
    pool: &DbPool,
    request: MarkFacultyAttendanceRequest,
    today: NaiveDate,
) -> Result<MarkFacultyAttendanceResponse, AppError> {
    let faculty_name = request.faculty_name.trim();
    let email = request.email.trim();
    let phone_no = request.phone_no.trim();
    if faculty_name.is_empty() || email.is_empty() || phone_no.is_empty() {
        return Err(AppError::invalid(
            "Faculty name, email, and phone number are required.",
        ));
    }
    validate_faculty_name(faculty_name)?;
    validation::validate_max_length(phone_no, validation::MAX_PHONE_CHARS, "Phone number")?;
    validation::validate_present_flag(request.present)?;
    let date = validation::parse_date_or(request.date.as_deref(), today)?;

    // xmax is zero only for a freshly inserted row
    let inserted: bool = sqlx::query_scalar(
        r#"
        INSERT INTO faculty_attendance (faculty_name, email, phone_no, present, date)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email, date) DO UPDATE SET present = EXCLUDED.present
        RETURNING (xmax = 0)
        "#,
    )
    .bind(faculty_name)
    .bind(email)
    .bind(phone_no)
    .bind(request.present)
    .bind(date)
    .fetch_one(pool)
    .await?;

    let message = if inserted {
        format!("Attendance marked successfully for {}!", date)
    } else {
        format!("Attendance updated successfully for {}!", date)
    };

    tracing::info!(email = %email, date = %date, inserted, "Faculty attendance saved");

    Ok(MarkFacultyAttendanceResponse {
        message,
        faculty_name: faculty_name.to_string(),
        email: email.to_string(),
        present: request.present,
        date: date.to_string(),
    })
}

pub async fn faculty_history(pool: &DbPool, email: &str) -> Result<FacultyHistoryResponse, AppError> {
    let email = email.trim();
    validation::require(email, "Email parameter is required.")?;

    let records = sqlx::query_as::<_, FacultyAttendance>(
        "SELECT * FROM faculty_attendance WHERE email = $1 ORDER BY date DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(FacultyHistoryResponse {
        faculty_email: email.to_string(),
        total_records: records.len(),
        attendance_history: records.into_iter().map(FacultyHistoryRecord::from).collect(),
    })
}

/// Registered students, optionally of one branch, with no present mark today.
pub async fn absent_today(
    pool: &DbPool,
    branch: Option<&str>,
    today: NaiveDate,
) -> Result<AbsentTodayResponse, AppError> {
    let branch = branch.map(str::trim).filter(|b| !b.is_empty());

    let absent_students = sqlx::query_as::<_, AbsentStudent>(
        r#"
        SELECT s.name, s.enrollment_nu, s.roll_nu, s.batch
        FROM students s
        WHERE ($1::text IS NULL OR s.branch = $1)
          AND NOT EXISTS (
              SELECT 1 FROM student_attendance a
              WHERE a.enrollment_no = s.enrollment_nu
                AND a.date = $2
                AND a.present = 1
          )
        ORDER BY s.batch, s.roll_nu
        "#,
    )
    .bind(branch)
    .bind(today)
    .fetch_all(pool)
    .await?;

    Ok(AbsentTodayResponse {
        date: today,
        absent_students,
    })
}
