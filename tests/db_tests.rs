//! Service tests against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL`
//! and applies `./migrations` before the test body runs.

use campus_ledger::{
    error::AppError,
    models::{
        attendance::{
            AttendanceStatsResponse, ClassAttendanceEntry, ClassAttendanceRequest,
            MarkFacultyAttendanceRequest,
        },
        faculty::{FacultySignupRequest, UpdateFacultyProfileRequest},
        profile::Currency,
        transaction::{TransactionRequest, TransactionType},
        user::RegisterRequest,
    },
    services::{
        attendance_service, auth_service, category_service, faculty_service,
        transaction_service,
    },
};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

type TestResult<T = ()> = anyhow::Result<T>;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

async fn seed_user(pool: &PgPool, username: &str) -> TestResult<Uuid> {
    let id = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_account(pool: &PgPool, user_id: Uuid, name: &str, balance: i64) -> TestResult<Uuid> {
    let id = sqlx::query_scalar(
        r#"
        INSERT INTO accounts (user_id, account_type, account_name, balance_cents)
        VALUES ($1, 'bank', $2, $3)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(balance)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn balance(pool: &PgPool, account_id: Uuid) -> TestResult<i64> {
    let cents = sqlx::query_scalar("SELECT balance_cents FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await?;
    Ok(cents)
}

async fn food_category(pool: &PgPool) -> TestResult<Uuid> {
    category_service::ensure_default_categories(pool).await?;
    let id = sqlx::query_scalar("SELECT id FROM expense_categories WHERE name = 'food'")
        .fetch_one(pool)
        .await?;
    Ok(id)
}

fn expense(account_id: Uuid, amount_cents: i64, category: Option<Uuid>) -> TransactionRequest {
    TransactionRequest {
        transaction_type: TransactionType::Expense,
        account_id,
        amount_cents,
        description: "Canteen".to_string(),
        transaction_date: day(14),
        expense_category_id: category,
        income_category_id: None,
        to_account_id: None,
    }
}

fn transfer(from: Uuid, to: Uuid, amount_cents: i64) -> TransactionRequest {
    TransactionRequest {
        transaction_type: TransactionType::Transfer,
        to_account_id: Some(to),
        expense_category_id: None,
        ..expense(from, amount_cents, None)
    }
}

async fn seed_student(
    pool: &PgPool,
    name: &str,
    enrollment_nu: &str,
    roll_nu: &str,
    branch: &str,
    batch: &str,
) -> TestResult {
    sqlx::query(
        r#"
        INSERT INTO students (name, roll_nu, enrollment_nu, branch, batch, date_of_birth)
        VALUES ($1, $2, $3, $4, $5, '2004-05-01')
        "#,
    )
    .bind(name)
    .bind(roll_nu)
    .bind(enrollment_nu)
    .bind(branch)
    .bind(batch)
    .execute(pool)
    .await?;
    Ok(())
}

fn class_entry(enrollment_no: &str, roll_no: &str, present: i32) -> ClassAttendanceEntry {
    ClassAttendanceEntry {
        enrollment_no: enrollment_no.to_string(),
        student_name: format!("Student {roll_no}"),
        batch: "CS2023".to_string(),
        branch: "CSE".to_string(),
        roll_no: roll_no.to_string(),
        present,
    }
}

fn class_request(entries: Vec<ClassAttendanceEntry>) -> ClassAttendanceRequest {
    ClassAttendanceRequest {
        attendance_data: entries,
        faculty_name: "Ravi Sharma".to_string(),
        date: Some("2025-07-14".to_string()),
    }
}

async fn attendance_rows(pool: &PgPool, batch: &str, date: NaiveDate) -> TestResult<i64> {
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM student_attendance WHERE batch = $1 AND date = $2",
    )
    .bind(batch)
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

#[sqlx::test(migrations = "./migrations")]
async fn expense_moves_balance_and_edit_delete_restore_it(pool: PgPool) -> TestResult {
    let user = seed_user(&pool, "asha").await?;
    let wallet = seed_account(&pool, user, "Wallet", 10_000).await?;
    let food = food_category(&pool).await?;

    let added =
        transaction_service::add_transaction(&pool, user, expense(wallet, 1_250, Some(food)))
            .await?;
    assert_eq!(balance(&pool, wallet).await?, 8_750);

    transaction_service::edit_transaction(&pool, user, added.id, expense(wallet, 3_000, Some(food)))
        .await?;
    assert_eq!(balance(&pool, wallet).await?, 7_000);

    transaction_service::delete_transaction(&pool, user, added.id).await?;
    assert_eq!(balance(&pool, wallet).await?, 10_000);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await?;
    assert_eq!(remaining, 0);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn transfer_edit_moves_funds_between_accounts(pool: PgPool) -> TestResult {
    let user = seed_user(&pool, "asha").await?;
    let bank = seed_account(&pool, user, "Bank", 50_000).await?;
    let savings = seed_account(&pool, user, "Savings", 0).await?;

    let moved = transaction_service::add_transaction(&pool, user, transfer(bank, savings, 20_000))
        .await?;
    assert_eq!(balance(&pool, bank).await?, 30_000);
    assert_eq!(balance(&pool, savings).await?, 20_000);

    // Reversing the direction undoes the old transfer before applying the new one
    transaction_service::edit_transaction(&pool, user, moved.id, transfer(savings, bank, 5_000))
        .await?;
    assert_eq!(balance(&pool, bank).await?, 55_000);
    assert_eq!(balance(&pool, savings).await?, -5_000);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn transfer_needs_two_accounts(pool: PgPool) -> TestResult {
    let user = seed_user(&pool, "asha").await?;
    let wallet = seed_account(&pool, user, "Wallet", 10_000).await?;

    let err = transaction_service::add_transaction(&pool, user, transfer(wallet, Uuid::new_v4(), 500))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidRequest(_)));
    assert!(err.to_string().starts_with("You need at least two accounts"));
    assert_eq!(balance(&pool, wallet).await?, 10_000);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn foreign_account_is_not_found(pool: PgPool) -> TestResult {
    let asha = seed_user(&pool, "asha").await?;
    let ravi = seed_user(&pool, "ravi").await?;
    let ravis_wallet = seed_account(&pool, ravi, "Wallet", 10_000).await?;

    let err = transaction_service::add_transaction(&pool, asha, expense(ravis_wallet, 500, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref m) if m == "Account not found"));
    assert_eq!(balance(&pool, ravis_wallet).await?, 10_000);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn balance_overflow_is_a_bad_request(pool: PgPool) -> TestResult {
    let user = seed_user(&pool, "asha").await?;
    let bank = seed_account(&pool, user, "Bank", i64::MIN + 1).await?;

    let err = transaction_service::add_transaction(&pool, user, expense(bank, 5_000, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidRequest(ref m) if m == "Account balance is out of range."));
    assert_eq!(balance(&pool, bank).await?, i64::MIN + 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn default_categories_are_created_once(pool: PgPool) -> TestResult {
    assert_eq!(category_service::ensure_default_categories(&pool).await?, (8, 4));
    assert_eq!(category_service::ensure_default_categories(&pool).await?, (0, 0));

    let expense_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expense_categories")
        .fetch_one(&pool)
        .await?;
    assert_eq!(expense_count, 8);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_is_rejected(pool: PgPool) -> TestResult {
    let request = || RegisterRequest {
        username: "asha".to_string(),
        email: "asha@example.com".to_string(),
        phone: None,
        address: None,
        password1: "ledger-pass-42".to_string(),
        password2: "ledger-pass-42".to_string(),
    };
    let ttl = chrono::Duration::hours(1);

    auth_service::register(&pool, request(), Currency::Inr, ttl).await?;
    let err = auth_service::register(&pool, request(), Currency::Inr, ttl)
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppError::InvalidRequest(ref m) if m == "A user with that username already exists.")
    );
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await?;
    assert_eq!(users, 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn faculty_cannot_take_another_members_email(pool: PgPool) -> TestResult {
    for (name, email, phone) in [
        ("Ravi Sharma", "ravi@college.edu", "9876543210"),
        ("Meera Iyer", "meera@college.edu", "9876543211"),
    ] {
        faculty_service::signup(
            &pool,
            FacultySignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                password: "Lecture@42".to_string(),
                confirmpassword: "Lecture@42".to_string(),
            },
        )
        .await?;
    }

    let err = faculty_service::update_profile(
        &pool,
        "meera@college.edu",
        UpdateFacultyProfileRequest {
            name: "Meera Iyer".to_string(),
            email: "ravi@college.edu".to_string(),
            phone: "9876543211".to_string(),
            new_password: String::new(),
            confirm_password: String::new(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::InvalidRequest(ref m) if m.contains("already in use")));
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn class_attendance_replaces_the_days_batch(pool: PgPool) -> TestResult {
    seed_student(&pool, "Asha Rao", "12345678901234", "CS01", "CSE", "CS2023").await?;

    let first = attendance_service::mark_class_attendance(
        &pool,
        class_request(vec![
            class_entry("12345678901235", "CS02", 0),
            class_entry("12345678901234", "CS01", 1),
        ]),
        day(20),
    )
    .await?;
    assert_eq!(first.total_students, 2);
    assert_eq!(first.attendance_records[0].roll_no, "CS01");
    // Registered students keep their own name
    assert_eq!(first.attendance_records[0].name, "Asha Rao");
    assert_eq!(attendance_rows(&pool, "CS2023", day(14)).await?, 2);

    let second = attendance_service::mark_class_attendance(
        &pool,
        class_request(vec![class_entry("12345678901234", "CS01", 0)]),
        day(20),
    )
    .await?;
    assert_eq!(second.message, "Class attendance marked successfully for 2025-07-14!");
    assert_eq!(attendance_rows(&pool, "CS2023", day(14)).await?, 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn class_attendance_leaves_other_batches_alone(pool: PgPool) -> TestResult {
    let mut other = class_entry("99999999999999", "EC01", 1);
    other.batch = "EC2023".to_string();
    attendance_service::mark_class_attendance(&pool, class_request(vec![other]), day(20)).await?;

    attendance_service::mark_class_attendance(
        &pool,
        class_request(vec![class_entry("12345678901234", "CS01", 1)]),
        day(20),
    )
    .await?;

    assert_eq!(attendance_rows(&pool, "EC2023", day(14)).await?, 1);
    assert_eq!(attendance_rows(&pool, "CS2023", day(14)).await?, 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn faculty_attendance_is_marked_then_updated(pool: PgPool) -> TestResult {
    let request = |present| MarkFacultyAttendanceRequest {
        faculty_name: "Ravi Sharma".to_string(),
        email: "ravi@college.edu".to_string(),
        phone_no: "9876543210".to_string(),
        present,
        date: None,
    };

    let marked = attendance_service::mark_faculty_attendance(&pool, request(1), day(14)).await?;
    assert_eq!(marked.message, "Attendance marked successfully for 2025-07-14!");

    let updated = attendance_service::mark_faculty_attendance(&pool, request(0), day(14)).await?;
    assert_eq!(updated.message, "Attendance updated successfully for 2025-07-14!");

    let rows: Vec<i32> = sqlx::query_scalar("SELECT present FROM faculty_attendance")
        .fetch_all(&pool)
        .await?;
    assert_eq!(rows, vec![0]);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn absent_today_lists_students_without_a_present_mark(pool: PgPool) -> TestResult {
    seed_student(&pool, "Asha Rao", "12345678901231", "CS01", "CSE", "CS2023").await?;
    seed_student(&pool, "Bala Nair", "12345678901232", "CS02", "CSE", "CS2023").await?;
    seed_student(&pool, "Chitra Das", "12345678901233", "CS03", "CSE", "CS2023").await?;
    seed_student(&pool, "Dev Patel", "12345678901234", "EC01", "ECE", "EC2023").await?;

    let mut yesterday = class_request(vec![class_entry("12345678901233", "CS03", 1)]);
    yesterday.date = Some("2025-07-13".to_string());
    attendance_service::mark_class_attendance(&pool, yesterday, day(14)).await?;
    attendance_service::mark_class_attendance(
        &pool,
        class_request(vec![
            class_entry("12345678901231", "CS01", 1),
            class_entry("12345678901232", "CS02", 0),
        ]),
        day(14),
    )
    .await?;

    let cse = attendance_service::absent_today(&pool, Some("CSE"), day(14)).await?;
    let absent: Vec<&str> = cse
        .absent_students
        .iter()
        .map(|s| s.enrollment_nu.as_str())
        .collect();
    assert_eq!(cse.date, day(14));
    assert_eq!(absent, vec!["12345678901232", "12345678901233"]);

    let everyone = attendance_service::absent_today(&pool, None, day(14)).await?;
    assert_eq!(everyone.absent_students.len(), 3);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_cover_every_registered_student(pool: PgPool) -> TestResult {
    seed_student(&pool, "Asha Rao", "12345678901231", "CS01", "CSE", "CS2023").await?;
    seed_student(&pool, "Bala Nair", "12345678901232", "CS02", "CSE", "CS2023").await?;

    for (date, present) in [("2025-07-10", 1), ("2025-07-11", 1), ("2025-07-12", 0), ("2025-07-13", 1)] {
        let mut request = class_request(vec![class_entry("12345678901231", "CS01", present)]);
        request.date = Some(date.to_string());
        attendance_service::mark_class_attendance(&pool, request, day(14)).await?;
    }

    let AttendanceStatsResponse::All(all) = attendance_service::stats(&pool, None).await? else {
        panic!("expected stats for all students");
    };
    assert_eq!(all.total_students, 2);

    let asha = all
        .students_stats
        .iter()
        .find(|s| s.enrollment_nu == "12345678901231")
        .unwrap();
    assert_eq!((asha.total_lectures, asha.present_lectures, asha.absent_lectures), (4, 3, 1));
    assert_eq!(asha.attendance_percentage, 75.0);

    let bala = all
        .students_stats
        .iter()
        .find(|s| s.enrollment_nu == "12345678901232")
        .unwrap();
    assert_eq!(bala.total_lectures, 0);
    assert_eq!(bala.attendance_percentage, 0.0);
    Ok(())
}
