//! Router construction and shared application state.

use axum::{
    Router,
    extract::FromRef,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{db::DbPool, handlers, middleware, models::profile::Currency};

/// State shared by every handler.
///
/// Handlers that only need the database extract `State<DbPool>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,

    /// Lifetime of a new ledger session
    pub session_ttl: chrono::Duration,

    /// Currency given to new user profiles
    pub default_currency: Currency,
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

/// Ledger endpoints behind the bearer session middleware.
fn ledger_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/dashboard", get(handlers::reports::dashboard))
        // Accounts
        .route(
            "/api/v1/accounts",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route(
            "/api/v1/accounts/{id}",
            get(handlers::accounts::get_account),
        )
        // Transactions
        .route(
            "/api/v1/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        // Categories
        .route(
            "/api/v1/categories",
            get(handlers::categories::list_categories),
        )
        .route(
            "/api/v1/categories/expense",
            post(handlers::categories::add_expense_category),
        )
        .route(
            "/api/v1/categories/income",
            post(handlers::categories::add_income_category),
        )
        // Expense records
        .route(
            "/api/v1/expenses",
            get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
        )
        .route(
            "/api/v1/expenses/{id}",
            put(handlers::expenses::update_expense).delete(handlers::expenses::delete_expense),
        )
        // Reports
        .route(
            "/api/v1/charts/expenses",
            get(handlers::reports::expense_chart),
        )
        .route(
            "/api/v1/export/transactions",
            get(handlers::reports::export_transactions),
        )
        .route(
            "/api/v1/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.pool.clone(),
            middleware::auth::auth_middleware,
        ))
}

/// Attendance register endpoints. These are public, like the front-end
/// they serve.
fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/api/signup", post(handlers::portal::signup))
        // Students
        .route(
            "/api/students",
            get(handlers::students::list_students).post(handlers::students::register_student),
        )
        .route("/api/students/login", post(handlers::students::login))
        .route(
            "/api/students/forgot-password",
            post(handlers::students::forgot_password),
        )
        .route(
            "/api/students/update-profile/{enrollment_nu}",
            put(handlers::students::update_profile),
        )
        .route("/api/batches", get(handlers::students::list_batches))
        .route(
            "/api/students/by-batch",
            get(handlers::students::students_by_batch),
        )
        // Faculty
        .route("/api/faculty/signup", post(handlers::faculty::signup))
        .route("/api/faculty/login", post(handlers::faculty::login))
        .route(
            "/api/faculty/forgot-password",
            post(handlers::faculty::forgot_password),
        )
        .route(
            "/api/faculty/update-profile/{email}",
            put(handlers::faculty::update_profile),
        )
        .route(
            "/api/faculty/attendance",
            post(handlers::faculty::mark_attendance),
        )
        .route(
            "/api/faculty/attendance/history",
            get(handlers::faculty::attendance_history),
        )
        .route(
            "/api/faculty/absent-today",
            get(handlers::faculty::absent_today),
        )
        // Attendance records
        .route(
            "/api/student-attendance",
            get(handlers::attendance::list_student_attendance)
                .post(handlers::attendance::create_student_attendance),
        )
        .route(
            "/api/class-attendance",
            post(handlers::attendance::mark_class_attendance),
        )
        .route(
            "/api/class-attendance/history",
            get(handlers::attendance::class_history),
        )
        .route(
            "/api/students/attendance/history",
            get(handlers::attendance::student_history),
        )
        .route(
            "/api/students/attendance/stats",
            get(handlers::attendance::stats),
        )
        .route(
            "/api/attendance-chart/{enrollment_nu}",
            get(handlers::attendance::attendance_chart),
        )
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .merge(ledger_routes(&state))
        .merge(attendance_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
