//! Admin console route definitions

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::admin;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/loans", get(admin::list_all_loans))
        .route("/api/admin/loans/:id", put(admin::update_loan_status))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:id", put(admin::update_user_role))
}
