//! Loan route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::loan;
use crate::state::AppState;

pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/loans", post(loan::create_loan))
        .route("/api/loans", get(loan::list_loans))
        .route("/api/loans/:id", get(loan::get_loan))
}
