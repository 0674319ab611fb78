//! Payment route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::payment;
use crate::state::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        // :id is a loan id here, an installment id below
        .route("/api/payments/:id", get(payment::list_payments))
        .route("/api/payments/:id/pay", post(payment::process_payment))
}
