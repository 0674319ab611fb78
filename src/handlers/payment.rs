//! Payment HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::AuthenticatedUser;
use crate::error::ApiError;
use crate::payment::{Payment, ProcessPaymentRequest, ProcessPaymentResponse};
use crate::payment_service::PaymentError;
use crate::state::AppState;

fn map_payment_error(e: PaymentError) -> ApiError {
    match e {
        PaymentError::PaymentNotFound | PaymentError::LoanNotFound | PaymentError::UserNotFound => {
            ApiError::NotFound(e.to_string())
        }
        PaymentError::AlreadyPaid => ApiError::Conflict(e.to_string()),
        PaymentError::DatabaseError(msg) => ApiError::DatabaseError(msg),
    }
}

/// GET /api/payments/:id - List installments for a loan owned by the caller
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let payments = state
        .payment_service
        .list_for_loan(user.user_id, loan_id)
        .await
        .map_err(map_payment_error)?
        .ok_or_else(|| ApiError::NotFound("Loan not found".to_string()))?;

    Ok(Json(payments))
}

/// POST /api/payments/:id/pay - Process a payment on one installment
///
/// Any authenticated user may pay any installment; side effects (late
/// fee, credit score, loan close) always land on the loan's owner. This
/// intentionally permits third-party repayment, unlike the listing
/// endpoint, which is owner-scoped.
pub async fn process_payment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(payment_id): Path<Uuid>,
    body: Option<Json<ProcessPaymentRequest>>,
) -> Result<Json<ProcessPaymentResponse>, ApiError> {
    let method = body.and_then(|Json(req)| req.payment_method);

    let outcome = state
        .payment_service
        .process(payment_id, method)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(outcome))
}
