//! Loan HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::AuthenticatedUser;
use crate::error::ApiError;
use crate::loan::{CreateLoanRequest, Loan};
use crate::loan_service::LoanError;
use crate::state::AppState;

pub(crate) fn map_loan_error(e: LoanError) -> ApiError {
    match e {
        LoanError::NotFound => ApiError::NotFound(e.to_string()),
        LoanError::InvalidTransition { .. } => ApiError::Conflict(e.to_string()),
        LoanError::DueDateOverflow => ApiError::InternalError(e.to_string()),
        LoanError::DatabaseError(msg) => ApiError::DatabaseError(msg),
    }
}

/// POST /api/loans - Submit a loan application
pub async fn create_loan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateLoanRequest>,
) -> Result<Json<Loan>, ApiError> {
    req.validate()?;

    let loan = state
        .loan_service
        .apply(user.user_id, req)
        .await
        .map_err(map_loan_error)?;

    Ok(Json(loan))
}

/// GET /api/loans - List the caller's loans
pub async fn list_loans(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Loan>>, ApiError> {
    let loans = state
        .loan_service
        .list_for_user(user.user_id)
        .await
        .map_err(map_loan_error)?;

    Ok(Json(loans))
}

/// GET /api/loans/:id - Get one of the caller's loans
pub async fn get_loan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<Loan>, ApiError> {
    let loan = state
        .loan_service
        .get_for_user(user.user_id, loan_id)
        .await
        .map_err(map_loan_error)?
        .ok_or_else(|| ApiError::NotFound("Loan not found".to_string()))?;

    Ok(Json(loan))
}
