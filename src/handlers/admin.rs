//! Admin console HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::AdminUser;
use crate::error::ApiError;
use crate::loan::{Loan, LoanWithApplicant, UpdateLoanStatusRequest};
use crate::models::{UpdateUserRoleRequest, UserResponse};
use crate::state::AppState;

/// GET /api/admin/loans - List all loans with applicant details
pub async fn list_all_loans(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<LoanWithApplicant>>, ApiError> {
    let loans = state
        .loan_service
        .list_all_with_applicants()
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(loans))
}

/// PUT /api/admin/loans/:id - Approve/reject a loan
///
/// Approving generates the full repayment schedule as part of the same
/// operation. A backward status move (e.g. reopening a closed loan) is
/// rejected with a conflict.
pub async fn update_loan_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(loan_id): Path<Uuid>,
    Json(req): Json<UpdateLoanStatusRequest>,
) -> Result<Json<Loan>, ApiError> {
    let loan = state
        .loan_service
        .update_status(loan_id, req.status)
        .await
        .map_err(super::loan::map_loan_error)?;

    Ok(Json(loan))
}

/// GET /api/admin/users - List all users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .auth_service
        .list_users()
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// PUT /api/admin/users/:id - Change a user's role
pub async fn update_user_role(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .auth_service
        .update_user_role(user_id, req.role)
        .await
        .map_err(|e| match e {
            crate::auth::AuthError::UserNotFound => ApiError::NotFound(e.to_string()),
            _ => ApiError::InternalError(e.to_string()),
        })?;

    Ok(Json(user.into()))
}
