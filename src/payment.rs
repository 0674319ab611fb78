//! Installment (EMI) models for LendHub
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Installment status enum
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Upcoming,
    Overdue,
    Paid,
}

/// Installment model
///
/// Exactly `term_months` rows exist per approved loan, with contiguous
/// payment numbers from 1. Amount mutates only once, when a late fee is
/// applied at payment time. Rows are never deleted.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub loan_id: Uuid,
    /// Sequence number, 1..term
    pub payment_number: i32,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub paid_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for processing a payment
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    pub payment_method: Option<String>,
}

/// Response for a processed payment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentResponse {
    pub message: String,
    pub late_fee_applied: bool,
    pub late_fee: f64,
    pub final_amount_paid: f64,
    pub credit_score: i32,
    pub loan_status: crate::loan::LoanStatus,
    pub payment: Payment,
}

/// Late fee surcharge rate applied to overdue installments
pub const LATE_FEE_RATE: f64 = 0.02;

/// Credit score assigned on a user's first payment event
pub const INITIAL_CREDIT_SCORE: i32 = 600;

/// Score delta for an on-time payment
pub const ON_TIME_SCORE_DELTA: i32 = 10;

/// Score delta for paying an overdue installment
pub const OVERDUE_SCORE_DELTA: i32 = -20;

/// Late fee for an overdue installment of the given amount.
pub fn late_fee(amount: f64) -> f64 {
    amount * LATE_FEE_RATE
}

/// Credit score after a payment event. Unbounded: no floor or ceiling
/// is enforced.
pub fn adjusted_credit_score(current: Option<i32>, was_overdue: bool) -> i32 {
    let base = current.unwrap_or(INITIAL_CREDIT_SCORE);
    if was_overdue {
        base + OVERDUE_SCORE_DELTA
    } else {
        base + ON_TIME_SCORE_DELTA
    }
}

/// Sweep predicate: only a stale `upcoming` installment becomes overdue.
/// Paid and already-overdue rows are never touched, nor is a row due
/// exactly now.
pub fn is_sweepable(status: PaymentStatus, due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    status == PaymentStatus::Upcoming && due_date < now
}

/// A settled installment cannot be paid again.
pub fn already_paid(status: PaymentStatus) -> bool {
    status == PaymentStatus::Paid
}

/// A loan closes when its last unpaid installment is settled.
pub fn loan_closes(remaining_unpaid: i64) -> bool {
    remaining_unpaid == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_fee_is_two_percent() {
        assert!((late_fee(1000.0) - 20.0).abs() < 1e-9);
        assert!((late_fee(0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_score_initialized_on_first_event() {
        assert_eq!(adjusted_credit_score(None, false), 610);
        assert_eq!(adjusted_credit_score(None, true), 580);
    }

    #[test]
    fn test_score_deltas() {
        assert_eq!(adjusted_credit_score(Some(600), false), 610);
        assert_eq!(adjusted_credit_score(Some(600), true), 580);
    }

    #[test]
    fn test_score_is_unbounded() {
        // No clamping in either direction
        assert_eq!(adjusted_credit_score(Some(995), false), 1005);
        assert_eq!(adjusted_credit_score(Some(10), true), -10);
    }
}
