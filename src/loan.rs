//! Loan models for LendHub
use chrono::Months;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Loan status enum
///
/// Status only advances forward; a closed loan is never reopened.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Submitted,
    Review,
    Approved,
    Rejected,
    Active,
    Closed,
}

impl LoanStatus {
    /// Human-readable progress label shown to applicants
    pub fn progress_label(&self) -> &'static str {
        match self {
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
            LoanStatus::Active => "Active",
            LoanStatus::Closed => "Closed",
            LoanStatus::Submitted | LoanStatus::Review => "Under Review",
        }
    }

    /// Whether a loan may move from this status to `next`.
    ///
    /// Status only advances; `rejected` and `closed` are terminal. A
    /// same-status update is allowed (idempotent re-send).
    pub fn can_transition_to(self, next: LoanStatus) -> bool {
        if self == next {
            return true;
        }
        match self {
            LoanStatus::Submitted => matches!(
                next,
                LoanStatus::Review | LoanStatus::Approved | LoanStatus::Rejected
            ),
            LoanStatus::Review => matches!(next, LoanStatus::Approved | LoanStatus::Rejected),
            LoanStatus::Approved => matches!(next, LoanStatus::Active | LoanStatus::Closed),
            LoanStatus::Active => matches!(next, LoanStatus::Closed),
            LoanStatus::Rejected | LoanStatus::Closed => false,
        }
    }

    /// Lowercase wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Submitted => "submitted",
            LoanStatus::Review => "review",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Active => "active",
            LoanStatus::Closed => "closed",
        }
    }
}

/// Loan model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub loan_type: String,
    /// Principal amount
    pub amount: f64,
    /// Annual interest rate, percent
    pub interest_rate: f64,
    /// Term in months
    pub term_months: i32,
    /// Computed once at application time, never recomputed
    pub monthly_payment: f64,
    pub status: LoanStatus,
    pub progress: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Loan joined with its applicant, for the admin console
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoanWithApplicant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub loan_type: String,
    pub amount: f64,
    pub interest_rate: f64,
    pub term_months: i32,
    pub monthly_payment: f64,
    pub status: LoanStatus,
    pub progress: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Request to apply for a loan
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    #[validate(length(min = 1, max = 50))]
    pub loan_type: String,

    #[validate(range(min = 1.0))]
    pub amount: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub interest_rate: f64,

    #[validate(range(min = 1, max = 600))]
    pub term_months: i32,
}

/// Request to update a loan's status (admin only)
#[derive(Debug, Deserialize)]
pub struct UpdateLoanStatusRequest {
    pub status: LoanStatus,
}

/// Standard amortization formula for the fixed monthly payment (EMI).
///
/// `annual_rate_pct` is the yearly rate in percent. A zero-rate loan
/// degenerates to principal divided by term.
pub fn amortized_monthly_payment(principal: f64, annual_rate_pct: f64, term_months: i32) -> f64 {
    let n = term_months as f64;
    let r = annual_rate_pct / 100.0 / 12.0;

    if r == 0.0 {
        return principal / n;
    }

    let factor = (1.0 + r).powf(n);
    principal * r * factor / (factor - 1.0)
}

/// Due dates for a repayment schedule: one calendar month apart, starting
/// one month after approval. `None` if a date would overflow the calendar.
pub fn installment_due_dates(
    approved_at: DateTime<Utc>,
    term_months: i32,
) -> Option<Vec<DateTime<Utc>>> {
    (1..=term_months)
        .map(|i| approved_at.checked_add_months(Months::new(i as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_amortized_monthly_payment_standard() {
        // 12_000 over 12 months at 12% APR: known amortization result
        let m = amortized_monthly_payment(12_000.0, 12.0, 12);
        assert!((m - 1066.18).abs() < 0.01, "got {}", m);
    }

    #[test]
    fn test_amortized_monthly_payment_zero_rate() {
        let m = amortized_monthly_payment(12_000.0, 0.0, 12);
        assert!((m - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_amortized_payment_exceeds_flat_split_when_interest_charged() {
        let m = amortized_monthly_payment(10_000.0, 8.5, 24);
        assert!(m > 10_000.0 / 24.0);
    }

    #[test]
    fn test_installment_due_dates_one_month_apart() {
        let approved = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let dates = installment_due_dates(approved, 3).unwrap();

        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0], Utc.with_ymd_and_hms(2025, 2, 15, 12, 0, 0).unwrap());
        assert_eq!(dates[1], Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap());
        assert_eq!(dates[2], Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_installment_due_dates_clamp_to_month_end() {
        // Jan 31 + 1 month clamps to Feb 28 in a non-leap year
        let approved = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let dates = installment_due_dates(approved, 2).unwrap();

        assert_eq!(dates[0], Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap());
        assert_eq!(dates[1], Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_progress_labels() {
        assert_eq!(LoanStatus::Approved.progress_label(), "Approved");
        assert_eq!(LoanStatus::Rejected.progress_label(), "Rejected");
        assert_eq!(LoanStatus::Submitted.progress_label(), "Under Review");
        assert_eq!(LoanStatus::Review.progress_label(), "Under Review");
        assert_eq!(LoanStatus::Closed.progress_label(), "Closed");
    }

    #[test]
    fn test_status_advances_forward() {
        assert!(LoanStatus::Submitted.can_transition_to(LoanStatus::Review));
        assert!(LoanStatus::Submitted.can_transition_to(LoanStatus::Approved));
        assert!(LoanStatus::Review.can_transition_to(LoanStatus::Rejected));
        assert!(LoanStatus::Approved.can_transition_to(LoanStatus::Active));
        assert!(LoanStatus::Active.can_transition_to(LoanStatus::Closed));
    }

    #[test]
    fn test_terminal_statuses_never_reopen() {
        for next in [
            LoanStatus::Submitted,
            LoanStatus::Review,
            LoanStatus::Approved,
            LoanStatus::Active,
        ] {
            assert!(!LoanStatus::Closed.can_transition_to(next));
            assert!(!LoanStatus::Rejected.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!LoanStatus::Approved.can_transition_to(LoanStatus::Submitted));
        assert!(!LoanStatus::Approved.can_transition_to(LoanStatus::Review));
        assert!(!LoanStatus::Active.can_transition_to(LoanStatus::Approved));
    }

    #[test]
    fn test_same_status_resend_is_allowed() {
        assert!(LoanStatus::Approved.can_transition_to(LoanStatus::Approved));
        assert!(LoanStatus::Closed.can_transition_to(LoanStatus::Closed));
    }
}
