//! EMI Lifecycle Business-Rule Tests
//!
//! These tests validate the installment lifecycle rules with various
//! scenarios: schedule generation, late fees, credit-score adjustments,
//! and edge cases.

use chrono::{Duration, TimeZone, Utc};

use lendhub_server::loan::{amortized_monthly_payment, installment_due_dates, LoanStatus};
use lendhub_server::payment::{
    adjusted_credit_score, already_paid, is_sweepable, late_fee, loan_closes, PaymentStatus,
    INITIAL_CREDIT_SCORE, LATE_FEE_RATE, ON_TIME_SCORE_DELTA, OVERDUE_SCORE_DELTA,
};

// ============================================================================
// Schedule Generation
// ============================================================================

#[test]
fn test_schedule_has_one_due_date_per_term_month() {
    let approved = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

    for term in [1, 3, 12, 60] {
        let dates = installment_due_dates(approved, term).unwrap();
        assert_eq!(dates.len(), term as usize);
    }
}

#[test]
fn test_schedule_due_dates_start_one_month_after_approval() {
    let approved = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
    let dates = installment_due_dates(approved, 3).unwrap();

    assert_eq!(dates[0], Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap());
    assert_eq!(dates[1], Utc.with_ymd_and_hms(2025, 8, 1, 9, 30, 0).unwrap());
    assert_eq!(dates[2], Utc.with_ymd_and_hms(2025, 9, 1, 9, 30, 0).unwrap());
}

#[test]
fn test_schedule_due_dates_are_strictly_increasing() {
    let approved = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
    let dates = installment_due_dates(approved, 24).unwrap();

    for pair in dates.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_schedule_crosses_year_boundary() {
    let approved = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
    let dates = installment_due_dates(approved, 3).unwrap();

    assert_eq!(dates[0], Utc.with_ymd_and_hms(2025, 12, 10, 0, 0, 0).unwrap());
    assert_eq!(dates[1], Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap());
    assert_eq!(dates[2], Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap());
}

// ============================================================================
// Monthly Payment (EMI) Computation
// ============================================================================

#[test]
fn test_monthly_payment_known_amortization() {
    // 100_000 over 360 months at 6% APR: the textbook 599.55
    let m = amortized_monthly_payment(100_000.0, 6.0, 360);
    assert!((m - 599.55).abs() < 0.01, "got {}", m);
}

#[test]
fn test_monthly_payment_total_repays_at_least_principal() {
    let principal = 50_000.0;
    let m = amortized_monthly_payment(principal, 9.5, 48);
    assert!(m * 48.0 > principal);
}

#[test]
fn test_monthly_payment_zero_rate_splits_principal_evenly() {
    let m = amortized_monthly_payment(9_000.0, 0.0, 9);
    assert!((m - 1000.0).abs() < 1e-9);
}

// ============================================================================
// Late Fee Rules
// ============================================================================

#[test]
fn test_late_fee_rate_is_two_percent() {
    assert!((LATE_FEE_RATE - 0.02).abs() < f64::EPSILON);
}

#[test]
fn test_overdue_installment_of_1000_carries_20_fee() {
    let amount = 1000.0;
    let fee = late_fee(amount);
    let final_amount = amount + fee;

    assert!((fee - 20.0).abs() < 1e-9);
    assert!((final_amount - 1020.0).abs() < 1e-9);
}

#[test]
fn test_final_amount_is_amount_times_1_02() {
    for amount in [1.0, 250.75, 1000.0, 99_999.99] {
        let final_amount = amount + late_fee(amount);
        assert!((final_amount - amount * 1.02).abs() < 1e-6);
    }
}

// ============================================================================
// Credit Score Rules
// ============================================================================

#[test]
fn test_score_defaults_to_600_on_first_event() {
    assert_eq!(INITIAL_CREDIT_SCORE, 600);
    assert_eq!(adjusted_credit_score(None, false), 610);
    assert_eq!(adjusted_credit_score(None, true), 580);
}

#[test]
fn test_on_time_payment_adds_10() {
    assert_eq!(ON_TIME_SCORE_DELTA, 10);
    assert_eq!(adjusted_credit_score(Some(600), false), 610);
    assert_eq!(adjusted_credit_score(Some(750), false), 760);
}

#[test]
fn test_overdue_payment_subtracts_20() {
    assert_eq!(OVERDUE_SCORE_DELTA, -20);
    assert_eq!(adjusted_credit_score(Some(600), true), 580);
    assert_eq!(adjusted_credit_score(Some(610), true), 590);
}

#[test]
fn test_score_has_no_floor_or_ceiling() {
    assert_eq!(adjusted_credit_score(Some(15), true), -5);
    assert_eq!(adjusted_credit_score(Some(900), false), 910);
}

// ============================================================================
// End-to-End Payment Scenarios
// ============================================================================

#[test]
fn test_scenario_pay_upcoming_installment() {
    // Installment #1: amount 1000, status upcoming, prior score 600
    let amount = 1000.0;
    let was_overdue = false;

    let fee = if was_overdue { late_fee(amount) } else { 0.0 };
    let final_amount = amount + fee;
    let score = adjusted_credit_score(Some(600), was_overdue);

    assert!(!was_overdue);
    assert!((fee - 0.0).abs() < 1e-9);
    assert!((final_amount - 1000.0).abs() < 1e-9);
    assert_eq!(score, 610);
}

#[test]
fn test_scenario_pay_overdue_installment() {
    // Installment #2: amount 1000, status overdue, prior score 610
    let amount = 1000.0;
    let was_overdue = true;

    let fee = late_fee(amount);
    let final_amount = amount + fee;
    let score = adjusted_credit_score(Some(610), was_overdue);

    assert!((fee - 20.0).abs() < 1e-9);
    assert!((final_amount - 1020.0).abs() < 1e-9);
    assert_eq!(score, 590);
}

// ============================================================================
// Overdue Sweep Rules
// ============================================================================

#[test]
fn test_sweep_flips_only_past_due_upcoming_rows() {
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();
    let past = now - Duration::days(3);
    let future = now + Duration::days(3);

    assert!(is_sweepable(PaymentStatus::Upcoming, past, now));
    assert!(!is_sweepable(PaymentStatus::Upcoming, future, now));
    assert!(!is_sweepable(PaymentStatus::Overdue, past, now));
    assert!(!is_sweepable(PaymentStatus::Paid, past, now));
}

#[test]
fn test_sweep_ignores_installment_due_exactly_now() {
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();
    assert!(!is_sweepable(PaymentStatus::Upcoming, now, now));
}

// ============================================================================
// Double-Pay Guard and Loan Close Rules
// ============================================================================

#[test]
fn test_second_pay_attempt_on_settled_installment_is_rejected() {
    assert!(already_paid(PaymentStatus::Paid));
    assert!(!already_paid(PaymentStatus::Upcoming));
    assert!(!already_paid(PaymentStatus::Overdue));
}

#[test]
fn test_loan_closes_only_when_no_unpaid_installments_remain() {
    assert!(loan_closes(0));
    assert!(!loan_closes(1));
    assert!(!loan_closes(11));
}

// ============================================================================
// Loan Status Transitions
// ============================================================================

#[test]
fn test_progress_labels_for_admin_decisions() {
    assert_eq!(LoanStatus::Approved.progress_label(), "Approved");
    assert_eq!(LoanStatus::Rejected.progress_label(), "Rejected");
    assert_eq!(LoanStatus::Review.progress_label(), "Under Review");
}

#[test]
fn test_closed_loan_is_never_reopened() {
    for next in [
        LoanStatus::Submitted,
        LoanStatus::Review,
        LoanStatus::Approved,
        LoanStatus::Active,
    ] {
        assert!(!LoanStatus::Closed.can_transition_to(next));
    }
}

#[test]
fn test_rejected_loan_cannot_be_approved_later() {
    assert!(!LoanStatus::Rejected.can_transition_to(LoanStatus::Approved));
    assert!(!LoanStatus::Rejected.can_transition_to(LoanStatus::Active));
}

#[test]
fn test_admin_decision_paths_advance() {
    assert!(LoanStatus::Submitted.can_transition_to(LoanStatus::Approved));
    assert!(LoanStatus::Review.can_transition_to(LoanStatus::Approved));
    assert!(LoanStatus::Review.can_transition_to(LoanStatus::Rejected));
    assert!(LoanStatus::Active.can_transition_to(LoanStatus::Closed));
}
