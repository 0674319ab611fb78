//! Payment service layer - installment processing and the overdue sweep

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::loan::{Loan, LoanStatus};
use crate::models::User;
use crate::payment::{
    adjusted_credit_score, already_paid, late_fee, loan_closes, Payment, PaymentStatus,
    ProcessPaymentResponse,
};

/// Payment processing errors
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Loan not found")]
    LoanNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Payment already processed")]
    AlreadyPaid,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentError {
    fn from(e: sqlx::Error) -> Self {
        PaymentError::DatabaseError(e.to_string())
    }
}

/// Payment service for the installment lifecycle
#[derive(Clone)]
pub struct PaymentService {
    db_pool: PgPool,
}

impl PaymentService {
    /// Create a new payment service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// List installments for a loan owned by the caller
    ///
    /// Returns `None` when the loan does not exist or belongs to someone
    /// else; the caller cannot distinguish the two.
    pub async fn list_for_loan(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
    ) -> Result<Option<Vec<Payment>>, PaymentError> {
        let loan: Option<Loan> =
            sqlx::query_as("SELECT * FROM loans WHERE id = $1 AND user_id = $2")
                .bind(loan_id)
                .bind(user_id)
                .fetch_optional(&self.db_pool)
                .await?;

        if loan.is_none() {
            return Ok(None);
        }

        let payments: Vec<Payment> = sqlx::query_as(
            "SELECT * FROM payments WHERE loan_id = $1 ORDER BY payment_number ASC",
        )
        .bind(loan_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(Some(payments))
    }

    /// Process a payment on one installment
    ///
    /// Applies the late fee if the installment is overdue, marks it paid,
    /// adjusts the owner's credit score, and closes the loan when no unpaid
    /// installments remain. All writes happen in one transaction; the paid
    /// transition is a conditional update, so a concurrent second caller
    /// loses with `AlreadyPaid` instead of double-applying side effects.
    pub async fn process(
        &self,
        payment_id: Uuid,
        payment_method: Option<String>,
    ) -> Result<ProcessPaymentResponse, PaymentError> {
        let mut tx = self.db_pool.begin().await?;

        let payment: Payment =
            sqlx::query_as("SELECT * FROM payments WHERE id = $1 FOR UPDATE")
                .bind(payment_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(PaymentError::PaymentNotFound)?;

        if already_paid(payment.status) {
            return Err(PaymentError::AlreadyPaid);
        }

        let loan: Loan = sqlx::query_as("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(payment.loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(PaymentError::LoanNotFound)?;

        let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(loan.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(PaymentError::UserNotFound)?;

        let was_overdue = payment.status == PaymentStatus::Overdue;
        let fee = if was_overdue {
            late_fee(payment.amount)
        } else {
            0.0
        };
        let final_amount = payment.amount + fee;
        let method = payment_method.unwrap_or_else(|| "online".to_string());
        let now = Utc::now();

        // Conditional transition: the status guard rejects a concurrent
        // caller that lost the race.
        let payment: Payment = sqlx::query_as(
            r#"
            UPDATE payments
            SET status = $1, amount = $2, paid_date = $3, payment_method = $4
            WHERE id = $5 AND status <> $1
            RETURNING *
            "#,
        )
        .bind(PaymentStatus::Paid)
        .bind(final_amount)
        .bind(now)
        .bind(&method)
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PaymentError::AlreadyPaid)?;

        let credit_score = adjusted_credit_score(user.credit_score, was_overdue);

        sqlx::query("UPDATE users SET credit_score = $1, updated_at = $2 WHERE id = $3")
            .bind(credit_score)
            .bind(now)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        let remaining: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE loan_id = $1 AND status <> $2",
        )
        .bind(loan.id)
        .bind(PaymentStatus::Paid)
        .fetch_one(&mut *tx)
        .await?;

        let loan_status = if loan_closes(remaining) {
            sqlx::query("UPDATE loans SET status = $1, progress = $2, updated_at = $3 WHERE id = $4")
                .bind(LoanStatus::Closed)
                .bind(LoanStatus::Closed.progress_label())
                .bind(now)
                .bind(loan.id)
                .execute(&mut *tx)
                .await?;
            LoanStatus::Closed
        } else {
            loan.status
        };

        tx.commit().await?;

        tracing::info!(
            payment_id = %payment.id,
            loan_id = %loan.id,
            late_fee_applied = was_overdue,
            credit_score,
            "Payment processed"
        );

        Ok(ProcessPaymentResponse {
            message: "Payment processed successfully".to_string(),
            late_fee_applied: was_overdue,
            late_fee: fee,
            final_amount_paid: final_amount,
            credit_score,
            loan_status,
            payment,
        })
    }

    /// Reclassify every stale `upcoming` installment as `overdue`
    ///
    /// A single set-based update with no loan or user side effects. Returns
    /// the number of reclassified installments.
    pub async fn sweep_overdue(&self) -> Result<u64, PaymentError> {
        let rows_affected = sqlx::query(
            "UPDATE payments SET status = $1 WHERE status = $2 AND due_date < $3",
        )
        .bind(PaymentStatus::Overdue)
        .bind(PaymentStatus::Upcoming)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        Ok(rows_affected)
    }
}
