//! Loan service layer - Business logic for loan lifecycle management

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::loan::{
    amortized_monthly_payment, installment_due_dates, CreateLoanRequest, Loan, LoanStatus,
    LoanWithApplicant,
};
use crate::payment::PaymentStatus;

/// Loan lifecycle errors
#[derive(Error, Debug)]
pub enum LoanError {
    #[error("Loan not found")]
    NotFound,

    #[error("Cannot change loan status from {} to {}", .from.as_str(), .to.as_str())]
    InvalidTransition { from: LoanStatus, to: LoanStatus },

    #[error("Installment due date out of range")]
    DueDateOverflow,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for LoanError {
    fn from(e: sqlx::Error) -> Self {
        LoanError::DatabaseError(e.to_string())
    }
}

/// Loan service for managing the loan lifecycle
#[derive(Clone)]
pub struct LoanService {
    db_pool: PgPool,
}

impl LoanService {
    /// Create a new loan service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Submit a loan application
    ///
    /// The monthly payment is computed here, once, and never recomputed.
    pub async fn apply(&self, user_id: Uuid, request: CreateLoanRequest) -> Result<Loan, LoanError> {
        let monthly_payment =
            amortized_monthly_payment(request.amount, request.interest_rate, request.term_months);
        let now = Utc::now();

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (
                id, user_id, loan_type, amount, interest_rate,
                term_months, monthly_payment, status, progress,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&request.loan_type)
        .bind(request.amount)
        .bind(request.interest_rate)
        .bind(request.term_months)
        .bind(monthly_payment)
        .bind(LoanStatus::Submitted)
        .bind(LoanStatus::Submitted.progress_label())
        .bind(now)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(loan)
    }

    /// Get a loan by ID, scoped to its owner
    pub async fn get_for_user(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
    ) -> Result<Option<Loan>, LoanError> {
        let loan =
            sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 AND user_id = $2")
                .bind(loan_id)
                .bind(user_id)
                .fetch_optional(&self.db_pool)
                .await?;
        Ok(loan)
    }

    /// List a user's loans, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Loan>, LoanError> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(loans)
    }

    /// List all loans joined with applicant details (admin console)
    pub async fn list_all_with_applicants(&self) -> Result<Vec<LoanWithApplicant>, LoanError> {
        let loans = sqlx::query_as::<_, LoanWithApplicant>(
            r#"
            SELECT l.*, u.first_name, u.last_name, u.email
            FROM loans l
            JOIN users u ON u.id = l.user_id
            ORDER BY l.created_at DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(loans)
    }

    /// Update a loan's status and progress label (admin action)
    ///
    /// Status only advances forward; a backward move, or any move out of
    /// `rejected` or `closed`, fails with `InvalidTransition`. On the
    /// transition into `approved` the full repayment schedule is
    /// generated. Status update and installment inserts run in one
    /// transaction, so a failure leaves no partial schedule behind. The
    /// schedule fires at most once: a loan that is already approved (or
    /// further along) is never rescheduled.
    pub async fn update_status(&self, loan_id: Uuid, status: LoanStatus) -> Result<Loan, LoanError> {
        let mut tx = self.db_pool.begin().await?;

        let current = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(LoanError::NotFound)?;

        if !current.status.can_transition_to(status) {
            return Err(LoanError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let now = Utc::now();
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET status = $1, progress = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(status.progress_label())
        .bind(now)
        .bind(loan_id)
        .fetch_one(&mut *tx)
        .await?;

        let newly_approved = status == LoanStatus::Approved
            && matches!(current.status, LoanStatus::Submitted | LoanStatus::Review);

        if newly_approved {
            self.generate_schedule(&mut tx, &loan).await?;
            tracing::info!(
                loan_id = %loan.id,
                term_months = loan.term_months,
                "Repayment schedule generated"
            );
        }

        tx.commit().await?;

        Ok(loan)
    }

    /// Create one installment per month of the term, due one calendar
    /// month apart starting one month after approval.
    async fn generate_schedule(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        loan: &Loan,
    ) -> Result<(), LoanError> {
        let approved_at = Utc::now();
        let due_dates = installment_due_dates(approved_at, loan.term_months)
            .ok_or(LoanError::DueDateOverflow)?;

        for (i, due_date) in (1..=loan.term_months).zip(due_dates) {
            sqlx::query(
                r#"
                INSERT INTO payments (
                    id, loan_id, payment_number, amount, due_date, status, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(loan.id)
            .bind(i)
            .bind(loan.monthly_payment)
            .bind(due_date)
            .bind(PaymentStatus::Upcoming)
            .bind(approved_at)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
