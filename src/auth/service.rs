//! Authentication service
//!
//! Core business logic for email/password authentication.

use sqlx::types::chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AuthTokenResponse, LoginRequest, RegisterRequest, User, UserRole};

use super::jwt::{generate_token, JwtError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token error: {0}")]
    TokenError(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::DatabaseError(e.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        AuthError::TokenError(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AuthError::HashingFailed(e.to_string())
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db_pool: PgPool,
    jwt_secret: String,
    token_ttl_seconds: i64,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(db_pool: PgPool, jwt_secret: String, token_ttl_seconds: i64) -> Self {
        Self {
            db_pool,
            jwt_secret,
            token_ttl_seconds,
        }
    }

    /// Register a new account and issue a token
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthTokenResponse, AuthError> {
        let email = req.email.trim().to_lowercase();

        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.db_pool)
            .await?;

        if existing.is_some() {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
        let now = Utc::now();

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&email)
        .bind(&password_hash)
        .bind(UserRole::User)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        self.issue_token(user)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, req: LoginRequest) -> Result<AuthTokenResponse, AuthError> {
        let email = req.email.trim().to_lowercase();

        let user: User = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = bcrypt::verify(&req.password, &user.password_hash)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(user)
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, AuthError> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// List all users (admin console)
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.db_pool)
            .await?;

        Ok(users)
    }

    /// Update a user's role (admin console)
    pub async fn update_user_role(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<User, AuthError> {
        sqlx::query_as(
            r#"
            UPDATE users
            SET role = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(role)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(AuthError::UserNotFound)
    }

    fn issue_token(&self, user: User) -> Result<AuthTokenResponse, AuthError> {
        let token = generate_token(&user, &self.jwt_secret, self.token_ttl_seconds)?;

        Ok(AuthTokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_ttl_seconds,
            user: user.into(),
        })
    }

    /// Get JWT secret (for middleware access)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
