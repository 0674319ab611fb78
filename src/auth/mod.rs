//! Authentication module for LendHub
//!
//! Provides email/password authentication:
//! - bcrypt password hashing
//! - JWT token generation and validation

mod jwt;
mod service;

pub use jwt::{generate_token, verify_token, Claims};
pub use service::{AuthError, AuthService};
