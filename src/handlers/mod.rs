//! API handlers for the LendHub backend

pub mod admin;
pub mod auth;
pub mod loan;
pub mod payment;

// Re-export auth extractors from middleware for handler use
pub use crate::middleware::auth::{AdminUser, AuthenticatedUser};
