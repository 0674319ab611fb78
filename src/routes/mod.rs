//! Route definitions for the LendHub API

mod admin;
mod auth;
mod loan;
mod payment;

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use loan::loan_routes;
pub use payment::payment_routes;
