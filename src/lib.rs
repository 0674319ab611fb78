//! LendHub Backend Library
//!
//! This library exports the core modules for the LendHub loan-management
//! backend server.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod loan;
pub mod loan_service;
pub mod middleware;
pub mod models;
pub mod payment;
pub mod payment_service;
pub mod routes;
pub mod scheduler;
pub mod state;
