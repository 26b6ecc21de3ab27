//! HTTP service for Abstract Name Service lookups.
//!
//! Exposes the host handlers of the `ans` crate over Axum, with one
//! alloy-backed resolver per configured chain.
//!
//! # Modules
//!
//! - [`handlers`] - Axum route handlers and router builder
//! - [`error`] - Service error types
//! - [`config`] - Server configuration with environment variable expansion

pub mod config;
pub mod error;
pub mod handlers;

pub use handlers::{AnsService, AnsState, ans_router};
