//! cpupin-api: HTTP API server for cpupin
//!
//! This crate provides the HTTP surface of the pinning service:
//! - Form-encoded pinning suggestions
//! - Public host enforcement
//! - Service status

pub mod rest;

pub use rest::{create_router, AppState};
