//! cpupin-core: Core types for the cpupin pinning service
//!
//! This crate provides the fundamental types used throughout cpupin:
//! - CPU topology records and the `lscpu -p` parser
//! - Daemon configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod topology;

pub use config::*;
pub use error::*;
pub use topology::*;
