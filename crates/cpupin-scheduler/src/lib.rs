//! cpupin-scheduler: vCPU placement for cpupin
//!
//! This crate turns a parsed topology into a pinning suggestion:
//! - Weight-based CPU ranking and selection
//! - Pinning fragment rendering with topology summary
//! - The end-to-end suggestion pipeline

pub mod fragment;
pub mod placement;
pub mod scheduler;

pub use fragment::{format_placement, CpuTopologySummary, PinningFragment, VcpuPin};
pub use placement::{select, weight, PlacementStrategy, WeightedPlacement};
pub use scheduler::Scheduler;
