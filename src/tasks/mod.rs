//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweep: Removes expired cache entries every TTL period

mod sweep;

pub use sweep::spawn_sweep_task;
