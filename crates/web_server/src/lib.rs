//! # Web Server
//!
//! Process wrappers for the campsite checker: a foreground command-line loop
//! and a minimal health-check service that runs the loop as a background task.

/// Liveness endpoints for the hosting platform
mod health_handlers;
pub use health_handlers::*;

/// Owns the single background monitor task
mod monitor_manager;
pub use monitor_manager::*;

/// Shared startup helpers for both binaries
mod startup;
pub use startup::*;
