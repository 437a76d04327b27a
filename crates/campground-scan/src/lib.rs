//! # Campground Scan
//!
//! This crate watches a single campground reservation page and raises an alert
//! when a site may have opened up. It holds the availability classifier, which
//! reduces one noisy browser probe to a [`CycleOutcome`], and the monitor loop,
//! which repeats that probe on a fixed interval with a consecutive-failure
//! ceiling.
//!
//! Browser automation and push delivery are injected through the
//! [`SiteProbe`] and [`NotificationService`] traits.

/// Outcome, state and error types for scan cycles
mod scan_types;
pub use scan_types::*;

/// Startup configuration
mod config;
pub use config::*;

/// Browser probe capability traits
mod probe;
pub use probe::*;

/// Availability classification of a single probe cycle
mod classifier;
pub use classifier::*;

/// Notification events and the delivery seam
mod notification_service;
pub use notification_service::*;

/// The monitor loop
mod executor;
pub use executor::*;
