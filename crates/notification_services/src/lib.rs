//! # Notification Services
//!
//! This crate provides the push-notification sink for the campsite checker.
//! Messages are delivered through Pushover with a single best-effort attempt.

/// Pushover delivery service.
pub mod service;
/// Wire types for the Pushover messages API.
pub mod types;

pub use service::PushoverNotifier;
pub use types::{PUSHOVER_API_URL, PushoverMessage};
