//! # WebDriver Probe
//!
//! This crate drives a Chrome browser through a W3C WebDriver server
//! (chromedriver) and exposes it as a [`campground_scan::SiteProbe`].
//! Each cycle gets a fresh session that is deleted when the cycle ends.

/// HTTP client for the WebDriver server and the probe factory
mod client;
pub use client::*;

/// A live browser session
mod session;
pub use session::*;

/// Wire types and capability builders
mod types;
pub use types::WebDriverError;
