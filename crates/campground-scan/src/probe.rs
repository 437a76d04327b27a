use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// How a [`Locator`] selector is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorStrategy {
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
}

/// A way to find one element on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Selector language
    pub strategy: LocatorStrategy,
    /// Selector text
    pub selector: String,
}

impl Locator {
    /// Locate by CSS selector
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            strategy: LocatorStrategy::Css,
            selector: selector.into(),
        }
    }

    /// Locate by XPath expression
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            strategy: LocatorStrategy::XPath,
            selector: selector.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            LocatorStrategy::Css => write!(f, "css `{}`", self.selector),
            LocatorStrategy::XPath => write!(f, "xpath `{}`", self.selector),
        }
    }
}

/// Raw failure signals reported by a probe backend
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    /// Required probe configuration is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A bounded wait elapsed
    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// The wait window that elapsed
        after: Duration,
    },

    /// Anything else: driver crash, transport error, unexpected page structure
    #[error("Probe fault: {0}")]
    Fault(String),
}

impl ProbeError {
    /// Whether this is an elapsed wait rather than a hard fault
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout { .. })
    }
}

/// Factory for browser sessions. One session is opened per cycle.
#[async_trait]
pub trait SiteProbe: Send + Sync {
    /// Start a fresh browser session
    async fn open_session(&self) -> Result<Box<dyn ProbeSession>, ProbeError>;
}

/// A live browser session, exclusive to one cycle
#[async_trait]
pub trait ProbeSession: Send + Sync {
    /// Load `url`, failing with [`ProbeError::Timeout`] after `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ProbeError>;

    /// Wait until the element is present and visible
    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<(), ProbeError>;

    /// Wait until the element can be clicked, then click it
    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), ProbeError>;

    /// Capture the current page as PNG bytes
    async fn screenshot(&self) -> Result<Vec<u8>, ProbeError>;

    /// Tear the session down
    async fn close(self: Box<Self>) -> Result<(), ProbeError>;
}
