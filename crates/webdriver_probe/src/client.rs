use std::time::Duration;

use async_trait::async_trait;
use campground_scan::{BrowserConfig, ProbeError, ProbeSession, ScanError, SiteProbe};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::session::WebDriverSession;
use crate::types::*;

/// Per-request timeout for ordinary WebDriver commands
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin JSON-over-HTTP client for a W3C WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: String,
}

impl WebDriverClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ScanError> {
        Url::parse(base_url).map_err(|e| {
            ScanError::ConfigError(format!("Invalid WebDriver URL '{}': {}", base_url, e))
        })?;

        let http = Client::builder()
            .timeout(COMMAND_TIMEOUT)
            .build()
            .map_err(|e| ScanError::Network(format!("Failed to create WebDriver client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send one command and return the `value` of the response.
    ///
    /// `timeout` overrides [`COMMAND_TIMEOUT`] for commands that can run long.
    pub async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("WebDriver {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let envelope: WireResponse = serde_json::from_str(&text).map_err(|e| {
            WebDriverError::Protocol(format!("status {} with unreadable body: {}", status, e))
        })?;

        if status.is_success() {
            return Ok(envelope.value);
        }

        match serde_json::from_value::<WireError>(envelope.value) {
            Ok(wire) => Err(WebDriverError::Command {
                code: wire.error,
                message: wire.message,
            }),
            Err(_) => Err(WebDriverError::Protocol(format!(
                "status {} without an error payload",
                status
            ))),
        }
    }
}

/// [`SiteProbe`] backed by a chromedriver-compatible WebDriver server
pub struct WebDriverProbe {
    client: WebDriverClient,
    browser: BrowserConfig,
}

impl WebDriverProbe {
    /// Create a probe using the given browser settings
    pub fn new(browser: &BrowserConfig) -> Result<Self, ScanError> {
        Ok(Self {
            client: WebDriverClient::new(&browser.webdriver_url)?,
            browser: browser.clone(),
        })
    }
}

#[async_trait]
impl SiteProbe for WebDriverProbe {
    async fn open_session(&self) -> Result<Box<dyn ProbeSession>, ProbeError> {
        let value = self
            .client
            .command(
                Method::POST,
                "/session",
                Some(chrome_capabilities(&self.browser)),
                Some(Duration::from_secs(60)),
            )
            .await?;

        let session: NewSession = serde_json::from_value(value)
            .map_err(|e| ProbeError::Fault(format!("Malformed new session response: {}", e)))?;

        info!(
            "Browser session {} started (headless: {})",
            session.session_id, self.browser.headless
        );

        Ok(Box::new(WebDriverSession::new(
            self.client.clone(),
            session.session_id,
        )))
    }
}
