use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use campground_scan::{Locator, ProbeError, ProbeSession};
use reqwest::Method;
use serde_json::{Value, json};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, warn};

use crate::client::WebDriverClient;
use crate::types::*;

/// Pause between element lookups while waiting
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Extra time given to the HTTP request beyond the browser's own page-load timeout
const NAVIGATION_SLACK: Duration = Duration::from_secs(15);

/// A single WebDriver browser session.
///
/// Dropping a session that was never closed issues a best-effort delete on
/// the current tokio runtime so the browser process does not leak.
pub struct WebDriverSession {
    client: WebDriverClient,
    session_id: String,
    closed: AtomicBool,
}

impl WebDriverSession {
    pub(crate) fn new(client: WebDriverClient, session_id: String) -> Self {
        Self {
            client,
            session_id,
            closed: AtomicBool::new(false),
        }
    }

    fn path(&self, suffix: &str) -> String {
        format!("/session/{}{}", self.session_id, suffix)
    }

    /// One lookup round: `Some(id)` when the element exists and is ready
    async fn find_ready(
        &self,
        locator: &Locator,
        require_enabled: bool,
    ) -> Result<Option<String>, WebDriverError> {
        let found = self
            .client
            .command(
                Method::POST,
                &self.path("/element"),
                Some(locator_body(locator)),
                None,
            )
            .await;

        let id = match found {
            Ok(value) => element_id(&value)?,
            Err(e) if e.is_missing_element() => return Ok(None),
            Err(e) => return Err(e),
        };

        if !self.element_flag(&id, "displayed").await? {
            return Ok(None);
        }
        if require_enabled && !self.element_flag(&id, "enabled").await? {
            return Ok(None);
        }

        Ok(Some(id))
    }

    /// Read a boolean element property; a vanished element reads as `false`
    async fn element_flag(&self, id: &str, flag: &str) -> Result<bool, WebDriverError> {
        let path = self.path(&format!("/element/{}/{}", id, flag));
        match self.client.command(Method::GET, &path, None, None).await {
            Ok(value) => Ok(value.as_bool().unwrap_or(false)),
            Err(e) if e.is_missing_element() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Poll until the element is ready, never past `window`
    async fn wait_for(
        &self,
        locator: &Locator,
        window: Duration,
        require_enabled: bool,
    ) -> Result<String, ProbeError> {
        let deadline = Instant::now() + window;
        let timed_out = || ProbeError::Timeout {
            what: locator.to_string(),
            after: window,
        };
        // An absent element is only established once the driver has answered a lookup.
        let mut answered = false;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }

            match timeout(remaining, self.find_ready(locator, require_enabled)).await {
                Err(_) if answered => return Err(timed_out()),
                Err(_) => {
                    return Err(ProbeError::Fault(format!(
                        "WebDriver did not respond to the lookup of {} within {:?}",
                        locator, window
                    )));
                }
                Ok(Ok(Some(id))) => return Ok(id),
                Ok(Ok(None)) => answered = true,
                Ok(Err(e)) => return Err(e.into()),
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }
            sleep(POLL_INTERVAL.min(remaining)).await;
        }
    }
}

/// Page-load timeout in the integer milliseconds WebDriver expects
fn page_load_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl ProbeSession for WebDriverSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ProbeError> {
        self.client
            .command(
                Method::POST,
                &self.path("/timeouts"),
                Some(json!({ "pageLoad": page_load_millis(timeout) })),
                None,
            )
            .await?;

        let result = self
            .client
            .command(
                Method::POST,
                &self.path("/url"),
                Some(json!({ "url": url })),
                Some(timeout + NAVIGATION_SLACK),
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_timeout() => Err(ProbeError::Timeout {
                what: format!("page load of {}", url),
                after: timeout,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<(), ProbeError> {
        self.wait_for(locator, timeout, false).await.map(|_| ())
    }

    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), ProbeError> {
        let id = self.wait_for(locator, timeout, true).await?;

        // Script click, so overlays sitting on top of the control do not intercept it.
        self.client
            .command(
                Method::POST,
                &self.path("/execute/sync"),
                Some(json!({
                    "script": "arguments[0].click();",
                    "args": [element_arg(&id)]
                })),
                None,
            )
            .await?;

        debug!("Clicked {}", locator);
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ProbeError> {
        let value = self
            .client
            .command(Method::GET, &self.path("/screenshot"), None, None)
            .await?;

        let encoded = value
            .as_str()
            .ok_or_else(|| ProbeError::Fault("Screenshot response was not a string".to_string()))?;

        STANDARD
            .decode(encoded)
            .map_err(|e| ProbeError::Fault(format!("Screenshot was not valid base64: {}", e)))
    }

    async fn close(self: Box<Self>) -> Result<(), ProbeError> {
        self.closed.store(true, Ordering::SeqCst);
        self.client
            .command(Method::DELETE, &self.path(""), None, None)
            .await?;
        debug!("Browser session {} closed", self.session_id);
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(
                "Browser session {} dropped outside a runtime and was not deleted",
                self.session_id
            );
            return;
        };

        let client = self.client.clone();
        let path = self.path("");
        handle.spawn(async move {
            let _: Result<Value, _> = client.command(Method::DELETE, &path, None, None).await;
        });
    }
}
