use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::probe::{ProbeError, ProbeSession, SiteProbe};
use crate::scan_types::CycleOutcome;

/// One probe-and-classify pass. The monitor loop only sees this seam.
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    /// Run one cycle. Never fails: every problem is reported as [`CycleOutcome::Failed`].
    async fn run_probe_cycle(&self) -> CycleOutcome;
}

/// Turns a single browser probe into a [`CycleOutcome`]
pub struct AvailabilityClassifier {
    config: Arc<MonitorConfig>,
    probe: Arc<dyn SiteProbe>,
}

impl AvailabilityClassifier {
    /// Create a classifier driving `probe` against the configured page
    pub fn new(config: Arc<MonitorConfig>, probe: Arc<dyn SiteProbe>) -> Self {
        Self { config, probe }
    }

    /// Walk the page up to the marker check.
    ///
    /// Errors before the marker step are failures. At the marker step an
    /// elapsed wait means the marker is absent, which reads as availability.
    async fn inspect_page(
        &self,
        session: &dyn ProbeSession,
        url: &str,
    ) -> Result<CycleOutcome, ProbeError> {
        let timeouts = &self.config.timeouts;
        let locators = &self.config.locators;

        info!("Navigating to reservation page...");
        session.navigate(url, timeouts.navigation).await?;

        info!("Waiting for page content to load by verifying date fields are visible...");
        for (index, anchor) in locators.anchors.iter().enumerate() {
            let timeout = if index == 0 {
                timeouts.first_anchor
            } else {
                timeouts.further_anchor
            };
            debug!("Waiting for anchor {}", anchor);
            session.wait_visible(anchor, timeout).await?;
        }
        info!("Dates verified successfully.");

        info!("Switching to List View...");
        session
            .click(&locators.list_view_button, timeouts.list_view)
            .await?;

        info!("Checking for 'No Available Sites' message...");
        match session
            .wait_visible(&locators.no_sites_marker, timeouts.marker)
            .await
        {
            Ok(()) => {
                info!("No sites available. Will check again later.");
                Ok(CycleOutcome::NotFound)
            }
            Err(e) if e.is_timeout() => {
                info!("SITES FOUND! The 'No Available Sites' message was not found.");
                Ok(CycleOutcome::Found)
            }
            Err(e) => Err(e),
        }
    }

    /// Write a page capture for post-mortem inspection, replacing the previous one
    async fn capture_diagnostics(&self, session: &dyn ProbeSession) {
        let path = &self.config.screenshot_path;

        let png = match session.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                warn!("Could not capture page screenshot: {}", e);
                return;
            }
        };

        match tokio::fs::write(path, png).await {
            Ok(()) => info!("Saved page screenshot to {}", path.display()),
            Err(e) => warn!("Could not write screenshot to {}: {}", path.display(), e),
        }
    }
}

#[async_trait]
impl AvailabilityCheck for AvailabilityClassifier {
    async fn run_probe_cycle(&self) -> CycleOutcome {
        let Some(url) = self.config.target_url.as_deref() else {
            error!("TARGET_URL is not set. Cannot proceed.");
            return CycleOutcome::Failed;
        };

        info!("Launching browser...");
        let session = match self.probe.open_session().await {
            Ok(session) => session,
            Err(e) => {
                error!("Could not start a browser session: {}", e);
                return CycleOutcome::Failed;
            }
        };

        let outcome = match self.inspect_page(session.as_ref(), url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_timeout() {
                    error!(
                        "A timeout occurred. The page or a key element did not load in time: {}",
                        e
                    );
                } else {
                    error!("An unexpected error occurred: {}", e);
                }
                self.capture_diagnostics(session.as_ref()).await;
                CycleOutcome::Failed
            }
        };

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        outcome
    }
}
