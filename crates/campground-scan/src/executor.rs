use std::sync::Arc;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::classifier::AvailabilityCheck;
use crate::config::MonitorConfig;
use crate::notification_service::{NotificationEvent, NotificationService};
use crate::scan_types::*;

/// The monitor loop: runs one cycle at a time, tracks failures, sends alerts
pub struct ScanExecutor<C: AvailabilityCheck> {
    classifier: C,
    notification_service: Arc<dyn NotificationService>,
    config: Arc<MonitorConfig>,

    /// Only state shared across cycles. Never touched by the classifier.
    state: MonitorState,
}

impl<C: AvailabilityCheck> ScanExecutor<C> {
    /// Create a loop driving `classifier` and reporting through `notification_service`
    pub fn new(
        classifier: C,
        notification_service: Arc<dyn NotificationService>,
        config: Arc<MonitorConfig>,
    ) -> Self {
        Self {
            classifier,
            notification_service,
            config,
            state: MonitorState::default(),
        }
    }

    /// Current failure state
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Run cycles until the failure ceiling is hit or `shutdown` is cancelled.
    ///
    /// Cancellation is only observed between cycles. A cycle in flight,
    /// including its notification, always completes first.
    pub async fn run(&mut self, shutdown: CancellationToken) -> StopReason {
        info!("--- Starting Campsite Availability Checker ---");

        loop {
            if shutdown.is_cancelled() {
                info!("--- Script stopped by user. ---");
                return StopReason::Cancelled;
            }

            if let CycleStep::FatalStop { failures } = self.run_cycle().await {
                return StopReason::FatalStop { failures };
            }

            info!(
                "--- Waiting for {} seconds before the next check...",
                self.config.poll_interval.as_secs()
            );
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("--- Script stopped by user. ---");
                    return StopReason::Cancelled;
                }
                _ = sleep(self.config.poll_interval) => {}
            }
        }
    }

    /// Run exactly one cycle, without the trailing sleep
    pub async fn run_cycle(&mut self) -> CycleStep {
        info!("Checking campsite availability...");
        let outcome = self.classifier.run_probe_cycle().await;
        info!("Check finished: {}", outcome);

        let max_failures = self.config.max_consecutive_failures;
        let failures = self.state.record(outcome);

        if outcome.is_failure() {
            warn!("!!! Failure count: {}/{}", failures, max_failures);

            if self.state.ceiling_reached(max_failures) {
                error!(
                    "!!! Reached {} consecutive failures. Stopping script.",
                    max_failures
                );
                self.notify(NotificationEvent::monitor_stopped(failures))
                    .await;
                return CycleStep::FatalStop { failures };
            }
        }

        if outcome == CycleOutcome::Found {
            self.notify(NotificationEvent::site_available(
                self.config.target_url.as_deref(),
            ))
            .await;
        }

        CycleStep::Continue {
            outcome,
            consecutive_failures: failures,
        }
    }

    /// Single delivery attempt. Failures are logged and otherwise ignored.
    async fn notify(&self, event: NotificationEvent) {
        if let Err(e) = self.notification_service.send_notification(&event).await {
            error!("Failed to send notification '{}': {}", event.title, e);
        }
    }
}
