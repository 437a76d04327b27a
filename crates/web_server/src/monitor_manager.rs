use campground_scan::{AvailabilityCheck, ScanExecutor, StopReason};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Manager for the availability monitor.
/// Runs exactly one monitor loop as a background task next to the web server.
pub struct MonitorManager {
    shutdown: CancellationToken,
    monitor_handle: Option<JoinHandle<StopReason>>,
}

impl MonitorManager {
    /// Create a manager with no monitor running
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            monitor_handle: None,
        }
    }

    /// Start the monitor loop in a background task.
    ///
    /// Returns `false` without spawning anything if a loop is already running.
    pub fn start<C>(&mut self, mut executor: ScanExecutor<C>) -> bool
    where
        C: AvailabilityCheck + 'static,
    {
        if self.is_running() {
            log::warn!("Availability monitor is already running");
            return false;
        }

        log::info!("🏕️ Starting availability monitor");

        let shutdown = self.shutdown.clone();
        let handle = tokio::spawn(async move {
            let reason = executor.run(shutdown).await;
            match reason {
                StopReason::FatalStop { failures } => log::error!(
                    "🛑 Availability monitor stopped after {} consecutive failures",
                    failures
                ),
                StopReason::Cancelled => log::info!("Availability monitor stopped"),
            }
            reason
        });

        self.monitor_handle = Some(handle);
        true
    }

    /// Whether the background loop is still going
    pub fn is_running(&self) -> bool {
        self.monitor_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Ask the loop to stop at its next cycle boundary and wait for it
    pub async fn stop(&mut self) -> Option<StopReason> {
        let handle = self.monitor_handle.take()?;

        log::info!("Stopping availability monitor, waiting for the current check to finish");
        self.shutdown.cancel();
        let result = handle.await;
        self.shutdown = CancellationToken::new();

        match result {
            Ok(reason) => Some(reason),
            Err(e) => {
                log::error!("❌ Availability monitor task failed: {}", e);
                None
            }
        }
    }
}

impl Drop for MonitorManager {
    fn drop(&mut self) {
        if let Some(handle) = self.monitor_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use campground_scan::{
        CycleOutcome, MonitorConfig, NotificationError, NotificationEvent, NotificationService,
    };

    use super::*;

    struct AlwaysNotFound;

    #[async_trait]
    impl AvailabilityCheck for AlwaysNotFound {
        async fn run_probe_cycle(&self) -> CycleOutcome {
            CycleOutcome::NotFound
        }
    }

    struct AlwaysFailed;

    #[async_trait]
    impl AvailabilityCheck for AlwaysFailed {
        async fn run_probe_cycle(&self) -> CycleOutcome {
            CycleOutcome::Failed
        }
    }

    struct MockNotificationService;

    #[async_trait]
    impl NotificationService for MockNotificationService {
        async fn send_notification(
            &self,
            _event: &NotificationEvent,
        ) -> Result<(), NotificationError> {
            Ok(())
        }
    }

    fn executor<C: AvailabilityCheck>(check: C) -> ScanExecutor<C> {
        let config = Arc::new(MonitorConfig {
            poll_interval: Duration::from_millis(10),
            ..MonitorConfig::default()
        });
        ScanExecutor::new(check, Arc::new(MockNotificationService), config)
    }

    #[tokio::test]
    async fn test_stop_cancels_running_monitor() {
        let mut manager = MonitorManager::new();

        assert!(manager.start(executor(AlwaysNotFound)));
        assert!(manager.is_running());

        assert_eq!(manager.stop().await, Some(StopReason::Cancelled));
        assert!(!manager.is_running());
    }

    #[tokio::test]
    async fn test_only_one_monitor_runs() {
        let mut manager = MonitorManager::new();

        assert!(manager.start(executor(AlwaysNotFound)));
        assert!(!manager.start(executor(AlwaysNotFound)));

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_fatal_stop_is_reported() {
        let mut manager = MonitorManager::new();
        manager.start(executor(AlwaysFailed));
        while manager.is_running() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(
            manager.stop().await,
            Some(StopReason::FatalStop { failures: 3 })
        );
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let mut manager = MonitorManager::new();
        assert_eq!(manager.stop().await, None);
    }
}
