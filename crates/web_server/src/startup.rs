use std::sync::Arc;

use anyhow::Context;
use campground_scan::{AvailabilityClassifier, MonitorConfig, ScanExecutor};
use notification_services::PushoverNotifier;
use webdriver_probe::WebDriverProbe;

/// Port used by the health service when `PORT` is not set
pub const DEFAULT_PORT: u16 = 8080;

/// Load `.env`, start the logger and read the configuration once
pub fn init_environment() -> Arc<MonitorConfig> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = MonitorConfig::from_env();
    log_config_summary(&config);
    Arc::new(config)
}

fn log_config_summary(config: &MonitorConfig) {
    match config.target_url.as_deref() {
        Some(url) => log::info!("🎯 Target page: {}", url),
        None => log::error!("❌ TARGET_URL is not set. Every check will fail until it is."),
    }

    if config.pushover.is_some() {
        log::info!("📲 Pushover notifications enabled");
    }

    log::info!(
        "🧭 WebDriver at {} (headless: {})",
        config.browser.webdriver_url,
        config.browser.headless
    );
    log::info!(
        "⏱️ Checking every {} seconds, stopping after {} consecutive failures",
        config.poll_interval.as_secs(),
        config.max_consecutive_failures
    );
}

/// Wire the WebDriver probe, classifier and Pushover notifier into a monitor loop
pub fn build_executor(
    config: &Arc<MonitorConfig>,
) -> anyhow::Result<ScanExecutor<AvailabilityClassifier>> {
    let probe = WebDriverProbe::new(&config.browser).context("creating WebDriver probe")?;
    let classifier = AvailabilityClassifier::new(config.clone(), Arc::new(probe));

    let notifier =
        PushoverNotifier::new(config.pushover.clone()).context("creating Pushover notifier")?;

    Ok(ScanExecutor::new(classifier, Arc::new(notifier), config.clone()))
}

/// Port for the health service, from `PORT`
pub fn server_port() -> u16 {
    parse_port(std::env::var("PORT").ok().as_deref())
}

fn parse_port(value: Option<&str>) -> u16 {
    match value.map(str::trim) {
        None | Some("") => DEFAULT_PORT,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Invalid PORT value '{}', using {}", raw, DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::warn!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("SIGINT (Ctrl+C) received"),
        _ = terminate => log::info!("SIGTERM received"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None), DEFAULT_PORT);
        assert_eq!(parse_port(Some("")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("10000")), 10000);
        assert_eq!(parse_port(Some("not-a-port")), DEFAULT_PORT);
    }

    #[tokio::test]
    async fn test_build_executor_without_credentials() {
        let config = Arc::new(MonitorConfig::default());

        let executor = build_executor(&config).unwrap();

        assert_eq!(executor.state().consecutive_failures, 0);
    }
}
