//! Foreground campsite checker.
//! Runs the availability monitor until it is interrupted or stops on sustained failure.

use std::process::ExitCode;

use campground_scan::StopReason;
use tokio_util::sync::CancellationToken;
use web_server::{build_executor, init_environment, shutdown_signal};

#[tokio::main]
async fn main() -> ExitCode {
    let config = init_environment();

    let mut executor = match build_executor(&config) {
        Ok(executor) => executor,
        Err(e) => {
            log::error!("❌ Failed to start availability monitor: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("To stop, press Ctrl+C");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        log::info!("Stop requested, finishing the current check first...");
        signal_token.cancel();
    });

    match executor.run(shutdown).await {
        StopReason::Cancelled => ExitCode::SUCCESS,
        StopReason::FatalStop { failures } => {
            log::error!(
                "🛑 Campsite checker stopped after {} consecutive failed checks",
                failures
            );
            ExitCode::FAILURE
        }
    }
}
