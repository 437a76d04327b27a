//! Health-check service for the campsite checker.
//! Runs the availability monitor as one background task and answers liveness probes.

use actix_web::{App, HttpServer, middleware::Logger};
use web_server::*;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = init_environment();

    log::info!("🚀 Starting campsite checker service...");

    let mut monitor_manager = MonitorManager::new();
    match build_executor(&config) {
        Ok(executor) => {
            monitor_manager.start(executor);
        }
        Err(e) => {
            log::error!("❌ Failed to start availability monitor: {:#}", e);
            log::warn!("🔧 Health endpoint will still be served");
        }
    }

    let port = server_port();
    log::info!("🌐 Health check available at: http://0.0.0.0:{}/health", port);

    let result = HttpServer::new(|| {
        App::new()
            .wrap(Logger::default())
            .configure(configure_health_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await;

    monitor_manager.stop().await;
    result
}
