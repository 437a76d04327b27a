use actix_web::{HttpResponse, web};

/// Static liveness response, independent of any check outcome
pub async fn health_status() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "running",
        "message": "Campsite availability checker is running"
    }))
}

/// Register `GET`/`HEAD` on `/` and `/health`
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health_status))
        .route("/", web::head().to(health_status))
        .route("/health", web::get().to(health_status))
        .route("/health", web::head().to(health_status));
}

#[cfg(test)]
mod tests {
    use actix_web::http::{Method, StatusCode};
    use actix_web::{App, test};

    use super::*;

    #[actix_web::test]
    async fn test_root_reports_running() {
        let app = test::init_service(App::new().configure(configure_health_routes)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "running");
    }

    #[actix_web::test]
    async fn test_head_health() {
        let app = test::init_service(App::new().configure(configure_health_routes)).await;

        let req = test::TestRequest::default()
            .method(Method::HEAD)
            .uri("/health")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_other_methods_are_not_routed() {
        let app = test::init_service(App::new().configure(configure_health_routes)).await;

        let req = test::TestRequest::post().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_client_error());
    }
}
