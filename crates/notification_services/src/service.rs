use std::time::Duration;

use async_trait::async_trait;
use campground_scan::{
    NotificationError, NotificationEvent, NotificationService, PushoverCredentials,
};
use reqwest::Client;

use crate::types::{PUSHOVER_API_URL, PushoverMessage};

/// Request timeout for a single delivery attempt.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification service that pushes messages to a phone through Pushover.
#[derive(Debug, Clone)]
pub struct PushoverNotifier {
    client: Client,
    credentials: Option<PushoverCredentials>,
    api_url: String,
}

impl PushoverNotifier {
    /// Creates a notifier. Without credentials every send is a logged no-op.
    pub fn new(credentials: Option<PushoverCredentials>) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| {
                NotificationError::Transport(format!("Failed to create HTTP client: {}", e))
            })?;

        if credentials.is_none() {
            log::warn!("🔕 Pushover credentials are not set. Notifications are disabled.");
        }

        Ok(Self {
            client,
            credentials,
            api_url: PUSHOVER_API_URL.to_string(),
        })
    }

    /// Whether messages will actually be delivered.
    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl NotificationService for PushoverNotifier {
    async fn send_notification(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
        let Some(credentials) = self.credentials.as_ref() else {
            log::info!(
                "Pushover credentials are not set. Skipping notification: {}",
                event.title
            );
            return Ok(());
        };

        let form = PushoverMessage::new(credentials, event);

        let response = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        log::info!("📲 Notification sent successfully: {}", event.title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;

    fn credentials() -> PushoverCredentials {
        PushoverCredentials {
            api_token: "app-token".to_string(),
            user_key: "user-key".to_string(),
        }
    }

    fn notifier_for(server_url: &str) -> PushoverNotifier {
        let mut notifier = PushoverNotifier::new(Some(credentials())).unwrap();
        notifier.api_url = format!("{}/1/messages.json", server_url);
        notifier
    }

    #[tokio::test]
    async fn test_book_now_alert_is_posted_as_a_form() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/1/messages.json")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("token".into(), "app-token".into()),
                Matcher::UrlEncoded("user".into(), "user-key".into()),
                Matcher::UrlEncoded(
                    "message".into(),
                    "A site may be available for your selected dates! Go book it now!".into(),
                ),
                Matcher::UrlEncoded("title".into(), "Campsite Available!".into()),
                Matcher::UrlEncoded("priority".into(), "1".into()),
                Matcher::UrlEncoded("url".into(), "https://example.com/camp".into()),
                Matcher::UrlEncoded("url_title".into(), "Book Now!".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"status":1,"request":"abc"}"#)
            .expect(1)
            .create_async()
            .await;

        let notifier = notifier_for(&server.url());

        let result = notifier
            .send_notification(&NotificationEvent::site_available(Some(
                "https://example.com/camp",
            )))
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_message_is_sent_once() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/1/messages.json")
            .with_status(400)
            .with_body(r#"{"user":"invalid","status":0}"#)
            .expect(1)
            .create_async()
            .await;

        let notifier = notifier_for(&server.url());

        let result = notifier
            .send_notification(&NotificationEvent::monitor_stopped(3))
            .await;

        match result {
            Err(NotificationError::Rejected { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("invalid"));
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_credentials_is_a_silent_no_op() {
        let mut notifier = PushoverNotifier::new(None).unwrap();
        // Nothing listens here, so an attempted request would come back as an error.
        notifier.api_url = "http://127.0.0.1:9/1/messages.json".to_string();

        let result = notifier
            .send_notification(&NotificationEvent::monitor_stopped(3))
            .await;

        assert!(!notifier.is_enabled());
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_not_raised() {
        let mut notifier = PushoverNotifier::new(Some(PushoverCredentials {
            api_token: "token".to_string(),
            user_key: "user".to_string(),
        }))
        .unwrap();
        notifier.api_url = "http://127.0.0.1:9/1/messages.json".to_string();

        let result = notifier
            .send_notification(&NotificationEvent::site_available(None))
            .await;

        assert!(matches!(result, Err(NotificationError::Transport(_))));
    }
}
