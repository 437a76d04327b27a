use async_trait::async_trait;

/// Link attached to a notification so the user can jump straight to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    /// Destination URL
    pub url: String,
    /// Label shown for the link
    pub title: String,
}

/// A message built by the monitor loop at the moment of a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    /// Body text
    pub message: String,
    /// Notification title
    pub title: String,
    /// Optional link to the reservation page
    pub link: Option<DeepLink>,
}

impl NotificationEvent {
    /// "Book now" alert for a cycle that found possible availability
    pub fn site_available(target_url: Option<&str>) -> Self {
        Self {
            message: "A site may be available for your selected dates! Go book it now!"
                .to_string(),
            title: "Campsite Available!".to_string(),
            link: target_url.map(|url| DeepLink {
                url: url.to_string(),
                title: "Book Now!".to_string(),
            }),
        }
    }

    /// Terminal alert sent once before a fatal stop
    pub fn monitor_stopped(failures: u32) -> Self {
        Self {
            message: format!(
                "Campsite script stopped after {} failed attempts to access the website.",
                failures
            ),
            title: "Campsite Script Error".to_string(),
            link: None,
        }
    }
}

/// Sink for user-facing notifications. Delivery is best effort.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Make a single delivery attempt for `event`
    async fn send_notification(&self, event: &NotificationEvent) -> Result<(), NotificationError>;
}

/// Errors reported by a notification sink
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// The request never got a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The push service answered with a non-success status
    #[error("Push service rejected the message with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
}
