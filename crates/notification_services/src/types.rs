use campground_scan::{NotificationEvent, PushoverCredentials};
use serde::Serialize;

/// Pushover messages endpoint.
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// High priority: bypasses the recipient's quiet hours.
pub const HIGH_PRIORITY: i8 = 1;

/// Form body posted to the Pushover messages API.
#[derive(Debug, Serialize)]
pub struct PushoverMessage<'a> {
    /// Application API token
    pub token: &'a str,
    /// Recipient user key
    pub user: &'a str,
    /// Body text
    pub message: &'a str,
    /// Title line
    pub title: &'a str,
    /// Message priority
    pub priority: i8,
    /// Supplementary URL, sent only for "book now" alerts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    /// Label for the supplementary URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_title: Option<&'a str>,
}

impl<'a> PushoverMessage<'a> {
    /// Builds the form fields for `event`.
    pub fn new(credentials: &'a PushoverCredentials, event: &'a NotificationEvent) -> Self {
        Self {
            token: &credentials.api_token,
            user: &credentials.user_key,
            message: &event.message,
            title: &event.title,
            priority: HIGH_PRIORITY,
            url: event.link.as_ref().map(|link| link.url.as_str()),
            url_title: event.link.as_ref().map(|link| link.title.as_str()),
        }
    }
}
