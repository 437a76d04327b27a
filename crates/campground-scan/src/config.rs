use std::path::PathBuf;
use std::time::Duration;

use crate::probe::Locator;

/// Default WebDriver endpoint (a local chromedriver)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Default location of the page capture written on probe failures
pub const DEFAULT_SCREENSHOT_PATH: &str = "error_screenshot.png";

/// Pushover application token and user key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushoverCredentials {
    /// Application API token
    pub api_token: String,
    /// Recipient user key
    pub user_key: String,
}

/// Bounded waits used by a single probe cycle
#[derive(Debug, Clone)]
pub struct ProbeTimeouts {
    /// Page navigation (default: 90 seconds)
    pub navigation: Duration,

    /// First "page is real" anchor (default: 45 seconds)
    pub first_anchor: Duration,

    /// Each further anchor (default: 15 seconds)
    pub further_anchor: Duration,

    /// List view control (default: 15 seconds)
    pub list_view: Duration,

    /// "No sites available" marker (default: 10 seconds)
    pub marker: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(90),
            first_anchor: Duration::from_secs(45),
            further_anchor: Duration::from_secs(15),
            list_view: Duration::from_secs(15),
            marker: Duration::from_secs(10),
        }
    }
}

/// Elements the classifier looks for on the reservation page
#[derive(Debug, Clone)]
pub struct PageLocators {
    /// Elements that prove the real search page rendered
    pub anchors: Vec<Locator>,

    /// Control that switches results to list view
    pub list_view_button: Locator,

    /// Text shown when nothing can be booked
    pub no_sites_marker: Locator,
}

impl Default for PageLocators {
    fn default() -> Self {
        Self {
            anchors: vec![
                Locator::css("#arrival-date-field"),
                Locator::xpath("//label[contains(normalize-space(.), 'Departure')]"),
            ],
            list_view_button: Locator::css("#list-view-button-button"),
            no_sites_marker: Locator::xpath("//h2[contains(text(), 'No Available Sites')]"),
        }
    }
}

/// Browser settings handed to the probe backend
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// WebDriver server base URL
    pub webdriver_url: String,

    /// Run without a visible window (default: true)
    pub headless: bool,

    /// User agent presented to the site
    pub user_agent: String,

    /// Window size in pixels (default: 1920x1080)
    pub viewport: (u32, u32),
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36".to_string(),
            viewport: (1920, 1080),
        }
    }
}

/// Process-wide configuration, read once at startup and never mutated
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Reservation page to watch. Every cycle fails fast without it.
    pub target_url: Option<String>,

    /// Notification credentials. Without them notifications are skipped.
    pub pushover: Option<PushoverCredentials>,

    /// Pause between cycles (default: 5 seconds)
    pub poll_interval: Duration,

    /// Back-to-back failed cycles before the loop stops (default: 3)
    pub max_consecutive_failures: u32,

    /// Where the failure page capture is written
    pub screenshot_path: PathBuf,

    /// Browser session settings
    pub browser: BrowserConfig,

    /// Probe wait windows
    pub timeouts: ProbeTimeouts,

    /// Page elements the classifier depends on
    pub locators: PageLocators,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_url: None,
            pushover: None,
            poll_interval: Duration::from_secs(5),
            max_consecutive_failures: 3,
            screenshot_path: PathBuf::from(DEFAULT_SCREENSHOT_PATH),
            browser: BrowserConfig::default(),
            timeouts: ProbeTimeouts::default(),
            locators: PageLocators::default(),
        }
    }
}

impl MonitorConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let pushover = match (get("PUSHOVER_API_TOKEN"), get("PUSHOVER_USER_KEY")) {
            (Some(api_token), Some(user_key)) => Some(PushoverCredentials {
                api_token,
                user_key,
            }),
            _ => None,
        };

        let defaults = Self::default();

        Self {
            target_url: get("TARGET_URL"),
            pushover,
            screenshot_path: get("SCREENSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.screenshot_path),
            browser: BrowserConfig {
                webdriver_url: get("WEBDRIVER_URL").unwrap_or(defaults.browser.webdriver_url),
                ..defaults.browser
            },
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::from_lookup(|_| None);

        assert!(config.target_url.is_none());
        assert!(config.pushover.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_consecutive_failures, 3);
        assert!(config.browser.headless);
        assert_eq!(config.browser.webdriver_url, DEFAULT_WEBDRIVER_URL);
        assert_eq!(config.timeouts.marker, Duration::from_secs(10));
        assert_eq!(config.screenshot_path, PathBuf::from(DEFAULT_SCREENSHOT_PATH));
    }

    #[test]
    fn test_reads_environment_keys() {
        let config = MonitorConfig::from_lookup(lookup_from(&[
            ("TARGET_URL", "https://example.com/camping/campgrounds/123"),
            ("PUSHOVER_API_TOKEN", "token"),
            ("PUSHOVER_USER_KEY", "user"),
            ("WEBDRIVER_URL", "http://chromedriver:4444"),
            ("SCREENSHOT_PATH", "/tmp/capture.png"),
        ]));

        assert_eq!(
            config.target_url.as_deref(),
            Some("https://example.com/camping/campgrounds/123")
        );
        assert_eq!(
            config.pushover,
            Some(PushoverCredentials {
                api_token: "token".to_string(),
                user_key: "user".to_string(),
            })
        );
        assert_eq!(config.browser.webdriver_url, "http://chromedriver:4444");
        assert_eq!(config.screenshot_path, PathBuf::from("/tmp/capture.png"));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = MonitorConfig::from_lookup(lookup_from(&[
            ("TARGET_URL", "   "),
            ("PUSHOVER_API_TOKEN", "token"),
            ("PUSHOVER_USER_KEY", ""),
        ]));

        assert!(config.target_url.is_none());
        assert!(config.pushover.is_none());
    }
}
