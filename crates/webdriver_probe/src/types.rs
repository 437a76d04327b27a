use campground_scan::{BrowserConfig, Locator, LocatorStrategy, ProbeError};
use serde::Deserialize;
use serde_json::{Value, json};

/// Key under which W3C WebDriver returns element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Envelope around every WebDriver response body
#[derive(Debug, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub value: Value,
}

/// Error payload inside [`WireResponse::value`]
#[derive(Debug, Deserialize)]
pub struct WireError {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Payload of a successful New Session command
#[derive(Debug, Deserialize)]
pub struct NewSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Errors raised while talking to the WebDriver server
#[derive(thiserror::Error, Debug)]
pub enum WebDriverError {
    /// The server rejected a command
    #[error("WebDriver error `{code}`: {message}")]
    Command {
        /// W3C error code, e.g. `no such element`
        code: String,
        /// Human-readable detail from the driver
        message: String,
    },

    /// The HTTP request did not complete in time
    #[error("WebDriver request timed out: {0}")]
    RequestTimeout(String),

    /// Connection or transport failure
    #[error("WebDriver transport error: {0}")]
    Transport(String),

    /// The server answered with something we cannot read
    #[error("Unexpected WebDriver response: {0}")]
    Protocol(String),
}

impl WebDriverError {
    /// Element lookups that fail this way are retried until the wait window closes
    pub fn is_missing_element(&self) -> bool {
        matches!(
            self,
            WebDriverError::Command { code, .. }
                if code == "no such element" || code == "stale element reference"
        )
    }

    /// The browser gave up waiting, e.g. on a page load
    pub fn is_timeout(&self) -> bool {
        match self {
            WebDriverError::Command { code, .. } => code == "timeout" || code == "script timeout",
            WebDriverError::RequestTimeout(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for WebDriverError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WebDriverError::RequestTimeout(e.to_string())
        } else if e.is_decode() {
            WebDriverError::Protocol(e.to_string())
        } else {
            WebDriverError::Transport(e.to_string())
        }
    }
}

impl From<WebDriverError> for ProbeError {
    fn from(e: WebDriverError) -> Self {
        ProbeError::Fault(e.to_string())
    }
}

/// New Session request for Chrome built from the browser settings
pub fn chrome_capabilities(browser: &BrowserConfig) -> Value {
    let (width, height) = browser.viewport;
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        format!("--window-size={},{}", width, height),
        format!("--user-agent={}", browser.user_agent),
    ];
    if browser.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }

    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "pageLoadStrategy": "eager",
                "goog:chromeOptions": { "args": args }
            }
        }
    })
}

/// Find Element request body for a locator
pub fn locator_body(locator: &Locator) -> Value {
    let using = match locator.strategy {
        LocatorStrategy::Css => "css selector",
        LocatorStrategy::XPath => "xpath",
    };
    json!({ "using": using, "value": locator.selector })
}

/// Pull the element id out of a Find Element response value
pub fn element_id(value: &Value) -> Result<String, WebDriverError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WebDriverError::Protocol(format!("missing element reference in {}", value)))
}

/// Element reference as a script argument
pub fn element_arg(element_id: &str) -> Value {
    json!({ ELEMENT_KEY: element_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_capabilities() {
        let caps = chrome_capabilities(&BrowserConfig::default());
        let always = &caps["capabilities"]["alwaysMatch"];
        let args: Vec<&str> = always["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();

        assert_eq!(always["browserName"], "chrome");
        assert_eq!(always["pageLoadStrategy"], "eager");
        assert!(args.contains(&"--headless=new"));
        assert!(args.contains(&"--no-sandbox"));
        assert!(args.contains(&"--window-size=1920,1080"));
        assert!(args.iter().any(|a| a.starts_with("--user-agent=Mozilla/5.0")));
    }

    #[test]
    fn test_headed_capabilities_omit_headless_flags() {
        let browser = BrowserConfig {
            headless: false,
            ..BrowserConfig::default()
        };
        let caps = chrome_capabilities(&browser);
        let args = caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap();

        assert!(!args.iter().any(|a| a == "--headless=new"));
        assert!(!args.iter().any(|a| a == "--disable-gpu"));
    }

    #[test]
    fn test_locator_body() {
        assert_eq!(
            locator_body(&Locator::css("#list-view-button-button")),
            json!({ "using": "css selector", "value": "#list-view-button-button" })
        );
        assert_eq!(
            locator_body(&Locator::xpath("//h2")),
            json!({ "using": "xpath", "value": "//h2" })
        );
    }

    #[test]
    fn test_element_id() {
        let value = json!({ ELEMENT_KEY: "abc-123" });
        assert_eq!(element_id(&value).unwrap(), "abc-123");
        assert!(element_id(&json!({})).is_err());
    }

    #[test]
    fn test_error_classification() {
        let missing = WebDriverError::Command {
            code: "no such element".to_string(),
            message: String::new(),
        };
        let timeout = WebDriverError::Command {
            code: "timeout".to_string(),
            message: String::new(),
        };
        let crashed = WebDriverError::Command {
            code: "invalid session id".to_string(),
            message: String::new(),
        };

        assert!(missing.is_missing_element());
        assert!(!missing.is_timeout());
        assert!(timeout.is_timeout());
        assert!(!crashed.is_missing_element());
        assert!(!crashed.is_timeout());
    }
}
