//! # Submission Configuration
//!
//! Where finished forms are sent. The destination is set once when the
//! host starts and handed to the submission step explicitly.

use serde::Serialize;

use crate::errors::{LabError, LabResult};

/// Placeholder destination shipped with the form; replace before real use.
pub const DEFAULT_WEBHOOK_URL: &str = "https://hook.us1.make.com/your-make-webhook-url";

/// Environment variable that overrides the webhook destination
pub const WEBHOOK_URL_ENV: &str = "BREAKSHEET_WEBHOOK_URL";

/// Webhook destination for submitted forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookConfig {
    url: String,
}

impl WebhookConfig {
    /// Validate and wrap a webhook URL.
    ///
    /// ```rust
    /// use lab_core::config::WebhookConfig;
    ///
    /// assert!(WebhookConfig::new("https://hooks.example.com/lab").is_ok());
    /// assert!(WebhookConfig::new("").is_err());
    /// assert!(WebhookConfig::new("ftp://example.com").is_err());
    /// ```
    pub fn new(url: impl Into<String>) -> LabResult<Self> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(LabError::invalid_config("webhook_url", "URL is empty"));
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| LabError::invalid_config("webhook_url", format!("'{}' is not an http(s) URL", url)))?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(LabError::invalid_config("webhook_url", format!("'{}' has no host", url)));
        }

        Ok(WebhookConfig { url })
    }

    /// Destination URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// True while the shipped placeholder is still configured
    pub fn is_placeholder(&self) -> bool {
        self.url == DEFAULT_WEBHOOK_URL
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        WebhookConfig {
            url: DEFAULT_WEBHOOK_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(WebhookConfig::new("http://localhost:8080/hook").unwrap().url(), "http://localhost:8080/hook");
        assert_eq!(WebhookConfig::new("  https://example.com/x ").unwrap().url(), "https://example.com/x");
    }

    #[test]
    fn test_rejects_bad_urls() {
        for url in ["", "   ", "example.com/hook", "mailto:lab@example.com", "https://", "https:///path"] {
            let err = WebhookConfig::new(url).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_CONFIG", "url {:?}", url);
        }
    }

    #[test]
    fn test_default_is_placeholder() {
        let config = WebhookConfig::default();
        assert!(config.is_placeholder());
        assert!(WebhookConfig::new(DEFAULT_WEBHOOK_URL).is_ok());
        assert!(!WebhookConfig::new("https://example.com/x").unwrap().is_placeholder());
    }
}
