//! Client configuration, assembled by the binary from flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_LOG_FILE: &str = "quiz-console.log";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the question-bank service; endpoint paths are appended to it.
    pub base_url: Url,
    /// Forwarded verbatim as the `Cookie` header.
    pub session_cookie: Option<String>,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn new(
        base_url: &str,
        session_cookie: Option<String>,
        timeout_secs: u64,
        log_file: PathBuf,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::Config(format!("base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base url '{}' cannot carry paths",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            session_cookie: session_cookie.filter(|c| !c.trim().is_empty()),
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_relative_base_url() {
        let err = ClientConfig::new("quiz.local", None, 5, PathBuf::from("x.log")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_blank_cookie_is_dropped() {
        let config =
            ClientConfig::new("http://quiz.local:8080/", Some("  ".into()), 0, PathBuf::from("x.log"))
                .unwrap();
        assert_eq!(config.session_cookie, None);
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.base_url.as_str(), "http://quiz.local:8080/");
    }
}
