//! Blocking HTTP access to module proxies
//!
//! One GET per lookup, bounded by the configured timeout. 404 and 410 are
//! how a proxy says it has never seen a module, so they map to
//! `ModuleNotFound`; any other failure status is a network error.

use crate::error::RegistryError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

/// Timeout used when `--timeout` is not given
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("gomodup/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client for proxy lookups
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

/// Map a response status to the lookup outcome
fn check_status(status: StatusCode, module: &str, registry: &str) -> Result<(), RegistryError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND | StatusCode::GONE => {
            Err(RegistryError::module_not_found(module, registry))
        }
        s => Err(RegistryError::network_error(module, registry, format!("HTTP {}", s))),
    }
}

impl HttpClient {
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, USER_AGENT)
    }

    /// Build a client with an explicit timeout and User-Agent
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error("", "module proxy", format!("cannot build HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout })
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RegistryError> {
        Self::with_config(timeout, USER_AGENT)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the body; `module` and `registry` label errors
    pub fn get_text(&self, url: &str, module: &str, registry: &str) -> Result<String, RegistryError> {
        let response = self.client.get(url).send().map_err(|e| match e.is_timeout() {
            true => RegistryError::timeout(module, registry),
            false => RegistryError::network_error(module, registry, e.to_string()),
        })?;

        check_status(response.status(), module, registry)?;

        response
            .text()
            .map_err(|e| RegistryError::invalid_response(module, registry, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_timeouts() {
        assert_eq!(HttpClient::new().unwrap().timeout(), DEFAULT_TIMEOUT);
        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_custom_user_agent() {
        assert!(HttpClient::with_config(Duration::from_secs(60), "bot/1.0").is_ok());
        assert!(USER_AGENT.starts_with("gomodup/"));
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK, "m", "proxy").is_ok());

        for status in [StatusCode::NOT_FOUND, StatusCode::GONE] {
            let err = check_status(status, "example.com/mod/v3", "proxy").unwrap_err();
            assert!(err.is_not_found());
        }

        let err = check_status(StatusCode::BAD_GATEWAY, "m", "proxy").unwrap_err();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("502"));
    }
}
