//! Go module proxy repository
//!
//! Lists module versions through the GOPROXY protocol:
//! - List versions: {proxy}/{escaped module}/@v/list
//!
//! The proxy answers in no particular order, so versions are sorted
//! ascending before they are handed to the selector.

use super::{HttpClient, VersionRepository};
use crate::domain::version::compare_versions;
use crate::error::{ConfigError, RegistryError};

/// Default GOPROXY value
pub const DEFAULT_GOPROXY: &str = "https://proxy.golang.org";

/// Pick the proxy URL to query from a GOPROXY list
///
/// Entries are separated by `,` or `|`. `direct` is skipped since fetching
/// from version control is not supported; `off` stops the search.
pub fn select_proxy(goproxy: &str) -> Result<String, ConfigError> {
    for entry in goproxy.split([',', '|']).map(str::trim) {
        if entry == "off" {
            break;
        }
        if entry.starts_with("https://") || entry.starts_with("http://") {
            return Ok(entry.trim_end_matches('/').to_string());
        }
    }
    Err(ConfigError::NoUsableProxy {
        value: goproxy.to_string(),
    })
}

/// Escape a module path for proxy URLs (uppercase letters become `!lowercase`)
pub fn escape_module_path(module: &str) -> String {
    let mut escaped = String::with_capacity(module.len() + 4);
    for ch in module.chars() {
        if ch.is_uppercase() {
            escaped.push('!');
            for lower in ch.to_lowercase() {
                escaped.push(lower);
            }
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

/// Parse a `@v/list` body into ascending versions
fn parse_version_list(body: &str) -> Vec<String> {
    let mut versions: Vec<String> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    versions.sort_by(|a, b| compare_versions(a, b));
    versions.dedup();
    versions
}

/// Version repository backed by a Go module proxy
pub struct GoProxyRepository {
    client: HttpClient,
    base_url: String,
}

impl GoProxyRepository {
    /// Create a repository for the given proxy base URL
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a repository from a GOPROXY list
    pub fn from_goproxy(client: HttpClient, goproxy: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(client, select_proxy(goproxy)?))
    }

    /// The proxy base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for listing versions
    fn build_list_url(&self, module: &str) -> String {
        format!("{}/{}/@v/list", self.base_url, escape_module_path(module))
    }
}

impl VersionRepository for GoProxyRepository {
    fn registry_name(&self) -> &str {
        &self.base_url
    }

    fn versions(&self, module: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_list_url(module);
        let body = self.client.get_text(&url, module, &self.base_url)?;
        Ok(parse_version_list(&body))
    }
}
