//! Client configuration and endpoint handling.
//!
//! The endpoint is resolved once, when a client is built. A client never
//! changes its endpoint afterwards; build a new client instead.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Worker count of the async facades unless configured otherwise.
pub const DEFAULT_ASYNC_POOL_SIZE: usize = 10;

/// Region used when neither the config nor the endpoint names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Scheme used for endpoints given as a bare host name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Connection and behaviour settings shared by every service client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint override: a host name or a full URL.
    pub endpoint: Option<String>,
    /// Region used to build the default endpoint.
    pub region: Option<String>,
    /// Scheme for bare host-name endpoints.
    pub scheme: Scheme,
    /// Region to sign with when it cannot be derived from the endpoint host.
    pub signing_region: Option<String>,
    /// Suffix appended to the SDK user agent.
    pub user_agent_suffix: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_idle_connections_per_host: usize,
    /// Number of workers backing the async facades.
    pub async_pool_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: None,
            scheme: Scheme::Https,
            signing_region: None,
            user_agent_suffix: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_idle_connections_per_host: 10,
            async_pool_size: DEFAULT_ASYNC_POOL_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_async_pool_size(mut self, size: usize) -> Self {
        self.async_pool_size = size;
        self
    }

    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Reject settings no client can run with.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.async_pool_size == 0 {
            return Err(ClientError::Config(
                "async_pool_size must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ClientError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if let Some(ref endpoint) = self.endpoint {
            if endpoint.trim().is_empty() {
                return Err(ClientError::Config("endpoint must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Resolve the endpoint URL for a service.
    ///
    /// An explicit endpoint wins; otherwise the standard
    /// `{prefix}.{region}.amazonaws.com` pattern is used, and `default_host`
    /// when no region is configured.
    pub fn resolve_endpoint(&self, endpoint_prefix: &str, default_host: &str) -> Result<Url, ClientError> {
        let raw = match (&self.endpoint, &self.region) {
            (Some(endpoint), _) => endpoint.trim().to_string(),
            (None, Some(region)) => regional_host(endpoint_prefix, region),
            (None, None) => default_host.to_string(),
        };
        let full = if raw.contains("://") {
            raw
        } else {
            format!("{}://{}", self.scheme.as_str(), raw)
        };
        let url = Url::parse(&full)
            .map_err(|e| ClientError::Config(format!("invalid endpoint '{}': {}", full, e)))?;
        if url.host_str().is_none() {
            return Err(ClientError::Config(format!("endpoint '{}' has no host", full)));
        }
        Ok(url)
    }

    /// The region requests are signed for.
    pub fn resolve_signing_region(&self, endpoint: &Url, endpoint_prefix: &str) -> String {
        if let Some(ref region) = self.signing_region {
            return region.clone();
        }
        endpoint
            .host_str()
            .and_then(|host| parse_region_name(host, endpoint_prefix))
            .or_else(|| self.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    pub fn user_agent(&self) -> String {
        let base = format!("lbsdk/{}", env!("CARGO_PKG_VERSION"));
        match self.user_agent_suffix {
            Some(ref suffix) => format!("{} {}", base, suffix),
            None => base,
        }
    }
}

/// Standard regional host name for a service.
fn regional_host(endpoint_prefix: &str, region: &str) -> String {
    if region.starts_with("cn-") {
        format!("{}.{}.amazonaws.com.cn", endpoint_prefix, region)
    } else {
        format!("{}.{}.amazonaws.com", endpoint_prefix, region)
    }
}

/// Extract the region from an AWS host name.
///
/// `elasticloadbalancing.eu-west-1.amazonaws.com` yields `eu-west-1`, as does
/// the legacy `eu-west-1.elasticloadbalancing.amazonaws.com`. The global host
/// `elasticloadbalancing.amazonaws.com` yields `us-east-1`. Hosts outside
/// `amazonaws.com` yield `None`.
pub fn parse_region_name(host: &str, endpoint_prefix: &str) -> Option<String> {
    let trimmed = host
        .strip_suffix(".amazonaws.com.cn")
        .or_else(|| host.strip_suffix(".amazonaws.com"))?;
    let labels: Vec<&str> = trimmed.split('.').collect();
    match labels.as_slice() {
        [_] => Some(DEFAULT_REGION.to_string()),
        [first, second] if *first == endpoint_prefix => Some((*second).to_string()),
        [first, second] if *second == endpoint_prefix => Some((*first).to_string()),
        [.., last] => Some((*last).to_string()),
        [] => None,
    }
}
