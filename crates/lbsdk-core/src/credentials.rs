//! Credentials and credential providers.
//!
//! A client holds one [`CredentialsProvider`] which is consulted on every
//! call. A [`Call`](crate::request::Call) can carry its own credentials, and
//! those win over the provider for that call only.

use crate::error::ClientError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An access key pair, optionally with a session token.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Present for temporary (session) credentials.
    pub session_token: Option<String>,
    /// When these credentials stop working (None for long-term keys).
    pub expiration: Option<DateTime<Utc>>,
    /// Name of the provider that produced them, for diagnostics.
    pub provider_name: Option<String>,
}

impl Credentials {
    /// Long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expiration: None,
            provider_name: Some("static".to_string()),
        }
    }

    /// Temporary credentials with a session token.
    pub fn new_session(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expiration: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: Some(session_token.into()),
            expiration,
            provider_name: Some("session".to_string()),
        }
    }

    pub fn with_provider_name(mut self, name: &str) -> Self {
        self.provider_name = Some(name.to_string());
        self
    }

    pub fn is_session(&self) -> bool {
        self.session_token.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_within(chrono::Duration::zero())
    }

    /// True when the credentials expire before `now + window`.
    pub fn expires_within(&self, window: chrono::Duration) -> bool {
        match self.expiration {
            Some(exp) => Utc::now() + window >= exp,
            None => false,
        }
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .field("expiration", &self.expiration)
            .field("provider_name", &self.provider_name)
            .finish()
    }
}

/// Source of credentials, consulted once per call.
///
/// Implementations are shared between concurrent calls and must be safe to
/// read from several threads at once.
pub trait CredentialsProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials, ClientError>;

    /// Drop anything cached so the next call fetches fresh credentials.
    fn refresh(&self) {}
}

impl<P: CredentialsProvider + ?Sized> CredentialsProvider for Arc<P> {
    fn credentials(&self) -> Result<Credentials, ClientError> {
        (**self).credentials()
    }

    fn refresh(&self) {
        (**self).refresh()
    }
}

/// Always returns the same credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, ClientError> {
        Ok(self.credentials.clone())
    }
}

pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Older spelling still honoured when the current one is unset.
pub const ENV_SECRET_KEY_ALT: &str = "AWS_SECRET_KEY";
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Reads credentials from the process environment on every call.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCredentialsProvider;

impl CredentialsProvider for EnvironmentCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, ClientError> {
        let access_key = non_empty_env(ENV_ACCESS_KEY_ID);
        let secret_key = non_empty_env(ENV_SECRET_ACCESS_KEY).or_else(|| non_empty_env(ENV_SECRET_KEY_ALT));
        match (access_key, secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let mut creds = match non_empty_env(ENV_SESSION_TOKEN) {
                    Some(token) => Credentials::new_session(access_key, secret_key, token, None),
                    None => Credentials::new(access_key, secret_key),
                };
                creds.provider_name = Some("environment".to_string());
                Ok(creds)
            }
            _ => Err(ClientError::Credentials(format!(
                "{} and {} (or {}) must be set",
                ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, ENV_SECRET_KEY_ALT
            ))),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Tries each provider in order and returns the first success.
pub struct CredentialsProviderChain {
    providers: Vec<Box<dyn CredentialsProvider>>,
}

impl CredentialsProviderChain {
    pub fn new(providers: Vec<Box<dyn CredentialsProvider>>) -> Self {
        Self { providers }
    }

    /// The chain clients use when none is supplied.
    pub fn default_chain() -> Self {
        Self::new(vec![Box::new(EnvironmentCredentialsProvider)])
    }
}

impl CredentialsProvider for CredentialsProviderChain {
    fn credentials(&self) -> Result<Credentials, ClientError> {
        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.credentials() {
                Ok(creds) => return Ok(creds),
                Err(e) => {
                    log::debug!("credentials provider skipped: {}", e);
                    failures.push(e.to_string());
                }
            }
        }
        Err(ClientError::Credentials(format!(
            "no provider in the chain returned credentials: [{}]",
            failures.join("; ")
        )))
    }

    fn refresh(&self) {
        for provider in &self.providers {
            provider.refresh();
        }
    }
}
