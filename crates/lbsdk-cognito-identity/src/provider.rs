//! Credentials from a Cognito identity pool.
//!
//! The provider resolves an identity id once with `GetId`, then exchanges it
//! for temporary credentials with `GetCredentialsForIdentity`. Credentials
//! are reused until they come within the refresh window of their expiry.

use crate::client::CognitoIdentityClient;
use crate::error::{CognitoIdentityError, CognitoIdentityErrorKind};
use crate::model::*;
use lbsdk_core::{ClientError, Credentials, CredentialsProvider};
use std::sync::{Arc, Mutex, MutexGuard};

/// Credentials are refreshed this long before they expire.
pub const DEFAULT_REFRESH_WINDOW_SECS: i64 = 300;

const PROVIDER_NAME: &str = "cognito-identity";

#[derive(Default)]
struct Cache {
    identity_id: Option<String>,
    credentials: Option<Credentials>,
}

/// [`CredentialsProvider`] backed by a Cognito identity pool.
///
/// Concurrent callers share one cache; a refresh in progress blocks other
/// callers until it completes.
pub struct CognitoCredentialsProvider {
    client: Arc<CognitoIdentityClient>,
    identity_pool_id: String,
    account_id: Option<String>,
    logins: Logins,
    custom_role_arn: Option<String>,
    refresh_window: chrono::Duration,
    cache: Mutex<Cache>,
}

impl CognitoCredentialsProvider {
    pub fn new(client: Arc<CognitoIdentityClient>, identity_pool_id: impl Into<String>) -> Self {
        Self {
            client,
            identity_pool_id: identity_pool_id.into(),
            account_id: None,
            logins: Logins::new(),
            custom_role_arn: None,
            refresh_window: chrono::Duration::seconds(DEFAULT_REFRESH_WINDOW_SECS),
            cache: Mutex::new(Cache::default()),
        }
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Authenticate as a federated user; without logins the identity is
    /// unauthenticated.
    pub fn with_login(mut self, provider: impl Into<String>, token: impl Into<String>) -> Self {
        self.logins.insert(provider.into(), token.into());
        self
    }

    pub fn with_custom_role_arn(mut self, arn: impl Into<String>) -> Self {
        self.custom_role_arn = Some(arn.into());
        self
    }

    pub fn with_refresh_window(mut self, window: chrono::Duration) -> Self {
        self.refresh_window = window;
        self
    }

    /// Start from a known identity instead of calling `GetId`.
    pub fn with_identity_id(self, identity_id: impl Into<String>) -> Self {
        if let Ok(mut cache) = self.cache.lock() {
            cache.identity_id = Some(identity_id.into());
        }
        self
    }

    /// The identity id, resolving it if necessary.
    pub fn identity_id(&self) -> Result<String, ClientError> {
        let mut cache = self.lock()?;
        self.resolve_identity_id(&mut cache)
    }

    /// Forget the identity id as well as the credentials.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Cache::default();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Cache>, ClientError> {
        self.cache
            .lock()
            .map_err(|_| ClientError::Credentials("credentials cache poisoned".to_string()))
    }

    fn resolve_identity_id(&self, cache: &mut Cache) -> Result<String, ClientError> {
        if let Some(ref id) = cache.identity_id {
            return Ok(id.clone());
        }
        let req = GetIdRequest {
            account_id: self.account_id.clone(),
            identity_pool_id: Some(self.identity_pool_id.clone()),
            logins: self.logins.clone(),
        };
        let id = self
            .client
            .get_id(req)
            .map_err(|e| credentials_error("GetId", e))?
            .identity_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::Credentials("GetId returned no identity id".to_string()))?;
        log::debug!("resolved cognito identity {}", id);
        cache.identity_id = Some(id.clone());
        Ok(id)
    }

    fn fetch(&self, cache: &mut Cache) -> Result<Credentials, ClientError> {
        let identity_id = self.resolve_identity_id(cache)?;
        let req = GetCredentialsForIdentityRequest {
            identity_id: Some(identity_id),
            logins: self.logins.clone(),
            custom_role_arn: self.custom_role_arn.clone(),
        };
        let result = match self.client.get_credentials_for_identity(req) {
            Ok(result) => result,
            Err(e) => {
                // The identity may have been deleted or merged; resolve again next time.
                if e.kind() == Some(CognitoIdentityErrorKind::ResourceNotFound) {
                    cache.identity_id = None;
                }
                return Err(credentials_error("GetCredentialsForIdentity", e));
            }
        };

        if let Some(id) = result.identity_id.filter(|id| !id.is_empty()) {
            cache.identity_id = Some(id);
        }
        let vended = result
            .credentials
            .ok_or_else(|| ClientError::Credentials("GetCredentialsForIdentity returned no credentials".to_string()))?;
        let (access_key_id, secret_key) = match (vended.access_key_id, vended.secret_key) {
            (Some(a), Some(s)) if !a.is_empty() && !s.is_empty() => (a, s),
            _ => {
                return Err(ClientError::Credentials(
                    "GetCredentialsForIdentity returned incomplete credentials".to_string(),
                ))
            }
        };
        let credentials = match vended.session_token {
            Some(token) => Credentials::new_session(access_key_id, secret_key, token, vended.expiration),
            None => Credentials {
                expiration: vended.expiration,
                ..Credentials::new(access_key_id, secret_key)
            },
        }
        .with_provider_name(PROVIDER_NAME);
        Ok(credentials)
    }
}

fn credentials_error(operation: &str, err: CognitoIdentityError) -> ClientError {
    ClientError::Credentials(format!("{} failed: {}", operation, err))
}

impl CredentialsProvider for CognitoCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, ClientError> {
        let mut cache = self.lock()?;
        if let Some(ref creds) = cache.credentials {
            if !creds.expires_within(self.refresh_window) {
                return Ok(creds.clone());
            }
            log::debug!("cognito credentials expire within {}s; refreshing", self.refresh_window.num_seconds());
        }
        let fresh = self.fetch(&mut cache)?;
        if fresh.expires_within(self.refresh_window) {
            log::warn!("cognito credentials expire within the refresh window as issued");
        }
        cache.credentials = Some(fresh.clone());
        Ok(fresh)
    }

    fn refresh(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.credentials = None;
        }
    }
}

impl std::fmt::Debug for CognitoCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoCredentialsProvider")
            .field("identity_pool_id", &self.identity_pool_id)
            .field("logins", &self.logins.keys().collect::<Vec<_>>())
            .field("refresh_window", &self.refresh_window)
            .finish()
    }
}
