//! Request and result types of the Cognito Identity operations.
//!
//! These are the JSON bodies exchanged with the service: field names follow
//! the wire format and unset optional fields are left out of the request.

use chrono::{DateTime, Utc};
use lbsdk_core::json::epoch_seconds;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider name → token, e.g. `graph.facebook.com` → access token.
pub type Logins = BTreeMap<String, String>;

// ── Requests ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetIdRequest {
    #[serde(rename = "AccountId", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// `region:uuid`; required.
    #[serde(rename = "IdentityPoolId", skip_serializing_if = "Option::is_none")]
    pub identity_pool_id: Option<String>,
    #[serde(rename = "Logins", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub logins: Logins,
}

impl GetIdRequest {
    pub fn new(identity_pool_id: impl Into<String>) -> Self {
        Self {
            identity_pool_id: Some(identity_pool_id.into()),
            ..Default::default()
        }
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_login(mut self, provider: impl Into<String>, token: impl Into<String>) -> Self {
        self.logins.insert(provider.into(), token.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetCredentialsForIdentityRequest {
    #[serde(rename = "IdentityId", skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(rename = "Logins", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub logins: Logins,
    /// Role to assume when the pool's rules allow several.
    #[serde(rename = "CustomRoleArn", skip_serializing_if = "Option::is_none")]
    pub custom_role_arn: Option<String>,
}

impl GetCredentialsForIdentityRequest {
    pub fn new(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: Some(identity_id.into()),
            ..Default::default()
        }
    }

    pub fn with_login(mut self, provider: impl Into<String>, token: impl Into<String>) -> Self {
        self.logins.insert(provider.into(), token.into());
        self
    }

    pub fn with_custom_role_arn(mut self, arn: impl Into<String>) -> Self {
        self.custom_role_arn = Some(arn.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetOpenIdTokenRequest {
    #[serde(rename = "IdentityId", skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(rename = "Logins", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub logins: Logins,
}

impl GetOpenIdTokenRequest {
    pub fn new(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: Some(identity_id.into()),
            ..Default::default()
        }
    }

    pub fn with_login(mut self, provider: impl Into<String>, token: impl Into<String>) -> Self {
        self.logins.insert(provider.into(), token.into());
        self
    }
}

// ── Results ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetIdResult {
    #[serde(rename = "IdentityId", default)]
    pub identity_id: Option<String>,
}

/// Temporary AWS credentials vended for an identity.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityCredentials {
    #[serde(rename = "AccessKeyId", default)]
    pub access_key_id: Option<String>,
    #[serde(rename = "SecretKey", default)]
    pub secret_key: Option<String>,
    #[serde(rename = "SessionToken", default)]
    pub session_token: Option<String>,
    #[serde(
        rename = "Expiration",
        default,
        with = "epoch_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for IdentityCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "** redacted **"))
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetCredentialsForIdentityResult {
    #[serde(rename = "IdentityId", default)]
    pub identity_id: Option<String>,
    #[serde(rename = "Credentials", default)]
    pub credentials: Option<IdentityCredentials>,
}

#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetOpenIdTokenResult {
    #[serde(rename = "IdentityId", default)]
    pub identity_id: Option<String>,
    /// OpenID Connect token, valid for ten minutes.
    #[serde(rename = "Token", default)]
    pub token: Option<String>,
}

impl std::fmt::Debug for GetOpenIdTokenResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetOpenIdTokenResult")
            .field("identity_id", &self.identity_id)
            .field("token", &self.token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unset_fields_are_omitted() {
        let req = GetIdRequest::new("us-east-1:pool");
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"IdentityPoolId":"us-east-1:pool"}"#
        );
        let req = req.with_login("accounts.google.com", "tok");
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"IdentityPoolId":"us-east-1:pool","Logins":{"accounts.google.com":"tok"}}"#
        );
    }

    #[test]
    fn credentials_decode_with_epoch_expiry() {
        let out: GetCredentialsForIdentityResult = serde_json::from_str(
            r#"{"IdentityId":"us-east-1:abc","Credentials":{"AccessKeyId":"ASIA1","SecretKey":"s",
                "SessionToken":"t","Expiration":1.7E9}}"#,
        )
        .unwrap();
        let creds = out.credentials.unwrap();
        assert_eq!(creds.access_key_id.as_deref(), Some("ASIA1"));
        assert_eq!(creds.expiration, Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
    }

    #[test]
    fn secrets_are_not_printed() {
        let creds = IdentityCredentials {
            access_key_id: Some("ASIA1".into()),
            secret_key: Some("very-secret".into()),
            session_token: Some("session-value".into()),
            expiration: None,
        };
        let printed = format!("{:?}", creds);
        assert!(printed.contains("ASIA1"));
        assert!(!printed.contains("very-secret"));
        assert!(!printed.contains("session-value"));
    }
}
