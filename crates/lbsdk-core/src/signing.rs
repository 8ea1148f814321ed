//! AWS Signature Version 4.
//!
//! Signing hashes a canonical form of the request, derives a per-day key
//! scoped to region and service, and writes the resulting `Authorization`
//! header (plus `x-amz-date` and, for session credentials,
//! `x-amz-security-token`).
//!
//! The signer operates on a fully built [`HttpRequest`]: the invoker sets the
//! host, content type and body first, then hands the request over together
//! with the credentials resolved for the call.

use crate::credentials::Credentials;
use crate::error::ClientError;
use crate::transport::HttpRequest;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Hash of an empty payload.
pub const EMPTY_PAYLOAD_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Headers that intermediaries may rewrite; never part of the signature.
const UNSIGNED_HEADERS: &[&str] = &["authorization", "user-agent", "expect", "x-amzn-trace-id"];

/// Unreserved characters (RFC 3986) stay as they are; everything else is
/// percent-encoded.
const AWS_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Adds authentication to an outgoing request.
pub trait RequestSigner: Send + Sync {
    fn sign(
        &self,
        request: &mut HttpRequest,
        credentials: &Credentials,
        signing_time: DateTime<Utc>,
    ) -> Result<(), ClientError>;
}

/// SigV4 signer bound to one region and service name.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    pub region: String,
    pub service: String,
    /// Add `x-amz-content-sha256` (S3 style). Query and JSON services do not
    /// need it.
    pub content_sha256_header: bool,
}

impl SigV4Signer {
    pub fn new(region: &str, service: &str) -> Self {
        Self {
            region: region.to_string(),
            service: service.to_string(),
            content_sha256_header: false,
        }
    }

    pub fn with_content_sha256_header(mut self) -> Self {
        self.content_sha256_header = true;
        self
    }

    fn credential_scope(&self, date_stamp: &str) -> String {
        format!("{}/{}/{}/aws4_request", date_stamp, self.region, self.service)
    }

    /// CanonicalRequest =
    ///   Method \n CanonicalURI \n CanonicalQueryString \n
    ///   CanonicalHeaders \n SignedHeaders \n HexEncode(Hash(Payload))
    fn canonical_request(
        &self,
        request: &HttpRequest,
        headers: &BTreeMap<String, String>,
        payload_hash: &str,
    ) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method.as_str(),
            canonical_uri(request.url.path()),
            canonical_query_string(&request.url),
            canonical_headers(headers),
            signed_header_names(headers),
            payload_hash
        )
    }

    /// kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
    fn derive_signing_key(&self, secret: &str, date_stamp: &str) -> Result<Vec<u8>, ClientError> {
        let k_secret = format!("AWS4{}", secret);
        let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes())?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

impl RequestSigner for SigV4Signer {
    fn sign(
        &self,
        request: &mut HttpRequest,
        credentials: &Credentials,
        signing_time: DateTime<Utc>,
    ) -> Result<(), ClientError> {
        let date_stamp = signing_time.format("%Y%m%d").to_string();
        let amz_date = signing_time.format("%Y%m%dT%H%M%SZ").to_string();

        request.headers.insert("x-amz-date".to_string(), amz_date.clone());
        if let Some(ref token) = credentials.session_token {
            request
                .headers
                .insert("x-amz-security-token".to_string(), token.clone());
        }

        let payload_hash = sha256_hex_bytes(&request.body);
        if self.content_sha256_header {
            request
                .headers
                .insert("x-amz-content-sha256".to_string(), payload_hash.clone());
        }

        let to_sign: BTreeMap<String, String> = request
            .headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .filter(|(k, _)| !UNSIGNED_HEADERS.contains(&k.as_str()))
            .collect();

        let canonical_request = self.canonical_request(request, &to_sign, &payload_hash);
        log::trace!("canonical request:\n{}", canonical_request);

        let scope = self.credential_scope(&date_stamp);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            sha256_hex(&canonical_request)
        );

        let signing_key = self.derive_signing_key(&credentials.secret_access_key, &date_stamp)?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            credentials.access_key_id,
            scope,
            signed_header_names(&to_sign),
            signature
        );
        request.headers.insert("authorization".to_string(), authorization);
        Ok(())
    }
}

// ── Helper functions ────────────────────────────────────────────────────

pub fn sha256_hex(data: &str) -> String {
    sha256_hex_bytes(data.as_bytes())
}

pub fn sha256_hex_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ClientError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ClientError::Credentials(format!("invalid signing key: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Lowercased names, trimmed values with inner whitespace runs collapsed.
fn canonical_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(k, v)| {
            let value = v.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("{}:{}\n", k, value)
        })
        .collect()
}

fn signed_header_names(headers: &BTreeMap<String, String>) -> String {
    headers.keys().cloned().collect::<Vec<_>>().join(";")
}

fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        uri_encode_path(path)
    }
}

fn canonical_query_string(url: &url::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode everything except RFC 3986 unreserved characters.
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, AWS_ENCODE_SET).to_string()
}

/// URI-encode a URL path, preserving forward slashes.
fn uri_encode_path(path: &str) -> String {
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

/// Build a query string (or form body) from sorted parameters.
pub fn build_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}
