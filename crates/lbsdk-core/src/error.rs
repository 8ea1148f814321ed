//! Error model shared by every service client.
//!
//! A failed call always ends up as exactly one [`SdkError`]:
//!
//! * [`SdkError::Client`] – the call never reached the service, or the
//!   response could not be interpreted at all.
//! * [`SdkError::Service`] – the service answered with an error code that the
//!   client has registered as a typed kind.
//! * [`SdkError::Unclassified`] – the service answered with an error envelope
//!   whose code matches none of the registered kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-side failure: nothing the service said, or nothing we could read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("{operation}: missing required field '{field}'")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("{operation}: invalid value for '{field}': {reason}")]
    InvalidField {
        operation: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("unable to load credentials: {0}")]
    Credentials(String),

    #[error("unable to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    #[error("request to {endpoint} timed out: {message}")]
    Timeout { endpoint: String, message: String },

    #[error("I/O failure talking to {endpoint}: {message}")]
    Io { endpoint: String, message: String },

    #[error("unable to unmarshall response: {0}")]
    Parse(String),

    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("task was cancelled before it started")]
    Cancelled,

    #[error("worker pool shut down before the task completed")]
    Shutdown,
}

impl ClientError {
    pub fn missing(operation: &'static str, field: &'static str) -> Self {
        Self::MissingField { operation, field }
    }

    pub fn invalid(operation: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            operation,
            field,
            reason: reason.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Whether this failure came from the network layer rather than from
    /// local validation or decoding.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Timeout { .. } | Self::Io { .. })
    }
}

/// Who the service blames for a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    /// `Sender` in Query envelopes, 4xx in JSON ones.
    Client,
    /// `Receiver` in Query envelopes, 5xx in JSON ones.
    Service,
    Unknown,
}

impl ErrorType {
    pub fn from_envelope(kind: Option<&str>, status_code: u16) -> Self {
        match kind {
            Some("Sender") => Self::Client,
            Some("Receiver") => Self::Service,
            _ if status_code >= 500 => Self::Service,
            _ if status_code >= 400 => Self::Client,
            _ => Self::Unknown,
        }
    }
}

/// Everything the service told us about a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorDetails {
    /// The service that returned the error (e.g. "elasticloadbalancing").
    pub service: String,
    /// The machine-readable error code (e.g. "LoadBalancerNotFound").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Request id from the envelope or the response headers.
    pub request_id: Option<String>,
    /// The HTTP status code of the response.
    pub status_code: u16,
    pub error_type: ErrorType,
}

impl fmt::Display for ServiceErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error [{}]: {} (HTTP {})",
            self.service, self.code, self.message, self.status_code
        )?;
        if let Some(ref req_id) = self.request_id {
            write!(f, " [RequestId: {}]", req_id)?;
        }
        Ok(())
    }
}

/// A service's closed set of typed error kinds.
///
/// `code()` is the identity used for dispatch and must be unique across
/// `all()`.
pub trait ServiceErrorKind:
    Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Every registered kind, in registration order.
    fn all() -> &'static [Self];

    /// The wire error code this kind is selected by.
    fn code(&self) -> &'static str;

    fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.code() == code)
    }
}

/// The single outcome of a failed call.
#[derive(Debug, Clone, PartialEq)]
pub enum SdkError<E> {
    Client(ClientError),
    Service {
        kind: E,
        details: ServiceErrorDetails,
    },
    Unclassified(ServiceErrorDetails),
}

impl<E: ServiceErrorKind> SdkError<E> {
    /// The typed kind, when the service returned a registered code.
    pub fn kind(&self) -> Option<E> {
        match self {
            Self::Service { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The envelope for any service-side failure.
    pub fn details(&self) -> Option<&ServiceErrorDetails> {
        match self {
            Self::Service { details, .. } | Self::Unclassified(details) => Some(details),
            Self::Client(_) => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.details().map(|d| d.code.as_str())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.details().and_then(|d| d.request_id.as_deref())
    }
}

impl<E> SdkError<E> {
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}

impl<E: fmt::Display> fmt::Display for SdkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(err) => write!(f, "client error: {}", err),
            Self::Service { kind, details } => write!(f, "{}: {}", kind, details),
            Self::Unclassified(details) => write!(f, "{}", details),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for SdkError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl<E> From<ClientError> for SdkError<E> {
    fn from(err: ClientError) -> Self {
        Self::Client(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Kind {
        NotFound,
        Duplicate,
    }

    impl fmt::Display for Kind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.code())
        }
    }

    impl ServiceErrorKind for Kind {
        fn all() -> &'static [Self] {
            &[Kind::NotFound, Kind::Duplicate]
        }

        fn code(&self) -> &'static str {
            match self {
                Kind::NotFound => "NotFound",
                Kind::Duplicate => "Duplicate",
            }
        }
    }

    fn details(code: &str) -> ServiceErrorDetails {
        ServiceErrorDetails {
            service: "svc".into(),
            code: code.into(),
            message: "boom".into(),
            request_id: Some("req-1".into()),
            status_code: 400,
            error_type: ErrorType::Client,
        }
    }

    #[test]
    fn details_display_includes_request_id() {
        let s = details("NotFound").to_string();
        assert!(s.contains("svc"));
        assert!(s.contains("NotFound"));
        assert!(s.contains("HTTP 400"));
        assert!(s.contains("req-1"));
    }

    #[test]
    fn from_code_finds_registered_kind() {
        assert_eq!(Kind::from_code("Duplicate"), Some(Kind::Duplicate));
        assert_eq!(Kind::from_code("Other"), None);
    }

    #[test]
    fn accessors_by_variant() {
        let typed: SdkError<Kind> = SdkError::Service {
            kind: Kind::NotFound,
            details: details("NotFound"),
        };
        assert_eq!(typed.kind(), Some(Kind::NotFound));
        assert_eq!(typed.request_id(), Some("req-1"));

        let generic: SdkError<Kind> = SdkError::Unclassified(details("Throttling"));
        assert_eq!(generic.kind(), None);
        assert_eq!(generic.code(), Some("Throttling"));

        let client: SdkError<Kind> = ClientError::Cancelled.into();
        assert!(client.is_client_error());
        assert_eq!(client.code(), None);
    }

    #[test]
    fn error_type_from_envelope() {
        assert_eq!(ErrorType::from_envelope(Some("Sender"), 400), ErrorType::Client);
        assert_eq!(ErrorType::from_envelope(Some("Receiver"), 400), ErrorType::Service);
        assert_eq!(ErrorType::from_envelope(None, 503), ErrorType::Service);
        assert_eq!(ErrorType::from_envelope(None, 200), ErrorType::Unknown);
    }

    #[test]
    fn transport_classification() {
        let err = ClientError::Timeout {
            endpoint: "https://x".into(),
            message: "slow".into(),
        };
        assert!(err.is_transport());
        assert!(!ClientError::missing("Op", "Field").is_transport());
    }

    #[test]
    fn details_serde_roundtrip() {
        let d = details("NotFound");
        let json = serde_json::to_string(&d).unwrap();
        let back: ServiceErrorDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
