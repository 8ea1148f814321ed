//! HTTP transport abstraction and the reqwest-backed default.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::request::HttpMethod;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// A fully built, possibly signed HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Lowercase header names.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Raw response from the transport.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Lowercase header names.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Request id from the response headers, when the service sent one.
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-amzn-requestid")
            .or_else(|| self.header("x-amz-request-id"))
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Low-level failure reported by a transport.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Attach the endpoint and turn into the client-side error callers see.
    pub fn into_client_error(self, endpoint: &str) -> ClientError {
        let endpoint = endpoint.to_string();
        match self {
            TransportError::Connect(message) => ClientError::Connect { endpoint, message },
            TransportError::Timeout(message) => ClientError::Timeout { endpoint, message },
            TransportError::Io(message) => ClientError::Io { endpoint, message },
        }
    }
}

/// Sends one request and returns the raw response.
///
/// Non-2xx statuses are responses, not errors; only failures to get any
/// response at all are reported as [`TransportError`]. Per-call timeouts are
/// the transport's business.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest client.
///
/// Build it and send through it outside of any async context; the worker
/// pool runs calls on dedicated blocking threads. It may be dropped
/// anywhere: inside a tokio runtime the underlying client is released on a
/// short-lived plain thread, since reqwest panics when its blocking client
/// is dropped on a runtime thread.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Always `Some` until dropped.
    http: Option<reqwest::blocking::Client>,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_connections_per_host)
            .build()
            .map_err(|e| ClientError::Config(format!("unable to build HTTP client: {}", e)))?;
        Ok(Self { http: Some(http) })
    }
}

impl Drop for ReqwestTransport {
    fn drop(&mut self) {
        let Some(http) = self.http.take() else { return };
        if tokio::runtime::Handle::try_current().is_ok() {
            let _ = std::thread::Builder::new()
                .name("lbsdk-transport-drop".into())
                .spawn(move || drop(http));
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        };

        let http = self
            .http
            .as_ref()
            .ok_or_else(|| TransportError::Io("transport already released".into()))?;
        let mut req = http.request(method, request.url.clone());
        for (key, value) in &request.headers {
            // reqwest derives Host from the URL
            if key == "host" {
                continue;
            }
            req = req.header(key.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            req = req.body(request.body.clone());
        }

        let resp = req.send().map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();
        let mut headers = BTreeMap::new();
        for (key, value) in resp.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_lowercase(), v.to_string());
            }
        }
        let body = resp.bytes().map_err(map_reqwest_error)?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_headers_are_case_insensitive() {
        let resp = HttpResponse::new(200, "ok").with_header("X-Amzn-RequestId", "abc");
        assert_eq!(resp.header("x-amzn-requestid"), Some("abc"));
        assert_eq!(resp.request_id(), Some("abc"));
        assert!(resp.is_success());
    }

    #[test]
    fn status_classification() {
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
    }

    #[test]
    fn transport_errors_keep_endpoint() {
        let err = TransportError::Timeout("30s".into()).into_client_error("https://elb");
        assert_eq!(
            err,
            ClientError::Timeout {
                endpoint: "https://elb".into(),
                message: "30s".into()
            }
        );
        assert!(TransportError::Connect("refused".into())
            .into_client_error("x")
            .is_transport());
    }

    #[test]
    fn mock_transport_returns_canned_response() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "<Ok/>")));
        let req = HttpRequest {
            method: HttpMethod::Post,
            url: Url::parse("https://example.com/").unwrap(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        };
        assert_eq!(mock.send(&req).unwrap().body_text(), "<Ok/>");
    }

    #[test]
    fn reqwest_transport_builds_from_config() {
        assert!(ReqwestTransport::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn reqwest_transport_can_be_dropped_inside_a_runtime() {
        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        let copy = transport.clone();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async move {
            drop(copy);
            drop(transport);
        });
    }
}
