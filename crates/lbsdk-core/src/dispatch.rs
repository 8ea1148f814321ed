//! Error envelope parsing and exception dispatch.
//!
//! A failed response is first reduced to [`ServiceErrorDetails`], then handed
//! to the service's [`ErrorDispatcher`], which walks its unmarshallers in
//! order. The last unmarshaller always accepts, so every error response ends
//! up as exactly one [`SdkError`].

use crate::error::{ErrorType, SdkError, ServiceErrorDetails, ServiceErrorKind};
use crate::transport::HttpResponse;
use crate::xml::XmlNode;

/// One link in the dispatch chain.
///
/// Returns the error it claims, or hands the details back unchanged so the
/// next unmarshaller can look at them.
pub trait ErrorUnmarshaller<E>: Send + Sync {
    fn unmarshall(&self, details: ServiceErrorDetails) -> Result<SdkError<E>, ServiceErrorDetails>;
}

/// Claims errors whose code equals one registered kind.
struct CodeUnmarshaller<E> {
    kind: E,
}

impl<E: ServiceErrorKind> ErrorUnmarshaller<E> for CodeUnmarshaller<E> {
    fn unmarshall(&self, details: ServiceErrorDetails) -> Result<SdkError<E>, ServiceErrorDetails> {
        if details.code == self.kind.code() {
            Ok(SdkError::Service {
                kind: self.kind,
                details,
            })
        } else {
            Err(details)
        }
    }
}

/// Catch-all at the end of every chain.
pub struct StandardErrorUnmarshaller;

impl<E> ErrorUnmarshaller<E> for StandardErrorUnmarshaller {
    fn unmarshall(&self, details: ServiceErrorDetails) -> Result<SdkError<E>, ServiceErrorDetails> {
        Ok(SdkError::Unclassified(details))
    }
}

/// Ordered unmarshaller chain for one service.
pub struct ErrorDispatcher<E> {
    unmarshallers: Vec<Box<dyn ErrorUnmarshaller<E>>>,
}

impl<E: ServiceErrorKind> ErrorDispatcher<E> {
    /// One unmarshaller per registered kind, in registration order, then
    /// the standard fallback.
    pub fn new() -> Self {
        let mut unmarshallers: Vec<Box<dyn ErrorUnmarshaller<E>>> = E::all()
            .iter()
            .map(|kind| Box::new(CodeUnmarshaller { kind: *kind }) as Box<dyn ErrorUnmarshaller<E>>)
            .collect();
        unmarshallers.push(Box::new(StandardErrorUnmarshaller));
        Self { unmarshallers }
    }

    /// Insert a custom unmarshaller ahead of the fallback.
    pub fn register(&mut self, unmarshaller: Box<dyn ErrorUnmarshaller<E>>) {
        let at = self.unmarshallers.len().saturating_sub(1);
        self.unmarshallers.insert(at, unmarshaller);
    }

    pub fn len(&self) -> usize {
        self.unmarshallers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unmarshallers.is_empty()
    }

    pub fn dispatch(&self, details: ServiceErrorDetails) -> SdkError<E> {
        let mut details = details;
        for unmarshaller in &self.unmarshallers {
            match unmarshaller.unmarshall(details) {
                Ok(err) => return err,
                Err(unclaimed) => details = unclaimed,
            }
        }
        SdkError::Unclassified(details)
    }
}

impl<E: ServiceErrorKind> Default for ErrorDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a Query-protocol error envelope.
///
/// ```xml
/// <ErrorResponse>
///   <Error>
///     <Type>Sender</Type>
///     <Code>LoadBalancerNotFound</Code>
///     <Message>There is no ACTIVE Load Balancer named 'web'</Message>
///   </Error>
///   <RequestId>abc-123</RequestId>
/// </ErrorResponse>
/// ```
pub fn parse_xml_error(service: &str, response: &HttpResponse) -> ServiceErrorDetails {
    let body = response.body_text();
    let root = match XmlNode::parse(&body) {
        Ok(root) => root,
        Err(_) => return unparseable(service, response, &body),
    };

    let error = if root.name == "Error" {
        Some(&root)
    } else {
        root.child("Error").or_else(|| root.path(&["Errors", "Error"]))
    };
    let error = match error {
        Some(e) => e,
        None => return unparseable(service, response, &body),
    };

    let code = match error.string("Code").filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => return unparseable(service, response, &body),
    };
    let request_id = root
        .string("RequestId")
        .or_else(|| root.string("RequestID"))
        .or_else(|| response.request_id().map(str::to_string));
    let kind = error.string("Type");

    ServiceErrorDetails {
        service: service.to_string(),
        message: error.string("Message").unwrap_or_default(),
        code,
        request_id,
        status_code: response.status,
        error_type: ErrorType::from_envelope(kind.as_deref(), response.status),
    }
}

/// Parse a JSON-protocol error.
///
/// The code comes from the `x-amzn-ErrorType` header when present, else
/// from `__type`; either may carry a `namespace#` prefix or a `:` suffix.
pub fn parse_json_error(service: &str, response: &HttpResponse) -> ServiceErrorDetails {
    let body = response.body_text();
    let value: Option<serde_json::Value> = serde_json::from_str(&body).ok();

    let from_header = response.header("x-amzn-errortype").map(str::to_string);
    let from_body = value.as_ref().and_then(|v| {
        v.get("__type")
            .or_else(|| v.get("code"))
            .or_else(|| v.get("Code"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
    });
    let code = match from_header.or(from_body).map(|raw| normalize_json_code(&raw)) {
        Some(code) if !code.is_empty() => code,
        _ => return unparseable(service, response, &body),
    };

    let message = value
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
        })
        .unwrap_or_default()
        .to_string();

    ServiceErrorDetails {
        service: service.to_string(),
        code,
        message,
        request_id: response.request_id().map(str::to_string),
        status_code: response.status,
        error_type: ErrorType::from_envelope(None, response.status),
    }
}

fn normalize_json_code(raw: &str) -> String {
    let without_suffix = raw.split(':').next().unwrap_or(raw);
    without_suffix
        .rsplit('#')
        .next()
        .unwrap_or(without_suffix)
        .trim()
        .to_string()
}

/// Generic envelope for error bodies we cannot read; coded from the status.
fn unparseable(service: &str, response: &HttpResponse, body: &str) -> ServiceErrorDetails {
    let code = reqwest::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(|reason| reason.split_whitespace().collect::<String>())
        .unwrap_or_else(|| format!("Http{}", response.status));
    let snippet: String = body.chars().take(200).collect();
    ServiceErrorDetails {
        service: service.to_string(),
        code,
        message: if snippet.is_empty() {
            format!("HTTP {} with no error body", response.status)
        } else {
            format!("unable to parse error response: {}", snippet)
        },
        request_id: response.request_id().map(str::to_string),
        status_code: response.status,
        error_type: ErrorType::from_envelope(None, response.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Kind {
        NotFound,
        Duplicate,
        TooMany,
    }

    impl fmt::Display for Kind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.code())
        }
    }

    impl ServiceErrorKind for Kind {
        fn all() -> &'static [Self] {
            &[Kind::NotFound, Kind::Duplicate, Kind::TooMany]
        }

        fn code(&self) -> &'static str {
            match self {
                Kind::NotFound => "NotFound",
                Kind::Duplicate => "Duplicate",
                Kind::TooMany => "TooMany",
            }
        }
    }

    fn details(code: &str) -> ServiceErrorDetails {
        ServiceErrorDetails {
            service: "svc".into(),
            code: code.into(),
            message: "m".into(),
            request_id: None,
            status_code: 400,
            error_type: ErrorType::Client,
        }
    }

    #[test]
    fn every_registered_code_dispatches_exactly() {
        let dispatcher = ErrorDispatcher::<Kind>::new();
        for kind in Kind::all() {
            assert_eq!(dispatcher.dispatch(details(kind.code())).kind(), Some(*kind));
        }
    }

    #[test]
    fn unknown_code_falls_back() {
        let dispatcher = ErrorDispatcher::<Kind>::new();
        match dispatcher.dispatch(details("Throttling")) {
            SdkError::Unclassified(d) => assert_eq!(d.code, "Throttling"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn chain_ends_with_fallback() {
        let dispatcher = ErrorDispatcher::<Kind>::new();
        assert_eq!(dispatcher.len(), Kind::all().len() + 1);
    }

    struct Rename;

    impl ErrorUnmarshaller<Kind> for Rename {
        fn unmarshall(&self, details: ServiceErrorDetails) -> Result<SdkError<Kind>, ServiceErrorDetails> {
            if details.code == "Legacy.NotFound" {
                Ok(SdkError::Service {
                    kind: Kind::NotFound,
                    details,
                })
            } else {
                Err(details)
            }
        }
    }

    #[test]
    fn registered_unmarshaller_runs_before_fallback() {
        let mut dispatcher = ErrorDispatcher::<Kind>::new();
        dispatcher.register(Box::new(Rename));
        assert_eq!(
            dispatcher.dispatch(details("Legacy.NotFound")).kind(),
            Some(Kind::NotFound)
        );
    }

    #[test]
    fn parse_query_envelope() {
        let xml = r#"<ErrorResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/">
  <Error>
    <Type>Sender</Type>
    <Code>LoadBalancerNotFound</Code>
    <Message>There is no ACTIVE Load Balancer named 'web'</Message>
  </Error>
  <RequestId>a1b2</RequestId>
</ErrorResponse>"#;
        let d = parse_xml_error("elasticloadbalancing", &HttpResponse::new(400, xml));
        assert_eq!(d.code, "LoadBalancerNotFound");
        assert_eq!(d.message, "There is no ACTIVE Load Balancer named 'web'");
        assert_eq!(d.request_id.as_deref(), Some("a1b2"));
        assert_eq!(d.error_type, ErrorType::Client);
    }

    #[test]
    fn parse_query_envelope_unreadable_body() {
        let resp = HttpResponse::new(503, "<html>Service Unavailable").with_header("x-amzn-RequestId", "r9");
        let d = parse_xml_error("elasticloadbalancing", &resp);
        assert_eq!(d.code, "ServiceUnavailable");
        assert_eq!(d.request_id.as_deref(), Some("r9"));
        assert_eq!(d.error_type, ErrorType::Service);
    }

    #[test]
    fn parse_json_body_type() {
        let body = r#"{"__type":"com.amazonaws.cognito.identity.model#NotAuthorizedException","message":"Logins don't match"}"#;
        let resp = HttpResponse::new(400, body).with_header("x-amzn-RequestId", "j1");
        let d = parse_json_error("cognito-identity", &resp);
        assert_eq!(d.code, "NotAuthorizedException");
        assert_eq!(d.message, "Logins don't match");
        assert_eq!(d.request_id.as_deref(), Some("j1"));
    }

    #[test]
    fn parse_json_header_wins() {
        let resp = HttpResponse::new(400, r#"{"Message":"slow down"}"#)
            .with_header("x-amzn-ErrorType", "TooManyRequestsException:http://internal.amazon.com/");
        let d = parse_json_error("cognito-identity", &resp);
        assert_eq!(d.code, "TooManyRequestsException");
        assert_eq!(d.message, "slow down");
    }

    #[test]
    fn parse_json_garbage() {
        let d = parse_json_error("cognito-identity", &HttpResponse::new(500, ""));
        assert_eq!(d.code, "InternalServerError");
        assert!(d.message.contains("no error body"));
    }
}
