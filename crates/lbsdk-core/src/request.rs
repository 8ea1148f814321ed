//! The transport-ready call descriptor and the helpers marshallers use to
//! fill it.

use crate::credentials::Credentials;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verbs the services in this workspace use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marshalled call: everything needed to put one operation on the wire,
/// minus the endpoint, credentials and signature which the invoker adds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    /// Operation name (`CreateLoadBalancer`, `GetId`, ...).
    pub operation: &'static str,
    pub method: HttpMethod,
    /// Path appended to the endpoint, `/` for Query and JSON services.
    pub resource_path: String,
    /// Form parameters; sorted so the encoded body is deterministic.
    pub parameters: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    /// Raw body. When absent and the method is POST, the invoker
    /// form-encodes `parameters` into the body.
    pub content: Option<Vec<u8>>,
    /// Sent without a signature (operations declared with no auth).
    pub unsigned: bool,
}

impl Request {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            method: HttpMethod::Post,
            resource_path: "/".to_string(),
            ..Default::default()
        }
    }

    /// A Query-protocol call: `Action` and `Version` pre-filled.
    pub fn query(operation: &'static str, api_version: &str) -> Self {
        let mut request = Self::new(operation);
        request.add_parameter("Action", operation);
        request.add_parameter("Version", api_version);
        request
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Add a parameter only when the value is set.
    pub fn add_optional<V: ToString>(&mut self, name: impl Into<String>, value: Option<V>) {
        if let Some(v) = value {
            self.parameters.insert(name.into(), v.to_string());
        }
    }

    /// Encode a list of scalars as `{prefix}.member.N` (1-based).
    pub fn add_member_list<S: AsRef<str>>(&mut self, prefix: &str, items: &[S]) {
        for (i, item) in items.iter().enumerate() {
            self.parameters
                .insert(format!("{}.member.{}", prefix, i + 1), item.as_ref().to_string());
        }
    }

    /// Like [`add_member_list`](Self::add_member_list), but an empty list is
    /// sent explicitly as `{prefix}=` so the service clears the collection.
    pub fn add_member_list_or_empty<S: AsRef<str>>(&mut self, prefix: &str, items: &[S]) {
        if items.is_empty() {
            self.parameters.insert(prefix.to_string(), String::new());
        } else {
            self.add_member_list(prefix, items);
        }
    }

    /// Encode a list of structures; `encode` receives the
    /// `{prefix}.member.N` prefix for each element and may reject it.
    pub fn add_member_structs<T, F, E>(&mut self, prefix: &str, items: &[T], mut encode: F) -> Result<(), E>
    where
        F: FnMut(&mut Self, &str, &T) -> Result<(), E>,
    {
        for (i, item) in items.iter().enumerate() {
            let member_prefix = format!("{}.member.{}", prefix, i + 1);
            encode(self, &member_prefix, item)?;
        }
        Ok(())
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into().to_lowercase(), value.into());
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// `application/x-www-form-urlencoded` rendering of the parameters.
    pub fn encode_form(&self) -> String {
        crate::signing::build_query_string(&self.parameters)
    }
}

/// A request together with optional credentials that apply to this call
/// only and take precedence over the client's provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Call<R> {
    pub request: R,
    pub credentials: Option<Credentials>,
}

impl<R> Call<R> {
    pub fn new(request: R) -> Self {
        Self {
            request,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

impl<R> From<R> for Call<R> {
    fn from(request: R) -> Self {
        Self::new(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_prefills_action_and_version() {
        let r = Request::query("DescribeLoadBalancers", "2012-06-01");
        assert_eq!(r.parameter("Action"), Some("DescribeLoadBalancers"));
        assert_eq!(r.parameter("Version"), Some("2012-06-01"));
        assert_eq!(r.method, HttpMethod::Post);
        assert_eq!(r.resource_path, "/");
    }

    #[test]
    fn member_list_is_one_based() {
        let mut r = Request::new("Op");
        r.add_member_list("Subnets", &["subnet-a", "subnet-b"]);
        assert_eq!(r.parameter("Subnets.member.1"), Some("subnet-a"));
        assert_eq!(r.parameter("Subnets.member.2"), Some("subnet-b"));
        assert_eq!(r.parameters.len(), 2);
    }

    #[test]
    fn empty_list_can_be_sent_explicitly() {
        let mut r = Request::new("Op");
        r.add_member_list_or_empty::<String>("PolicyNames", &[]);
        assert_eq!(r.parameter("PolicyNames"), Some(""));

        let mut plain = Request::new("Op");
        plain.add_member_list::<String>("PolicyNames", &[]);
        assert!(plain.parameters.is_empty());
    }

    #[test]
    fn member_structs_get_prefixes() {
        let mut r = Request::new("Op");
        r.add_member_structs("Tags", &[("k1", "v1"), ("k2", "v2")], |req, prefix, (k, v)| {
            req.add_parameter(format!("{}.Key", prefix), *k);
            req.add_parameter(format!("{}.Value", prefix), *v);
            Ok::<_, ()>(())
        })
        .unwrap();
        assert_eq!(r.parameter("Tags.member.2.Key"), Some("k2"));
        assert_eq!(r.parameter("Tags.member.1.Value"), Some("v1"));
    }

    #[test]
    fn member_structs_stop_at_first_rejection() {
        let mut r = Request::new("Op");
        let out = r.add_member_structs("Ports", &[80, 0, 443], |req, prefix, port| {
            if *port == 0 {
                return Err(format!("{} is zero", prefix));
            }
            req.add_parameter(prefix.to_string(), port.to_string());
            Ok(())
        });
        assert_eq!(out, Err("Ports.member.2 is zero".to_string()));
        assert_eq!(r.parameters.len(), 1);
    }

    #[test]
    fn optional_parameters_skip_none() {
        let mut r = Request::new("Op");
        r.add_optional("PageSize", Some(20));
        r.add_optional::<i32>("Marker", None);
        assert_eq!(r.parameter("PageSize"), Some("20"));
        assert_eq!(r.parameter("Marker"), None);
    }

    #[test]
    fn form_encoding_escapes_values() {
        let mut r = Request::query("Op", "2012-06-01");
        r.add_parameter("Name", "a b/c");
        assert_eq!(r.encode_form(), "Action=Op&Name=a%20b%2Fc&Version=2012-06-01");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let mut r = Request::new("Op");
        r.add_header("X-Amz-Target", "Svc.Op");
        assert_eq!(r.header("x-amz-target"), Some("Svc.Op"));
    }

    #[test]
    fn call_from_request() {
        let call: Call<u32> = 7.into();
        assert!(call.credentials.is_none());
        let call = call.with_credentials(Credentials::new("A", "B"));
        assert_eq!(call.credentials.unwrap().access_key_id, "A");
    }
}
