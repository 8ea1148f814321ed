//! The single execution path shared by every operation.
//!
//! `execute` marshals the request, resolves credentials, signs, sends
//! through the transport, and then either unmarshals the body or dispatches
//! the error envelope. Operation methods only supply the request and the two
//! operation-specific functions.

use crate::config::ClientConfig;
use crate::credentials::{CredentialsProvider, CredentialsProviderChain};
use crate::dispatch::{self, ErrorDispatcher};
use crate::error::{ClientError, SdkError, ServiceErrorDetails, ServiceErrorKind};
use crate::json::JSON_1_1_CONTENT_TYPE;
use crate::metrics::{Field, MetricsCollector, NoopMetricsCollector, RequestMetrics};
use crate::request::{Call, HttpMethod, Request};
use crate::signing::{RequestSigner, SigV4Signer};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use url::Url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Local clocks further than this from the service's are corrected.
const CLOCK_SKEW_THRESHOLD_SECS: i64 = 4 * 60;

/// Error codes services use to reject a request signed at the wrong time.
const CLOCK_SKEW_CODES: &[&str] = &[
    "RequestTimeTooSkewed",
    "RequestExpired",
    "RequestInTheFuture",
    "InvalidSignatureException",
    "SignatureDoesNotMatch",
    "AuthFailure",
];

/// Wire protocol family of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Form-encoded `Action=...&Version=...` body, XML responses.
    Query,
    /// JSON 1.1 body, operation named by `x-amz-target: {prefix}.{Operation}`.
    Json { target_prefix: &'static str },
}

/// Static description of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceMetadata {
    /// Name used in the signing scope and in errors.
    pub signing_name: &'static str,
    pub endpoint_prefix: &'static str,
    pub default_host: &'static str,
    pub api_version: &'static str,
    pub protocol: Protocol,
}

/// Signs, sends and interprets calls for one service.
pub struct Invoker<E> {
    metadata: ServiceMetadata,
    endpoint: Url,
    signing_region: String,
    user_agent: String,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialsProvider>,
    signer: Arc<dyn RequestSigner>,
    metrics: Arc<dyn MetricsCollector>,
    dispatcher: ErrorDispatcher<E>,
    /// Seconds added to the local clock when signing.
    time_offset: AtomicI64,
}

impl<E: ServiceErrorKind> Invoker<E> {
    pub fn builder(metadata: ServiceMetadata) -> InvokerBuilder<E> {
        InvokerBuilder::new(metadata)
    }

    pub fn metadata(&self) -> &ServiceMetadata {
        &self.metadata
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn signing_region(&self) -> &str {
        &self.signing_region
    }

    pub fn time_offset(&self) -> i64 {
        self.time_offset.load(Ordering::Relaxed)
    }

    pub fn set_time_offset(&self, seconds: i64) {
        self.time_offset.store(seconds, Ordering::Relaxed);
    }

    pub fn dispatcher_mut(&mut self) -> &mut ErrorDispatcher<E> {
        &mut self.dispatcher
    }

    /// Run one call end to end.
    pub fn execute<Req, Res, M, U>(&self, call: Call<Req>, marshall: M, unmarshall: U) -> Result<Res, SdkError<E>>
    where
        M: FnOnce(&Req) -> Result<Request, ClientError>,
        U: FnOnce(&HttpResponse) -> Result<Res, ClientError>,
    {
        let mut metrics = RequestMetrics::new(self.metadata.signing_name, "");
        metrics.start_event(Field::ClientExecuteTime);

        let outcome = self.run(call, marshall, unmarshall, &mut metrics);

        metrics.end_event(Field::ClientExecuteTime);
        if let Err(ref err) = outcome {
            metrics.error_code = err.code().map(str::to_string);
        }
        log::debug!(
            "{} {} -> {} in {:?}",
            self.metadata.signing_name,
            metrics.operation,
            match (&outcome, metrics.status_code) {
                (Ok(_), Some(status)) => status.to_string(),
                (Err(e), Some(status)) => format!("{} ({})", status, e.code().unwrap_or("client error")),
                (_, None) => "no response".to_string(),
            },
            metrics.timing(Field::ClientExecuteTime).unwrap_or_default()
        );
        if self.metrics.is_enabled() {
            self.metrics.collect(&metrics);
        }
        outcome
    }

    fn run<Req, Res, M, U>(
        &self,
        call: Call<Req>,
        marshall: M,
        unmarshall: U,
        metrics: &mut RequestMetrics,
    ) -> Result<Res, SdkError<E>>
    where
        M: FnOnce(&Req) -> Result<Request, ClientError>,
        U: FnOnce(&HttpResponse) -> Result<Res, ClientError>,
    {
        let Call { request, credentials } = call;

        let marshalled = metrics.time(Field::RequestMarshallTime, || marshall(&request))?;
        metrics.operation = marshalled.operation.to_string();

        let unsigned = marshalled.unsigned;
        let mut http = self.build_http_request(marshalled)?;

        if !unsigned {
            let creds = match credentials {
                Some(creds) => creds,
                None => metrics.time(Field::CredentialsRequestTime, || self.credentials.credentials())?,
            };
            if creds.is_expired() {
                log::warn!(
                    "signing {} with expired credentials from {}",
                    metrics.operation,
                    creds.provider_name.as_deref().unwrap_or("unknown provider")
                );
            }
            let signing_time = Utc::now() + chrono::Duration::seconds(self.time_offset());
            metrics.time(Field::RequestSigningTime, || self.signer.sign(&mut http, &creds, signing_time))?;
        }

        let response = metrics
            .time(Field::HttpRequestTime, || self.transport.send(&http))
            .map_err(|e| e.into_client_error(self.endpoint.as_str()))?;
        metrics.status_code = Some(response.status);
        metrics.request_id = response.request_id().map(str::to_string);

        metrics.time(Field::ResponseProcessingTime, || {
            if response.is_success() {
                unmarshall(&response).map_err(SdkError::Client)
            } else {
                let details = self.parse_error(&response);
                self.adjust_clock_skew(&details, &response);
                Err(self.dispatcher.dispatch(details))
            }
        })
    }

    fn build_http_request(&self, mut request: Request) -> Result<HttpRequest, ClientError> {
        let mut url = if request.resource_path.is_empty() || request.resource_path == "/" {
            self.endpoint.clone()
        } else {
            self.endpoint.join(&request.resource_path).map_err(|e| {
                ClientError::Config(format!("invalid resource path '{}': {}", request.resource_path, e))
            })?
        };

        let mut headers = std::mem::take(&mut request.headers);
        headers.insert("host".to_string(), host_header(&url));
        headers.insert("user-agent".to_string(), self.user_agent.clone());
        headers.insert(
            "amz-sdk-invocation-id".to_string(),
            uuid::Uuid::new_v4().to_string(),
        );

        let body = match (self.metadata.protocol, request.method, request.content.take()) {
            (_, _, Some(content)) => content,
            (Protocol::Json { .. }, _, None) => b"{}".to_vec(),
            (Protocol::Query, HttpMethod::Post, None) => request.encode_form().into_bytes(),
            (Protocol::Query, _, None) => {
                if !request.parameters.is_empty() {
                    url.set_query(Some(&request.encode_form()));
                }
                Vec::new()
            }
        };

        match self.metadata.protocol {
            Protocol::Query if !body.is_empty() => {
                headers
                    .entry("content-type".to_string())
                    .or_insert_with(|| FORM_CONTENT_TYPE.to_string());
            }
            Protocol::Json { target_prefix } => {
                headers
                    .entry("content-type".to_string())
                    .or_insert_with(|| JSON_1_1_CONTENT_TYPE.to_string());
                headers
                    .entry("x-amz-target".to_string())
                    .or_insert_with(|| format!("{}.{}", target_prefix, request.operation));
            }
            _ => {}
        }

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    fn parse_error(&self, response: &HttpResponse) -> ServiceErrorDetails {
        match self.metadata.protocol {
            Protocol::Query => dispatch::parse_xml_error(self.metadata.signing_name, response),
            Protocol::Json { .. } => dispatch::parse_json_error(self.metadata.signing_name, response),
        }
    }

    /// Remember the offset between the service's clock and ours after a
    /// clock-skew rejection. The failed call itself is not retried.
    fn adjust_clock_skew(&self, details: &ServiceErrorDetails, response: &HttpResponse) {
        if !CLOCK_SKEW_CODES.contains(&details.code.as_str()) {
            return;
        }
        let server_time = match response.header("date").and_then(parse_http_date) {
            Some(t) => t,
            None => return,
        };
        let skew = (server_time - Utc::now()).num_seconds();
        if skew.abs() > CLOCK_SKEW_THRESHOLD_SECS {
            log::warn!(
                "{} reported {}; adjusting clock offset to {}s",
                self.metadata.signing_name,
                details.code,
                skew
            );
            self.set_time_offset(skew);
        }
    }
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Assembles an [`Invoker`] from configuration plus optional overrides.
pub struct InvokerBuilder<E> {
    metadata: ServiceMetadata,
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    signer: Option<Arc<dyn RequestSigner>>,
    metrics: Option<Arc<dyn MetricsCollector>>,
    _kind: PhantomData<fn() -> E>,
}

impl<E: ServiceErrorKind> InvokerBuilder<E> {
    pub fn new(metadata: ServiceMetadata) -> Self {
        Self {
            metadata,
            config: ClientConfig::default(),
            transport: None,
            credentials: None,
            signer: None,
            metrics: None,
            _kind: PhantomData,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn metrics(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(collector);
        self
    }

    pub fn client_config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build(self) -> Result<Invoker<E>, ClientError> {
        self.config.validate()?;
        let endpoint = self
            .config
            .resolve_endpoint(self.metadata.endpoint_prefix, self.metadata.default_host)?;
        let signing_region = self
            .config
            .resolve_signing_region(&endpoint, self.metadata.endpoint_prefix);

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        let credentials: Arc<dyn CredentialsProvider> = self
            .credentials
            .unwrap_or_else(|| Arc::new(CredentialsProviderChain::default_chain()));
        let signer: Arc<dyn RequestSigner> = self
            .signer
            .unwrap_or_else(|| Arc::new(SigV4Signer::new(&signing_region, self.metadata.signing_name)));
        let metrics: Arc<dyn MetricsCollector> =
            self.metrics.unwrap_or_else(|| Arc::new(NoopMetricsCollector));

        log::debug!(
            "{} client: endpoint={} signing_region={}",
            self.metadata.signing_name,
            endpoint,
            signing_region
        );

        Ok(Invoker {
            metadata: self.metadata,
            endpoint,
            signing_region,
            user_agent: self.config.user_agent(),
            transport,
            credentials,
            signer,
            metrics,
            dispatcher: ErrorDispatcher::new(),
            time_offset: AtomicI64::new(0),
        })
    }
}
