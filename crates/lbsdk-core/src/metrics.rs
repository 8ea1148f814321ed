//! Per-call timing metrics and the collector hook they are reported to.
//!
//! Metrics never influence control flow. The default collector discards
//! everything; install [`LogMetricsCollector`] or your own implementation to
//! observe calls.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Timed phases of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// The whole call, marshalling to unmarshalling.
    ClientExecuteTime,
    RequestMarshallTime,
    CredentialsRequestTime,
    RequestSigningTime,
    /// Time spent inside the transport.
    HttpRequestTime,
    /// Unmarshalling a success body or dispatching an error.
    ResponseProcessingTime,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ClientExecuteTime => "ClientExecuteTime",
            Field::RequestMarshallTime => "RequestMarshallTime",
            Field::CredentialsRequestTime => "CredentialsRequestTime",
            Field::RequestSigningTime => "RequestSigningTime",
            Field::HttpRequestTime => "HttpRequestTime",
            Field::ResponseProcessingTime => "ResponseProcessingTime",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything recorded about one call.
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub service: String,
    pub operation: String,
    pub status_code: Option<u16>,
    pub request_id: Option<String>,
    /// Service error code when the call failed on the service side.
    pub error_code: Option<String>,
    timings: BTreeMap<Field, Duration>,
    open: BTreeMap<Field, Instant>,
}

impl RequestMetrics {
    pub fn new(service: &str, operation: &str) -> Self {
        Self {
            service: service.to_string(),
            operation: operation.to_string(),
            status_code: None,
            request_id: None,
            error_code: None,
            timings: BTreeMap::new(),
            open: BTreeMap::new(),
        }
    }

    pub fn start_event(&mut self, field: Field) {
        self.open.insert(field, Instant::now());
    }

    /// Close an event opened with [`start_event`](Self::start_event).
    /// Ending an event that was never started is ignored.
    pub fn end_event(&mut self, field: Field) {
        if let Some(started) = self.open.remove(&field) {
            self.timings.insert(field, started.elapsed());
        }
    }

    /// Run `f` and record how long it took.
    pub fn time<T>(&mut self, field: Field, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        self.timings.insert(field, started.elapsed());
        out
    }

    pub fn timing(&self, field: Field) -> Option<Duration> {
        self.timings.get(&field).copied()
    }

    pub fn timings(&self) -> impl Iterator<Item = (Field, Duration)> + '_ {
        self.timings.iter().map(|(f, d)| (*f, *d))
    }
}

impl fmt::Display for RequestMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.operation)?;
        if let Some(status) = self.status_code {
            write!(f, " status={}", status)?;
        }
        if let Some(ref code) = self.error_code {
            write!(f, " error={}", code)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " request_id={}", id)?;
        }
        for (field, elapsed) in &self.timings {
            write!(f, " {}={:.3}ms", field, elapsed.as_secs_f64() * 1000.0)?;
        }
        Ok(())
    }
}

/// Receives the metrics of every finished call.
#[cfg_attr(test, mockall::automock)]
pub trait MetricsCollector: Send + Sync {
    fn collect(&self, metrics: &RequestMetrics);

    /// When false the invoker skips the per-phase bookkeeping.
    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsCollector;

impl MetricsCollector for NoopMetricsCollector {
    fn collect(&self, _metrics: &RequestMetrics) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Writes one line per call through the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogMetricsCollector {
    level: log::Level,
}

impl LogMetricsCollector {
    pub fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LogMetricsCollector {
    fn default() -> Self {
        Self::new(log::Level::Info)
    }
}

impl MetricsCollector for LogMetricsCollector {
    fn collect(&self, metrics: &RequestMetrics) {
        log::log!(target: "lbsdk::metrics", self.level, "{}", metrics);
    }
}
