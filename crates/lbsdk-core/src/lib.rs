//! # lbsdk-core – shared request-dispatch runtime
//!
//! Every service client in the workspace is a thin, typed surface over the
//! same pipeline. A request model is marshalled into a call descriptor, the
//! invoker resolves credentials, signs and sends the call through a pluggable
//! transport, and the response is either unmarshalled into a typed result or
//! routed through the service's error dispatcher.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  WorkerPool  (pool.rs)                           │
//! │  └── bounded workers · TaskHandle · AsyncHandler │
//! ├──────────────────────────────────────────────────┤
//! │  Invoker  (invoker.rs)                           │
//! │  ├── credentials  (credentials.rs)               │
//! │  ├── signing      (signing.rs)                   │
//! │  ├── transport    (transport.rs)                 │
//! │  ├── metrics      (metrics.rs)                   │
//! │  └── dispatch     (dispatch.rs)                  │
//! ├──────────────────────────────────────────────────┤
//! │  Request / Call  (request.rs)                    │
//! │  XmlNode  (xml.rs) · JSON helpers  (json.rs)     │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## API Protocols
//!
//! | Protocol    | Request body                 | Response body |
//! |-------------|------------------------------|---------------|
//! | Query + XML | form-encoded `Action=...`    | XML           |
//! | JSON 1.1    | JSON + `x-amz-target` header | JSON          |

pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod invoker;
pub mod json;
pub mod metrics;
pub mod pool;
pub mod request;
pub mod signing;
pub mod transport;
pub mod xml;

pub use config::{ClientConfig, Scheme};
pub use credentials::{
    Credentials, CredentialsProvider, CredentialsProviderChain, EnvironmentCredentialsProvider,
    StaticCredentialsProvider,
};
pub use dispatch::{ErrorDispatcher, ErrorUnmarshaller};
pub use error::{ClientError, ErrorType, SdkError, ServiceErrorDetails, ServiceErrorKind};
pub use invoker::{Invoker, InvokerBuilder, Protocol, ServiceMetadata};
pub use metrics::{LogMetricsCollector, MetricsCollector, NoopMetricsCollector, RequestMetrics};
pub use pool::{handler_fn, AsyncHandler, FnHandler, TaskHandle, TaskState, WorkerPool};
pub use request::{Call, HttpMethod, Request};
pub use signing::{RequestSigner, SigV4Signer};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use xml::XmlNode;
