//! Classic Elastic Load Balancing client.
//!
//! Mirrors the `2012-06-01` ELB API. The service speaks the AWS Query
//! protocol: form-encoded requests, XML responses, SigV4 signing. Every
//! operation is available on [`ElbClient`] (blocking) and on
//! [`AsyncElbClient`] (pooled, returning a [`TaskHandle`]).
//!
//! ```no_run
//! use lbsdk_elb::{ElbClient, model::*};
//!
//! let client = ElbClient::builder().build()?;
//! let created = client.create_load_balancer(
//!     CreateLoadBalancerRequest::new("web", vec![Listener::new("HTTP", 80, 8080)]),
//! )?;
//! println!("{}", created.dns_name.unwrap_or_default());
//! # Ok::<(), lbsdk_elb::ElbError>(())
//! ```
//!
//! Reference: <https://docs.aws.amazon.com/elasticloadbalancing/2012-06-01/APIReference/>

pub mod async_client;
pub mod client;
pub mod error;
mod marshall;
pub mod model;
mod unmarshall;

pub use async_client::AsyncElbClient;
pub use client::{ElbClient, ElbClientBuilder};
pub use error::{ElbError, ElbErrorKind, ElbResult};
pub use lbsdk_core::{Call, ClientConfig, Credentials, TaskHandle};

use lbsdk_core::{Protocol, ServiceMetadata};

pub const API_VERSION: &str = "2012-06-01";
pub const ENDPOINT_PREFIX: &str = "elasticloadbalancing";
pub const DEFAULT_HOST: &str = "elasticloadbalancing.amazonaws.com";

pub const ELB_SERVICE: ServiceMetadata = ServiceMetadata {
    signing_name: ENDPOINT_PREFIX,
    endpoint_prefix: ENDPOINT_PREFIX,
    default_host: DEFAULT_HOST,
    api_version: API_VERSION,
    protocol: Protocol::Query,
};
