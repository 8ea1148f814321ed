//! # lbsdk
//!
//! Typed clients for Elastic Load Balancing (Classic) and Cognito Identity,
//! built on one shared request pipeline (`lbsdk-core`).
//!
//! | Feature            | Crate                    | Protocol   |
//! |--------------------|--------------------------|------------|
//! | `elb`              | `lbsdk-elb`              | Query/XML  |
//! | `cognito-identity` | `lbsdk-cognito-identity` | JSON 1.1   |
//!
//! Both features are on by default. The core runtime (credentials, signing,
//! transport, error types, worker pool) is always available as [`runtime`].
//!
//! ```no_run
//! use lbsdk::elb::{model::DescribeLoadBalancersRequest, ElbClient};
//! use lbsdk::runtime::ClientConfig;
//!
//! let client = ElbClient::new(ClientConfig::default().with_region("eu-west-1"))?;
//! for lb in client.describe_load_balancers(DescribeLoadBalancersRequest::new())?.load_balancer_descriptions {
//!     println!("{:?}", lb.load_balancer_name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use lbsdk_core as runtime;

#[cfg(feature = "elb")]
pub use lbsdk_elb as elb;

#[cfg(feature = "cognito-identity")]
pub use lbsdk_cognito_identity as cognito_identity;

pub use lbsdk_core::{
    Call, ClientConfig, ClientError, Credentials, CredentialsProvider, SdkError, ServiceErrorDetails, TaskHandle,
};
