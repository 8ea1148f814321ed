//! Cognito Identity client fragment.
//!
//! Covers the three public identity operations: `GetId`,
//! `GetCredentialsForIdentity` and `GetOpenIdToken`. The service speaks
//! JSON 1.1 (`x-amz-target: AWSCognitoIdentityService.{Operation}`) and
//! these operations are sent unsigned.
//!
//! [`CognitoCredentialsProvider`] turns an identity pool into a
//! [`CredentialsProvider`](lbsdk_core::CredentialsProvider) for the other
//! service clients.
//!
//! Reference: <https://docs.aws.amazon.com/cognitoidentity/latest/APIReference/>

pub mod async_client;
pub mod client;
mod codec;
pub mod error;
pub mod model;
pub mod provider;

pub use async_client::AsyncCognitoIdentityClient;
pub use client::{CognitoIdentityClient, CognitoIdentityClientBuilder};
pub use error::{CognitoIdentityError, CognitoIdentityErrorKind, CognitoIdentityResult};
pub use provider::CognitoCredentialsProvider;

use lbsdk_core::{Protocol, ServiceMetadata};

pub const API_VERSION: &str = "2014-06-30";
pub const ENDPOINT_PREFIX: &str = "cognito-identity";
pub const TARGET_PREFIX: &str = "AWSCognitoIdentityService";
pub const DEFAULT_HOST: &str = "cognito-identity.us-east-1.amazonaws.com";

pub const COGNITO_IDENTITY_SERVICE: ServiceMetadata = ServiceMetadata {
    signing_name: ENDPOINT_PREFIX,
    endpoint_prefix: ENDPOINT_PREFIX,
    default_host: DEFAULT_HOST,
    api_version: API_VERSION,
    protocol: Protocol::Json {
        target_prefix: TARGET_PREFIX,
    },
};
