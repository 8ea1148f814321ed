//! Blocking Cognito Identity client.

use crate::codec;
use crate::error::{CognitoIdentityErrorKind, CognitoIdentityResult};
use crate::model::*;
use crate::COGNITO_IDENTITY_SERVICE;
use lbsdk_core::{
    Call, ClientConfig, ClientError, ErrorUnmarshaller, HttpTransport, Invoker, InvokerBuilder, MetricsCollector,
};
use std::sync::Arc;
use url::Url;

/// Synchronous Cognito Identity client.
///
/// The identity operations are public, so the client needs no credentials
/// of its own.
pub struct CognitoIdentityClient {
    invoker: Invoker<CognitoIdentityErrorKind>,
    config: ClientConfig,
}

impl CognitoIdentityClient {
    pub fn builder() -> CognitoIdentityClientBuilder {
        CognitoIdentityClientBuilder::new()
    }

    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Url {
        self.invoker.endpoint()
    }

    pub fn register_error_unmarshaller(
        &mut self,
        unmarshaller: Box<dyn ErrorUnmarshaller<CognitoIdentityErrorKind>>,
    ) {
        self.invoker.dispatcher_mut().register(unmarshaller);
    }

    /// Look up or create the identity id for a pool and set of logins.
    pub fn get_id(&self, call: impl Into<Call<GetIdRequest>>) -> CognitoIdentityResult<GetIdResult> {
        self.invoker.execute(call.into(), codec::get_id, codec::decode)
    }

    /// Temporary credentials for an identity, assuming the pool's role.
    pub fn get_credentials_for_identity(
        &self,
        call: impl Into<Call<GetCredentialsForIdentityRequest>>,
    ) -> CognitoIdentityResult<GetCredentialsForIdentityResult> {
        self.invoker
            .execute(call.into(), codec::get_credentials_for_identity, codec::decode)
    }

    pub fn get_open_id_token(
        &self,
        call: impl Into<Call<GetOpenIdTokenRequest>>,
    ) -> CognitoIdentityResult<GetOpenIdTokenResult> {
        self.invoker.execute(call.into(), codec::get_open_id_token, codec::decode)
    }
}

impl std::fmt::Debug for CognitoIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoIdentityClient")
            .field("endpoint", &self.invoker.endpoint().as_str())
            .field("signing_region", &self.invoker.signing_region())
            .finish()
    }
}

pub struct CognitoIdentityClientBuilder {
    inner: InvokerBuilder<CognitoIdentityErrorKind>,
}

impl CognitoIdentityClientBuilder {
    pub fn new() -> Self {
        Self {
            inner: InvokerBuilder::new(COGNITO_IDENTITY_SERVICE),
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.config(config);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.inner = self.inner.transport(transport);
        self
    }

    pub fn metrics(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.inner = self.inner.metrics(collector);
        self
    }

    pub fn build(self) -> Result<CognitoIdentityClient, ClientError> {
        let config = self.inner.client_config().clone();
        let invoker = self.inner.build()?;
        Ok(CognitoIdentityClient { invoker, config })
    }
}

impl Default for CognitoIdentityClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
