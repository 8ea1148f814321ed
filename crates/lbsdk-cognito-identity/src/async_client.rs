//! Pooled Cognito Identity client.

use crate::client::CognitoIdentityClient;
use crate::error::CognitoIdentityErrorKind;
use crate::model::*;
use lbsdk_core::{AsyncHandler, Call, ClientError, TaskHandle, WorkerPool};
use std::sync::Arc;
use std::time::Duration;

/// Runs [`CognitoIdentityClient`] calls on a bounded worker pool.
pub struct AsyncCognitoIdentityClient {
    client: Arc<CognitoIdentityClient>,
    pool: WorkerPool,
}

impl AsyncCognitoIdentityClient {
    pub fn new(client: CognitoIdentityClient) -> Result<Self, ClientError> {
        let size = client.config().async_pool_size;
        Ok(Self {
            client: Arc::new(client),
            pool: WorkerPool::new(size)?,
        })
    }

    pub fn client(&self) -> &CognitoIdentityClient {
        &self.client
    }

    /// Drain queued and running calls for at most `timeout`; blocks the
    /// calling thread.
    pub fn shutdown_graceful(self, timeout: Duration) {
        self.pool.shutdown_graceful(timeout)
    }

    pub fn shutdown_now(self) {
        self.pool.shutdown_now()
    }
}

macro_rules! async_operations {
    ($($op:ident, $op_async:ident, $op_with_handler:ident: $req:ty => $res:ty;)*) => {
        impl AsyncCognitoIdentityClient {
            $(
                pub fn $op_async(&self, call: impl Into<Call<$req>>) -> TaskHandle<$res, CognitoIdentityErrorKind> {
                    let client = Arc::clone(&self.client);
                    let call = call.into();
                    self.pool.submit(move || client.$op(call))
                }

                pub fn $op_with_handler<H>(
                    &self,
                    call: impl Into<Call<$req>>,
                    handler: H,
                ) -> TaskHandle<$res, CognitoIdentityErrorKind>
                where
                    H: AsyncHandler<$req, $res, CognitoIdentityErrorKind>,
                {
                    let client = Arc::clone(&self.client);
                    let call: Call<$req> = call.into();
                    let request = call.request.clone();
                    self.pool.submit_with_handler(request, handler, move || client.$op(call))
                }
            )*
        }
    };
}

async_operations! {
    get_id, get_id_async, get_id_async_with_handler: GetIdRequest => GetIdResult;
    get_credentials_for_identity,
    get_credentials_for_identity_async,
    get_credentials_for_identity_async_with_handler:
        GetCredentialsForIdentityRequest => GetCredentialsForIdentityResult;
    get_open_id_token, get_open_id_token_async, get_open_id_token_async_with_handler:
        GetOpenIdTokenRequest => GetOpenIdTokenResult;
}

impl std::fmt::Debug for AsyncCognitoIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCognitoIdentityClient")
            .field("client", &self.client)
            .field("pool", &self.pool)
            .finish()
    }
}
