//! JSON 1.1 marshallers and unmarshallers.
//!
//! The body is the serialized request; the invoker adds the
//! `x-amz-target` and content-type headers from the service metadata.

use crate::model::*;
use lbsdk_core::{json, ClientError, HttpResponse, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;

type Marshalled = Result<Request, ClientError>;

fn required<'a>(op: &'static str, field: &'static str, value: &'a Option<String>) -> Result<&'a str, ClientError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::missing(op, field)),
    }
}

/// An unsigned JSON call carrying `body`.
fn unsigned_json<T: Serialize>(op: &'static str, body: &T) -> Marshalled {
    let mut r = Request::new(op);
    r.content = Some(json::to_body(body)?);
    r.unsigned = true;
    Ok(r)
}

pub(crate) fn get_id(req: &GetIdRequest) -> Marshalled {
    const OP: &str = "GetId";
    required(OP, "IdentityPoolId", &req.identity_pool_id)?;
    unsigned_json(OP, req)
}

pub(crate) fn get_credentials_for_identity(req: &GetCredentialsForIdentityRequest) -> Marshalled {
    const OP: &str = "GetCredentialsForIdentity";
    required(OP, "IdentityId", &req.identity_id)?;
    unsigned_json(OP, req)
}

pub(crate) fn get_open_id_token(req: &GetOpenIdTokenRequest) -> Marshalled {
    const OP: &str = "GetOpenIdToken";
    required(OP, "IdentityId", &req.identity_id)?;
    unsigned_json(OP, req)
}

pub(crate) fn decode<T: DeserializeOwned>(resp: &HttpResponse) -> Result<T, ClientError> {
    json::from_body(&resp.body)
}
