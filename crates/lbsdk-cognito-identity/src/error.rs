//! Typed Cognito Identity service errors.

use lbsdk_core::{SdkError, ServiceErrorKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CognitoIdentityErrorKind {
    InvalidParameter,
    /// The logins map was rejected or the pool forbids unauthenticated access.
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InternalError,
    LimitExceeded,
    ResourceNotFound,
    /// A login provider (Facebook, Google, ...) failed to validate the token.
    ExternalService,
    InvalidIdentityPoolConfiguration,
}

const ALL: &[CognitoIdentityErrorKind] = &[
    CognitoIdentityErrorKind::InvalidParameter,
    CognitoIdentityErrorKind::NotAuthorized,
    CognitoIdentityErrorKind::ResourceConflict,
    CognitoIdentityErrorKind::TooManyRequests,
    CognitoIdentityErrorKind::InternalError,
    CognitoIdentityErrorKind::LimitExceeded,
    CognitoIdentityErrorKind::ResourceNotFound,
    CognitoIdentityErrorKind::ExternalService,
    CognitoIdentityErrorKind::InvalidIdentityPoolConfiguration,
];

impl CognitoIdentityErrorKind {
    /// Errors caused by load or a service fault rather than by the request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CognitoIdentityErrorKind::TooManyRequests
                | CognitoIdentityErrorKind::InternalError
                | CognitoIdentityErrorKind::ExternalService
        )
    }
}

impl ServiceErrorKind for CognitoIdentityErrorKind {
    fn all() -> &'static [Self] {
        ALL
    }

    fn code(&self) -> &'static str {
        match self {
            CognitoIdentityErrorKind::InvalidParameter => "InvalidParameterException",
            CognitoIdentityErrorKind::NotAuthorized => "NotAuthorizedException",
            CognitoIdentityErrorKind::ResourceConflict => "ResourceConflictException",
            CognitoIdentityErrorKind::TooManyRequests => "TooManyRequestsException",
            CognitoIdentityErrorKind::InternalError => "InternalErrorException",
            CognitoIdentityErrorKind::LimitExceeded => "LimitExceededException",
            CognitoIdentityErrorKind::ResourceNotFound => "ResourceNotFoundException",
            CognitoIdentityErrorKind::ExternalService => "ExternalServiceException",
            CognitoIdentityErrorKind::InvalidIdentityPoolConfiguration => {
                "InvalidIdentityPoolConfigurationException"
            }
        }
    }
}

impl fmt::Display for CognitoIdentityErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub type CognitoIdentityError = SdkError<CognitoIdentityErrorKind>;
pub type CognitoIdentityResult<T> = Result<T, CognitoIdentityError>;
