//! Typed ELB service errors.

use lbsdk_core::{SdkError, ServiceErrorKind};
use std::fmt;

/// Error codes the load balancer control plane returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElbErrorKind {
    /// The SSL certificate ID does not refer to a valid IAM certificate.
    CertificateNotFound,
    DuplicateListener,
    DuplicateLoadBalancerName,
    DuplicatePolicyName,
    DuplicateTagKeys,
    InvalidConfigurationRequest,
    /// An instance ID does not refer to a valid, running instance.
    InvalidInstance,
    InvalidScheme,
    InvalidSecurityGroup,
    InvalidSubnet,
    ListenerNotFound,
    LoadBalancerAttributeNotFound,
    LoadBalancerNotFound,
    PolicyNotFound,
    PolicyTypeNotFound,
    SubnetNotFound,
    TooManyLoadBalancers,
    TooManyPolicies,
    TooManyTags,
}

const ALL: &[ElbErrorKind] = &[
    ElbErrorKind::CertificateNotFound,
    ElbErrorKind::DuplicateListener,
    ElbErrorKind::DuplicateLoadBalancerName,
    ElbErrorKind::DuplicatePolicyName,
    ElbErrorKind::DuplicateTagKeys,
    ElbErrorKind::InvalidConfigurationRequest,
    ElbErrorKind::InvalidInstance,
    ElbErrorKind::InvalidScheme,
    ElbErrorKind::InvalidSecurityGroup,
    ElbErrorKind::InvalidSubnet,
    ElbErrorKind::ListenerNotFound,
    ElbErrorKind::LoadBalancerAttributeNotFound,
    ElbErrorKind::LoadBalancerNotFound,
    ElbErrorKind::PolicyNotFound,
    ElbErrorKind::PolicyTypeNotFound,
    ElbErrorKind::SubnetNotFound,
    ElbErrorKind::TooManyLoadBalancers,
    ElbErrorKind::TooManyPolicies,
    ElbErrorKind::TooManyTags,
];

impl ElbErrorKind {
    /// Whether the error names a resource that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ElbErrorKind::CertificateNotFound
                | ElbErrorKind::ListenerNotFound
                | ElbErrorKind::LoadBalancerAttributeNotFound
                | ElbErrorKind::LoadBalancerNotFound
                | ElbErrorKind::PolicyNotFound
                | ElbErrorKind::PolicyTypeNotFound
                | ElbErrorKind::SubnetNotFound
        )
    }

    /// Whether the error is an account quota being hit.
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(
            self,
            ElbErrorKind::TooManyLoadBalancers | ElbErrorKind::TooManyPolicies | ElbErrorKind::TooManyTags
        )
    }
}

impl ServiceErrorKind for ElbErrorKind {
    fn all() -> &'static [Self] {
        ALL
    }

    fn code(&self) -> &'static str {
        match self {
            ElbErrorKind::CertificateNotFound => "CertificateNotFound",
            ElbErrorKind::DuplicateListener => "DuplicateListener",
            ElbErrorKind::DuplicateLoadBalancerName => "DuplicateLoadBalancerName",
            ElbErrorKind::DuplicatePolicyName => "DuplicatePolicyName",
            ElbErrorKind::DuplicateTagKeys => "DuplicateTagKeys",
            ElbErrorKind::InvalidConfigurationRequest => "InvalidConfigurationRequest",
            ElbErrorKind::InvalidInstance => "InvalidInstance",
            ElbErrorKind::InvalidScheme => "InvalidScheme",
            ElbErrorKind::InvalidSecurityGroup => "InvalidSecurityGroup",
            ElbErrorKind::InvalidSubnet => "InvalidSubnet",
            ElbErrorKind::ListenerNotFound => "ListenerNotFound",
            ElbErrorKind::LoadBalancerAttributeNotFound => "LoadBalancerAttributeNotFound",
            ElbErrorKind::LoadBalancerNotFound => "LoadBalancerNotFound",
            ElbErrorKind::PolicyNotFound => "PolicyNotFound",
            ElbErrorKind::PolicyTypeNotFound => "PolicyTypeNotFound",
            ElbErrorKind::SubnetNotFound => "SubnetNotFound",
            ElbErrorKind::TooManyLoadBalancers => "TooManyLoadBalancers",
            ElbErrorKind::TooManyPolicies => "TooManyPolicies",
            ElbErrorKind::TooManyTags => "TooManyTags",
        }
    }
}

impl fmt::Display for ElbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The outcome of a failed ELB call.
pub type ElbError = SdkError<ElbErrorKind>;

pub type ElbResult<T> = Result<T, ElbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = ElbErrorKind::all().iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), ElbErrorKind::all().len());
        assert_eq!(codes.len(), 19);
    }

    #[test]
    fn from_code_round_trips() {
        for kind in ElbErrorKind::all() {
            assert_eq!(ElbErrorKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(ElbErrorKind::from_code("Throttling"), None);
    }

    #[test]
    fn groups() {
        assert!(ElbErrorKind::LoadBalancerNotFound.is_not_found());
        assert!(!ElbErrorKind::DuplicateListener.is_not_found());
        assert!(ElbErrorKind::TooManyTags.is_limit_exceeded());
    }
}
