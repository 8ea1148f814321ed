use super::types::*;
use serde::{Deserialize, Serialize};

/// Result of the operations whose response carries no fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmptyResult;

pub type AddTagsResult = EmptyResult;
pub type RemoveTagsResult = EmptyResult;
pub type CreateAppCookieStickinessPolicyResult = EmptyResult;
pub type CreateLBCookieStickinessPolicyResult = EmptyResult;
pub type CreateLoadBalancerListenersResult = EmptyResult;
pub type CreateLoadBalancerPolicyResult = EmptyResult;
pub type DeleteLoadBalancerResult = EmptyResult;
pub type DeleteLoadBalancerListenersResult = EmptyResult;
pub type DeleteLoadBalancerPolicyResult = EmptyResult;
pub type SetLoadBalancerListenerSSLCertificateResult = EmptyResult;
pub type SetLoadBalancerPoliciesForBackendServerResult = EmptyResult;
pub type SetLoadBalancerPoliciesOfListenerResult = EmptyResult;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateLoadBalancerResult {
    pub dns_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancersResult {
    pub load_balancer_descriptions: Vec<LoadBalancerDescription>,
    /// Set when more results are available; pass it back as `marker`.
    pub next_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeTagsResult {
    pub tag_descriptions: Vec<TagDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplySecurityGroupsToLoadBalancerResult {
    /// Security groups now associated with the load balancer.
    pub security_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachLoadBalancerToSubnetsResult {
    /// All subnets the load balancer is attached to afterwards.
    pub subnets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetachLoadBalancerFromSubnetsResult {
    pub subnets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnableAvailabilityZonesForLoadBalancerResult {
    pub availability_zones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisableAvailabilityZonesForLoadBalancerResult {
    pub availability_zones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigureHealthCheckResult {
    pub health_check: Option<HealthCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancerAttributesResult {
    pub load_balancer_attributes: Option<LoadBalancerAttributes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifyLoadBalancerAttributesResult {
    pub load_balancer_name: Option<String>,
    pub load_balancer_attributes: Option<LoadBalancerAttributes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancerPoliciesResult {
    pub policy_descriptions: Vec<PolicyDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancerPolicyTypesResult {
    pub policy_type_descriptions: Vec<PolicyTypeDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterInstancesWithLoadBalancerResult {
    /// Every instance registered after the call.
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeregisterInstancesFromLoadBalancerResult {
    /// Instances still registered after the call.
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeInstanceHealthResult {
    pub instance_states: Vec<InstanceState>,
}
