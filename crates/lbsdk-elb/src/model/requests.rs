use super::types::*;
use serde::{Deserialize, Serialize};

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

// ── Tags ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddTagsRequest {
    /// Exactly one name is accepted by the service today.
    pub load_balancer_names: Vec<String>,
    pub tags: Vec<Tag>,
}

impl AddTagsRequest {
    pub fn new(load_balancer_name: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            load_balancer_names: vec![load_balancer_name.into()],
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoveTagsRequest {
    pub load_balancer_names: Vec<String>,
    pub tags: Vec<TagKeyOnly>,
}

impl RemoveTagsRequest {
    pub fn new<I, K>(load_balancer_name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            load_balancer_names: vec![load_balancer_name.into()],
            tags: keys.into_iter().map(TagKeyOnly::new).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeTagsRequest {
    pub load_balancer_names: Vec<String>,
}

impl DescribeTagsRequest {
    pub fn new<I, S>(load_balancer_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            load_balancer_names: strings(load_balancer_names),
        }
    }
}

// ── Network placement ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplySecurityGroupsToLoadBalancerRequest {
    pub load_balancer_name: Option<String>,
    pub security_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachLoadBalancerToSubnetsRequest {
    pub load_balancer_name: Option<String>,
    pub subnets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetachLoadBalancerFromSubnetsRequest {
    pub load_balancer_name: Option<String>,
    pub subnets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnableAvailabilityZonesForLoadBalancerRequest {
    pub load_balancer_name: Option<String>,
    pub availability_zones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisableAvailabilityZonesForLoadBalancerRequest {
    pub load_balancer_name: Option<String>,
    pub availability_zones: Vec<String>,
}

/// `new(name, items)` for requests pairing a load balancer with a string list.
macro_rules! name_and_list {
    ($($ty:ident => $list:ident),* $(,)?) => {
        $(
            impl $ty {
                pub fn new<I, S>(load_balancer_name: impl Into<String>, $list: I) -> Self
                where
                    I: IntoIterator<Item = S>,
                    S: Into<String>,
                {
                    Self {
                        load_balancer_name: Some(load_balancer_name.into()),
                        $list: strings($list),
                    }
                }
            }
        )*
    };
}

name_and_list! {
    ApplySecurityGroupsToLoadBalancerRequest => security_groups,
    AttachLoadBalancerToSubnetsRequest => subnets,
    DetachLoadBalancerFromSubnetsRequest => subnets,
    EnableAvailabilityZonesForLoadBalancerRequest => availability_zones,
    DisableAvailabilityZonesForLoadBalancerRequest => availability_zones,
}

// ── Load balancer lifecycle ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateLoadBalancerRequest {
    pub load_balancer_name: Option<String>,
    pub listeners: Vec<Listener>,
    /// Required unless `subnets` is given (EC2-Classic placement).
    pub availability_zones: Vec<String>,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    /// `internal` for a VPC-only load balancer.
    pub scheme: Option<String>,
    pub tags: Vec<Tag>,
}

impl CreateLoadBalancerRequest {
    pub fn new(load_balancer_name: impl Into<String>, listeners: Vec<Listener>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            listeners,
            ..Default::default()
        }
    }
}

string_setters!(CreateLoadBalancerRequest { with_scheme => scheme });

list_setters!(CreateLoadBalancerRequest {
    with_availability_zones => availability_zones: String,
    with_subnets => subnets: String,
    with_security_groups => security_groups: String,
    with_tags => tags: Tag,
});

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteLoadBalancerRequest {
    pub load_balancer_name: Option<String>,
}

impl DeleteLoadBalancerRequest {
    pub fn new(load_balancer_name: impl Into<String>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
        }
    }
}

/// All fields optional: the default request lists every load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancersRequest {
    pub load_balancer_names: Vec<String>,
    /// `NextMarker` of the previous page.
    pub marker: Option<String>,
    /// 1 to 400.
    pub page_size: Option<i32>,
}

impl DescribeLoadBalancersRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

list_setters!(DescribeLoadBalancersRequest { with_load_balancer_names => load_balancer_names: String });
string_setters!(DescribeLoadBalancersRequest { with_marker => marker });
value_setters!(DescribeLoadBalancersRequest { with_page_size => page_size: i32 });

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigureHealthCheckRequest {
    pub load_balancer_name: Option<String>,
    pub health_check: Option<HealthCheck>,
}

impl ConfigureHealthCheckRequest {
    pub fn new(load_balancer_name: impl Into<String>, health_check: HealthCheck) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            health_check: Some(health_check),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancerAttributesRequest {
    pub load_balancer_name: Option<String>,
}

impl DescribeLoadBalancerAttributesRequest {
    pub fn new(load_balancer_name: impl Into<String>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifyLoadBalancerAttributesRequest {
    pub load_balancer_name: Option<String>,
    pub load_balancer_attributes: Option<LoadBalancerAttributes>,
}

impl ModifyLoadBalancerAttributesRequest {
    pub fn new(load_balancer_name: impl Into<String>, attributes: LoadBalancerAttributes) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            load_balancer_attributes: Some(attributes),
        }
    }
}

// ── Listeners ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateLoadBalancerListenersRequest {
    pub load_balancer_name: Option<String>,
    pub listeners: Vec<Listener>,
}

impl CreateLoadBalancerListenersRequest {
    pub fn new(load_balancer_name: impl Into<String>, listeners: Vec<Listener>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            listeners,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteLoadBalancerListenersRequest {
    pub load_balancer_name: Option<String>,
    pub load_balancer_ports: Vec<i32>,
}

impl DeleteLoadBalancerListenersRequest {
    pub fn new(load_balancer_name: impl Into<String>, load_balancer_ports: Vec<i32>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            load_balancer_ports,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetLoadBalancerListenerSSLCertificateRequest {
    pub load_balancer_name: Option<String>,
    pub load_balancer_port: Option<i32>,
    pub ssl_certificate_id: Option<String>,
}

impl SetLoadBalancerListenerSSLCertificateRequest {
    pub fn new(
        load_balancer_name: impl Into<String>,
        load_balancer_port: i32,
        ssl_certificate_id: impl Into<String>,
    ) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            load_balancer_port: Some(load_balancer_port),
            ssl_certificate_id: Some(ssl_certificate_id.into()),
        }
    }
}

// ── Policies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateAppCookieStickinessPolicyRequest {
    pub load_balancer_name: Option<String>,
    pub policy_name: Option<String>,
    /// Name of the application cookie the stickiness follows.
    pub cookie_name: Option<String>,
}

impl CreateAppCookieStickinessPolicyRequest {
    pub fn new(
        load_balancer_name: impl Into<String>,
        policy_name: impl Into<String>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            policy_name: Some(policy_name.into()),
            cookie_name: Some(cookie_name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateLBCookieStickinessPolicyRequest {
    pub load_balancer_name: Option<String>,
    pub policy_name: Option<String>,
    pub cookie_expiration_period: Option<i64>,
}

impl CreateLBCookieStickinessPolicyRequest {
    pub fn new(load_balancer_name: impl Into<String>, policy_name: impl Into<String>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            policy_name: Some(policy_name.into()),
            cookie_expiration_period: None,
        }
    }
}

value_setters!(CreateLBCookieStickinessPolicyRequest {
    with_cookie_expiration_period => cookie_expiration_period: i64,
});

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateLoadBalancerPolicyRequest {
    pub load_balancer_name: Option<String>,
    pub policy_name: Option<String>,
    pub policy_type_name: Option<String>,
    pub policy_attributes: Vec<PolicyAttribute>,
}

impl CreateLoadBalancerPolicyRequest {
    pub fn new(
        load_balancer_name: impl Into<String>,
        policy_name: impl Into<String>,
        policy_type_name: impl Into<String>,
    ) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            policy_name: Some(policy_name.into()),
            policy_type_name: Some(policy_type_name.into()),
            policy_attributes: Vec::new(),
        }
    }
}

list_setters!(CreateLoadBalancerPolicyRequest {
    with_policy_attributes => policy_attributes: PolicyAttribute,
});

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteLoadBalancerPolicyRequest {
    pub load_balancer_name: Option<String>,
    pub policy_name: Option<String>,
}

impl DeleteLoadBalancerPolicyRequest {
    pub fn new(load_balancer_name: impl Into<String>, policy_name: impl Into<String>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            policy_name: Some(policy_name.into()),
        }
    }
}

/// Without a name, describes the sample policies every account has.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancerPoliciesRequest {
    pub load_balancer_name: Option<String>,
    pub policy_names: Vec<String>,
}

string_setters!(DescribeLoadBalancerPoliciesRequest { with_load_balancer_name => load_balancer_name });
list_setters!(DescribeLoadBalancerPoliciesRequest { with_policy_names => policy_names: String });

/// Without names, describes every policy type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeLoadBalancerPolicyTypesRequest {
    pub policy_type_names: Vec<String>,
}

list_setters!(DescribeLoadBalancerPolicyTypesRequest { with_policy_type_names => policy_type_names: String });

/// Replaces the policies of a back-end port; an empty list removes them all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetLoadBalancerPoliciesForBackendServerRequest {
    pub load_balancer_name: Option<String>,
    pub instance_port: Option<i32>,
    pub policy_names: Vec<String>,
}

impl SetLoadBalancerPoliciesForBackendServerRequest {
    pub fn new<I, S>(load_balancer_name: impl Into<String>, instance_port: i32, policy_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            instance_port: Some(instance_port),
            policy_names: strings(policy_names),
        }
    }
}

/// Replaces the policies of a listener; an empty list removes them all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetLoadBalancerPoliciesOfListenerRequest {
    pub load_balancer_name: Option<String>,
    pub load_balancer_port: Option<i32>,
    pub policy_names: Vec<String>,
}

impl SetLoadBalancerPoliciesOfListenerRequest {
    pub fn new<I, S>(load_balancer_name: impl Into<String>, load_balancer_port: i32, policy_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
            load_balancer_port: Some(load_balancer_port),
            policy_names: strings(policy_names),
        }
    }
}

// ── Instances ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterInstancesWithLoadBalancerRequest {
    pub load_balancer_name: Option<String>,
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeregisterInstancesFromLoadBalancerRequest {
    pub load_balancer_name: Option<String>,
    pub instances: Vec<Instance>,
}

/// Without instances, reports every instance registered with the load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeInstanceHealthRequest {
    pub load_balancer_name: Option<String>,
    pub instances: Vec<Instance>,
}

/// `new(name, instance_ids)` for the instance-list requests.
macro_rules! name_and_instances {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                pub fn new<I, S>(load_balancer_name: impl Into<String>, instance_ids: I) -> Self
                where
                    I: IntoIterator<Item = S>,
                    S: Into<String>,
                {
                    Self {
                        load_balancer_name: Some(load_balancer_name.into()),
                        instances: instance_ids.into_iter().map(Instance::new).collect(),
                    }
                }
            }
        )*
    };
}

name_and_instances!(
    RegisterInstancesWithLoadBalancerRequest,
    DeregisterInstancesFromLoadBalancerRequest,
    DescribeInstanceHealthRequest,
);
