//! XML response bodies → typed results.
//!
//! Lists come wrapped in `<member>` elements; an absent list element
//! decodes to an empty `Vec`. Unknown elements are skipped.

use crate::model::*;
use lbsdk_core::xml::XmlNode;
use lbsdk_core::{ClientError, HttpResponse};

type Decoded<T> = Result<T, ClientError>;

fn result_node(resp: &HttpResponse, action: &str) -> Decoded<XmlNode> {
    XmlNode::parse_result(&resp.body_text(), action)
}

/// Optional nested structure.
fn nested<T>(node: &XmlNode, name: &str, decode: impl Fn(&XmlNode) -> Decoded<T>) -> Decoded<Option<T>> {
    node.child(name).map(decode).transpose()
}

// ── Value types ─────────────────────────────────────────────────────────

fn listener(n: &XmlNode) -> Decoded<Listener> {
    Ok(Listener {
        protocol: n.string("Protocol"),
        load_balancer_port: n.int("LoadBalancerPort")?,
        instance_protocol: n.string("InstanceProtocol"),
        instance_port: n.int("InstancePort")?,
        ssl_certificate_id: n.string("SSLCertificateId"),
    })
}

fn listener_description(n: &XmlNode) -> Decoded<ListenerDescription> {
    Ok(ListenerDescription {
        listener: nested(n, "Listener", listener)?,
        policy_names: n.string_list("PolicyNames"),
    })
}

fn health_check(n: &XmlNode) -> Decoded<HealthCheck> {
    Ok(HealthCheck {
        target: n.string("Target"),
        interval: n.int("Interval")?,
        timeout: n.int("Timeout")?,
        unhealthy_threshold: n.int("UnhealthyThreshold")?,
        healthy_threshold: n.int("HealthyThreshold")?,
    })
}

fn instance(n: &XmlNode) -> Decoded<Instance> {
    Ok(Instance {
        instance_id: n.string("InstanceId"),
    })
}

fn instance_state(n: &XmlNode) -> Decoded<InstanceState> {
    Ok(InstanceState {
        instance_id: n.string("InstanceId"),
        state: n.string("State"),
        reason_code: n.string("ReasonCode"),
        description: n.string("Description"),
    })
}

fn tag(n: &XmlNode) -> Decoded<Tag> {
    Ok(Tag {
        key: n.string("Key"),
        value: n.string("Value"),
    })
}

fn tag_description(n: &XmlNode) -> Decoded<TagDescription> {
    Ok(TagDescription {
        load_balancer_name: n.string("LoadBalancerName"),
        tags: n.member_list("Tags", tag)?,
    })
}

fn policies(n: &XmlNode) -> Decoded<Policies> {
    Ok(Policies {
        app_cookie_stickiness_policies: n.member_list("AppCookieStickinessPolicies", |m| {
            Ok(AppCookieStickinessPolicy {
                policy_name: m.string("PolicyName"),
                cookie_name: m.string("CookieName"),
            })
        })?,
        lb_cookie_stickiness_policies: n.member_list("LBCookieStickinessPolicies", |m| {
            Ok(LBCookieStickinessPolicy {
                policy_name: m.string("PolicyName"),
                cookie_expiration_period: m.long("CookieExpirationPeriod")?,
            })
        })?,
        other_policies: n.string_list("OtherPolicies"),
    })
}

fn backend_server_description(n: &XmlNode) -> Decoded<BackendServerDescription> {
    Ok(BackendServerDescription {
        instance_port: n.int("InstancePort")?,
        policy_names: n.string_list("PolicyNames"),
    })
}

fn source_security_group(n: &XmlNode) -> Decoded<SourceSecurityGroup> {
    Ok(SourceSecurityGroup {
        owner_alias: n.string("OwnerAlias"),
        group_name: n.string("GroupName"),
    })
}

fn load_balancer_description(n: &XmlNode) -> Decoded<LoadBalancerDescription> {
    Ok(LoadBalancerDescription {
        load_balancer_name: n.string("LoadBalancerName"),
        dns_name: n.string("DNSName"),
        canonical_hosted_zone_name: n.string("CanonicalHostedZoneName"),
        canonical_hosted_zone_name_id: n.string("CanonicalHostedZoneNameID"),
        listener_descriptions: n.member_list("ListenerDescriptions", listener_description)?,
        policies: nested(n, "Policies", policies)?,
        backend_server_descriptions: n.member_list("BackendServerDescriptions", backend_server_description)?,
        availability_zones: n.string_list("AvailabilityZones"),
        subnets: n.string_list("Subnets"),
        vpc_id: n.string("VPCId"),
        instances: n.member_list("Instances", instance)?,
        health_check: nested(n, "HealthCheck", health_check)?,
        source_security_group: nested(n, "SourceSecurityGroup", source_security_group)?,
        security_groups: n.string_list("SecurityGroups"),
        created_time: n.timestamp("CreatedTime")?,
        scheme: n.string("Scheme"),
    })
}

fn load_balancer_attributes(n: &XmlNode) -> Decoded<LoadBalancerAttributes> {
    Ok(LoadBalancerAttributes {
        cross_zone_load_balancing: nested(n, "CrossZoneLoadBalancing", |c| {
            Ok(CrossZoneLoadBalancing {
                enabled: c.bool("Enabled")?,
            })
        })?,
        access_log: nested(n, "AccessLog", |a| {
            Ok(AccessLog {
                enabled: a.bool("Enabled")?,
                s3_bucket_name: a.string("S3BucketName"),
                emit_interval: a.int("EmitInterval")?,
                s3_bucket_prefix: a.string("S3BucketPrefix"),
            })
        })?,
        connection_draining: nested(n, "ConnectionDraining", |d| {
            Ok(ConnectionDraining {
                enabled: d.bool("Enabled")?,
                timeout: d.int("Timeout")?,
            })
        })?,
        connection_settings: nested(n, "ConnectionSettings", |s| {
            Ok(ConnectionSettings {
                idle_timeout: s.int("IdleTimeout")?,
            })
        })?,
        additional_attributes: n.member_list("AdditionalAttributes", |m| {
            Ok(AdditionalAttribute {
                key: m.string("Key"),
                value: m.string("Value"),
            })
        })?,
    })
}

fn policy_description(n: &XmlNode) -> Decoded<PolicyDescription> {
    Ok(PolicyDescription {
        policy_name: n.string("PolicyName"),
        policy_type_name: n.string("PolicyTypeName"),
        policy_attribute_descriptions: n.member_list("PolicyAttributeDescriptions", |m| {
            Ok(PolicyAttributeDescription {
                attribute_name: m.string("AttributeName"),
                attribute_value: m.string("AttributeValue"),
            })
        })?,
    })
}

fn policy_type_description(n: &XmlNode) -> Decoded<PolicyTypeDescription> {
    Ok(PolicyTypeDescription {
        policy_type_name: n.string("PolicyTypeName"),
        description: n.string("Description"),
        policy_attribute_type_descriptions: n.member_list("PolicyAttributeTypeDescriptions", |m| {
            Ok(PolicyAttributeTypeDescription {
                attribute_name: m.string("AttributeName"),
                attribute_type: m.string("AttributeType"),
                description: m.string("Description"),
                default_value: m.string("DefaultValue"),
                cardinality: m.string("Cardinality"),
            })
        })?,
    })
}

// ── Operations ──────────────────────────────────────────────────────────

/// Check the envelope of an operation with no result fields.
fn empty(resp: &HttpResponse, action: &str) -> Decoded<EmptyResult> {
    result_node(resp, action).map(|_| EmptyResult)
}

macro_rules! empty_results {
    ($($fn_name:ident => $action:literal),* $(,)?) => {
        $(
            pub(crate) fn $fn_name(resp: &HttpResponse) -> Decoded<EmptyResult> {
                empty(resp, $action)
            }
        )*
    };
}

empty_results! {
    add_tags => "AddTags",
    remove_tags => "RemoveTags",
    create_app_cookie_stickiness_policy => "CreateAppCookieStickinessPolicy",
    create_lb_cookie_stickiness_policy => "CreateLBCookieStickinessPolicy",
    create_load_balancer_listeners => "CreateLoadBalancerListeners",
    create_load_balancer_policy => "CreateLoadBalancerPolicy",
    delete_load_balancer => "DeleteLoadBalancer",
    delete_load_balancer_listeners => "DeleteLoadBalancerListeners",
    delete_load_balancer_policy => "DeleteLoadBalancerPolicy",
    set_load_balancer_listener_ssl_certificate => "SetLoadBalancerListenerSSLCertificate",
    set_load_balancer_policies_for_backend_server => "SetLoadBalancerPoliciesForBackendServer",
    set_load_balancer_policies_of_listener => "SetLoadBalancerPoliciesOfListener",
}

pub(crate) fn create_load_balancer(resp: &HttpResponse) -> Decoded<CreateLoadBalancerResult> {
    let r = result_node(resp, "CreateLoadBalancer")?;
    Ok(CreateLoadBalancerResult {
        dns_name: r.string("DNSName"),
    })
}

pub(crate) fn describe_load_balancers(resp: &HttpResponse) -> Decoded<DescribeLoadBalancersResult> {
    let r = result_node(resp, "DescribeLoadBalancers")?;
    Ok(DescribeLoadBalancersResult {
        load_balancer_descriptions: r.member_list("LoadBalancerDescriptions", load_balancer_description)?,
        next_marker: r.string("NextMarker").filter(|m| !m.is_empty()),
    })
}

pub(crate) fn describe_tags(resp: &HttpResponse) -> Decoded<DescribeTagsResult> {
    let r = result_node(resp, "DescribeTags")?;
    Ok(DescribeTagsResult {
        tag_descriptions: r.member_list("TagDescriptions", tag_description)?,
    })
}

pub(crate) fn apply_security_groups_to_load_balancer(
    resp: &HttpResponse,
) -> Decoded<ApplySecurityGroupsToLoadBalancerResult> {
    let r = result_node(resp, "ApplySecurityGroupsToLoadBalancer")?;
    Ok(ApplySecurityGroupsToLoadBalancerResult {
        security_groups: r.string_list("SecurityGroups"),
    })
}

pub(crate) fn attach_load_balancer_to_subnets(resp: &HttpResponse) -> Decoded<AttachLoadBalancerToSubnetsResult> {
    let r = result_node(resp, "AttachLoadBalancerToSubnets")?;
    Ok(AttachLoadBalancerToSubnetsResult {
        subnets: r.string_list("Subnets"),
    })
}

pub(crate) fn detach_load_balancer_from_subnets(resp: &HttpResponse) -> Decoded<DetachLoadBalancerFromSubnetsResult> {
    let r = result_node(resp, "DetachLoadBalancerFromSubnets")?;
    Ok(DetachLoadBalancerFromSubnetsResult {
        subnets: r.string_list("Subnets"),
    })
}

pub(crate) fn enable_availability_zones_for_load_balancer(
    resp: &HttpResponse,
) -> Decoded<EnableAvailabilityZonesForLoadBalancerResult> {
    let r = result_node(resp, "EnableAvailabilityZonesForLoadBalancer")?;
    Ok(EnableAvailabilityZonesForLoadBalancerResult {
        availability_zones: r.string_list("AvailabilityZones"),
    })
}

pub(crate) fn disable_availability_zones_for_load_balancer(
    resp: &HttpResponse,
) -> Decoded<DisableAvailabilityZonesForLoadBalancerResult> {
    let r = result_node(resp, "DisableAvailabilityZonesForLoadBalancer")?;
    Ok(DisableAvailabilityZonesForLoadBalancerResult {
        availability_zones: r.string_list("AvailabilityZones"),
    })
}

pub(crate) fn configure_health_check(resp: &HttpResponse) -> Decoded<ConfigureHealthCheckResult> {
    let r = result_node(resp, "ConfigureHealthCheck")?;
    Ok(ConfigureHealthCheckResult {
        health_check: nested(&r, "HealthCheck", health_check)?,
    })
}

pub(crate) fn describe_load_balancer_attributes(
    resp: &HttpResponse,
) -> Decoded<DescribeLoadBalancerAttributesResult> {
    let r = result_node(resp, "DescribeLoadBalancerAttributes")?;
    Ok(DescribeLoadBalancerAttributesResult {
        load_balancer_attributes: nested(&r, "LoadBalancerAttributes", load_balancer_attributes)?,
    })
}

pub(crate) fn modify_load_balancer_attributes(resp: &HttpResponse) -> Decoded<ModifyLoadBalancerAttributesResult> {
    let r = result_node(resp, "ModifyLoadBalancerAttributes")?;
    Ok(ModifyLoadBalancerAttributesResult {
        load_balancer_name: r.string("LoadBalancerName"),
        load_balancer_attributes: nested(&r, "LoadBalancerAttributes", load_balancer_attributes)?,
    })
}

pub(crate) fn describe_load_balancer_policies(resp: &HttpResponse) -> Decoded<DescribeLoadBalancerPoliciesResult> {
    let r = result_node(resp, "DescribeLoadBalancerPolicies")?;
    Ok(DescribeLoadBalancerPoliciesResult {
        policy_descriptions: r.member_list("PolicyDescriptions", policy_description)?,
    })
}

pub(crate) fn describe_load_balancer_policy_types(
    resp: &HttpResponse,
) -> Decoded<DescribeLoadBalancerPolicyTypesResult> {
    let r = result_node(resp, "DescribeLoadBalancerPolicyTypes")?;
    Ok(DescribeLoadBalancerPolicyTypesResult {
        policy_type_descriptions: r.member_list("PolicyTypeDescriptions", policy_type_description)?,
    })
}

pub(crate) fn register_instances_with_load_balancer(
    resp: &HttpResponse,
) -> Decoded<RegisterInstancesWithLoadBalancerResult> {
    let r = result_node(resp, "RegisterInstancesWithLoadBalancer")?;
    Ok(RegisterInstancesWithLoadBalancerResult {
        instances: r.member_list("Instances", instance)?,
    })
}

pub(crate) fn deregister_instances_from_load_balancer(
    resp: &HttpResponse,
) -> Decoded<DeregisterInstancesFromLoadBalancerResult> {
    let r = result_node(resp, "DeregisterInstancesFromLoadBalancer")?;
    Ok(DeregisterInstancesFromLoadBalancerResult {
        instances: r.member_list("Instances", instance)?,
    })
}

pub(crate) fn describe_instance_health(resp: &HttpResponse) -> Decoded<DescribeInstanceHealthResult> {
    let r = result_node(resp, "DescribeInstanceHealth")?;
    Ok(DescribeInstanceHealthResult {
        instance_states: r.member_list("InstanceStates", instance_state)?,
    })
}
