//! Request → Query-protocol call descriptors.
//!
//! Each function validates required fields before touching the wire format,
//! so a call with a missing field fails without any network I/O.

use crate::model::*;
use crate::API_VERSION;
use lbsdk_core::{ClientError, Request};

type Marshalled = Result<Request, ClientError>;

const MAX_PAGE_SIZE: i32 = 400;

fn required<'a>(op: &'static str, field: &'static str, value: &'a Option<String>) -> Result<&'a str, ClientError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::missing(op, field)),
    }
}

fn required_value<T: Copy>(op: &'static str, field: &'static str, value: Option<T>) -> Result<T, ClientError> {
    value.ok_or_else(|| ClientError::missing(op, field))
}

fn required_list<'a, T>(op: &'static str, field: &'static str, items: &'a [T]) -> Result<&'a [T], ClientError> {
    if items.is_empty() {
        Err(ClientError::missing(op, field))
    } else {
        Ok(items)
    }
}

fn port(op: &'static str, field: &'static str, value: Option<i32>) -> Result<i32, ClientError> {
    let port = required_value(op, field, value)?;
    if !(1..=65535).contains(&port) {
        return Err(ClientError::invalid(op, field, format!("{} is not a valid port", port)));
    }
    Ok(port)
}

fn query(op: &'static str) -> Request {
    Request::query(op, API_VERSION)
}

fn add_listeners(r: &mut Request, op: &'static str, listeners: &[Listener]) -> Result<(), ClientError> {
    r.add_member_structs("Listeners", listeners, |r, prefix, l| {
        r.add_parameter(format!("{}.Protocol", prefix), required(op, "Listener.Protocol", &l.protocol)?);
        r.add_parameter(
            format!("{}.LoadBalancerPort", prefix),
            port(op, "Listener.LoadBalancerPort", l.load_balancer_port)?.to_string(),
        );
        r.add_optional(format!("{}.InstanceProtocol", prefix), l.instance_protocol.as_deref());
        r.add_parameter(
            format!("{}.InstancePort", prefix),
            port(op, "Listener.InstancePort", l.instance_port)?.to_string(),
        );
        r.add_optional(format!("{}.SSLCertificateId", prefix), l.ssl_certificate_id.as_deref());
        Ok(())
    })
}

fn add_tag_members(r: &mut Request, op: &'static str, tags: &[Tag]) -> Result<(), ClientError> {
    r.add_member_structs("Tags", tags, |r, prefix, tag| {
        r.add_parameter(format!("{}.Key", prefix), required(op, "Tag.Key", &tag.key)?);
        r.add_optional(format!("{}.Value", prefix), tag.value.as_deref());
        Ok(())
    })
}

fn add_instances(r: &mut Request, op: &'static str, instances: &[Instance]) -> Result<(), ClientError> {
    r.add_member_structs("Instances", instances, |r, prefix, instance| {
        r.add_parameter(
            format!("{}.InstanceId", prefix),
            required(op, "Instance.InstanceId", &instance.instance_id)?,
        );
        Ok(())
    })
}

/// `{name}` plus a required string list, the shape most ELB mutations share.
fn name_and_list(
    op: &'static str,
    name: &Option<String>,
    list_field: &'static str,
    items: &[String],
) -> Marshalled {
    let mut r = query(op);
    r.add_parameter("LoadBalancerName", required(op, "LoadBalancerName", name)?);
    r.add_member_list(list_field, required_list(op, list_field, items)?);
    Ok(r)
}

fn name_only(op: &'static str, name: &Option<String>) -> Marshalled {
    let mut r = query(op);
    r.add_parameter("LoadBalancerName", required(op, "LoadBalancerName", name)?);
    Ok(r)
}

// ── Operations ──────────────────────────────────────────────────────────

pub(crate) fn add_tags(req: &AddTagsRequest) -> Marshalled {
    const OP: &str = "AddTags";
    let mut r = query(OP);
    r.add_member_list("LoadBalancerNames", required_list(OP, "LoadBalancerNames", &req.load_balancer_names)?);
    add_tag_members(&mut r, OP, required_list(OP, "Tags", &req.tags)?)?;
    Ok(r)
}

pub(crate) fn remove_tags(req: &RemoveTagsRequest) -> Marshalled {
    const OP: &str = "RemoveTags";
    let mut r = query(OP);
    r.add_member_list("LoadBalancerNames", required_list(OP, "LoadBalancerNames", &req.load_balancer_names)?);
    r.add_member_structs("Tags", required_list(OP, "Tags", &req.tags)?, |r, prefix, tag| {
        r.add_parameter(format!("{}.Key", prefix), required(OP, "Tag.Key", &tag.key)?);
        Ok::<_, ClientError>(())
    })?;
    Ok(r)
}

pub(crate) fn describe_tags(req: &DescribeTagsRequest) -> Marshalled {
    const OP: &str = "DescribeTags";
    let mut r = query(OP);
    r.add_member_list("LoadBalancerNames", required_list(OP, "LoadBalancerNames", &req.load_balancer_names)?);
    Ok(r)
}

pub(crate) fn apply_security_groups_to_load_balancer(req: &ApplySecurityGroupsToLoadBalancerRequest) -> Marshalled {
    name_and_list(
        "ApplySecurityGroupsToLoadBalancer",
        &req.load_balancer_name,
        "SecurityGroups",
        &req.security_groups,
    )
}

pub(crate) fn attach_load_balancer_to_subnets(req: &AttachLoadBalancerToSubnetsRequest) -> Marshalled {
    name_and_list("AttachLoadBalancerToSubnets", &req.load_balancer_name, "Subnets", &req.subnets)
}

pub(crate) fn detach_load_balancer_from_subnets(req: &DetachLoadBalancerFromSubnetsRequest) -> Marshalled {
    name_and_list("DetachLoadBalancerFromSubnets", &req.load_balancer_name, "Subnets", &req.subnets)
}

pub(crate) fn enable_availability_zones_for_load_balancer(
    req: &EnableAvailabilityZonesForLoadBalancerRequest,
) -> Marshalled {
    name_and_list(
        "EnableAvailabilityZonesForLoadBalancer",
        &req.load_balancer_name,
        "AvailabilityZones",
        &req.availability_zones,
    )
}

pub(crate) fn disable_availability_zones_for_load_balancer(
    req: &DisableAvailabilityZonesForLoadBalancerRequest,
) -> Marshalled {
    name_and_list(
        "DisableAvailabilityZonesForLoadBalancer",
        &req.load_balancer_name,
        "AvailabilityZones",
        &req.availability_zones,
    )
}

pub(crate) fn create_load_balancer(req: &CreateLoadBalancerRequest) -> Marshalled {
    const OP: &str = "CreateLoadBalancer";
    let mut r = query(OP);
    r.add_parameter("LoadBalancerName", required(OP, "LoadBalancerName", &req.load_balancer_name)?);
    add_listeners(&mut r, OP, required_list(OP, "Listeners", &req.listeners)?)?;
    r.add_member_list("AvailabilityZones", &req.availability_zones);
    r.add_member_list("Subnets", &req.subnets);
    r.add_member_list("SecurityGroups", &req.security_groups);
    r.add_optional("Scheme", req.scheme.as_deref());
    add_tag_members(&mut r, OP, &req.tags)?;
    Ok(r)
}

pub(crate) fn delete_load_balancer(req: &DeleteLoadBalancerRequest) -> Marshalled {
    name_only("DeleteLoadBalancer", &req.load_balancer_name)
}

pub(crate) fn describe_load_balancers(req: &DescribeLoadBalancersRequest) -> Marshalled {
    const OP: &str = "DescribeLoadBalancers";
    let mut r = query(OP);
    r.add_member_list("LoadBalancerNames", &req.load_balancer_names);
    r.add_optional("Marker", req.marker.as_deref());
    if let Some(size) = req.page_size {
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(ClientError::invalid(
                OP,
                "PageSize",
                format!("{} is outside 1..={}", size, MAX_PAGE_SIZE),
            ));
        }
        r.add_parameter("PageSize", size.to_string());
    }
    Ok(r)
}

pub(crate) fn configure_health_check(req: &ConfigureHealthCheckRequest) -> Marshalled {
    const OP: &str = "ConfigureHealthCheck";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    let hc = req
        .health_check
        .as_ref()
        .ok_or_else(|| ClientError::missing(OP, "HealthCheck"))?;
    r.add_parameter("HealthCheck.Target", required(OP, "HealthCheck.Target", &hc.target)?);
    let numbers = [
        ("HealthCheck.Interval", hc.interval),
        ("HealthCheck.Timeout", hc.timeout),
        ("HealthCheck.UnhealthyThreshold", hc.unhealthy_threshold),
        ("HealthCheck.HealthyThreshold", hc.healthy_threshold),
    ];
    for (field, value) in numbers {
        r.add_parameter(field, required_value(OP, field, value)?.to_string());
    }
    Ok(r)
}

pub(crate) fn describe_load_balancer_attributes(req: &DescribeLoadBalancerAttributesRequest) -> Marshalled {
    name_only("DescribeLoadBalancerAttributes", &req.load_balancer_name)
}

pub(crate) fn modify_load_balancer_attributes(req: &ModifyLoadBalancerAttributesRequest) -> Marshalled {
    const OP: &str = "ModifyLoadBalancerAttributes";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    let attrs = req
        .load_balancer_attributes
        .as_ref()
        .ok_or_else(|| ClientError::missing(OP, "LoadBalancerAttributes"))?;

    if let Some(ref czlb) = attrs.cross_zone_load_balancing {
        r.add_parameter(
            "LoadBalancerAttributes.CrossZoneLoadBalancing.Enabled",
            required_value(OP, "CrossZoneLoadBalancing.Enabled", czlb.enabled)?.to_string(),
        );
    }
    if let Some(ref log) = attrs.access_log {
        r.add_parameter(
            "LoadBalancerAttributes.AccessLog.Enabled",
            required_value(OP, "AccessLog.Enabled", log.enabled)?.to_string(),
        );
        r.add_optional("LoadBalancerAttributes.AccessLog.S3BucketName", log.s3_bucket_name.as_deref());
        r.add_optional("LoadBalancerAttributes.AccessLog.EmitInterval", log.emit_interval);
        r.add_optional("LoadBalancerAttributes.AccessLog.S3BucketPrefix", log.s3_bucket_prefix.as_deref());
    }
    if let Some(ref draining) = attrs.connection_draining {
        r.add_parameter(
            "LoadBalancerAttributes.ConnectionDraining.Enabled",
            required_value(OP, "ConnectionDraining.Enabled", draining.enabled)?.to_string(),
        );
        r.add_optional("LoadBalancerAttributes.ConnectionDraining.Timeout", draining.timeout);
    }
    if let Some(ref settings) = attrs.connection_settings {
        r.add_parameter(
            "LoadBalancerAttributes.ConnectionSettings.IdleTimeout",
            required_value(OP, "ConnectionSettings.IdleTimeout", settings.idle_timeout)?.to_string(),
        );
    }
    r.add_member_structs(
        "LoadBalancerAttributes.AdditionalAttributes",
        &attrs.additional_attributes,
        |r, prefix, attr| {
            r.add_optional(format!("{}.Key", prefix), attr.key.as_deref());
            r.add_optional(format!("{}.Value", prefix), attr.value.as_deref());
            Ok::<_, ClientError>(())
        },
    )?;
    Ok(r)
}

pub(crate) fn create_load_balancer_listeners(req: &CreateLoadBalancerListenersRequest) -> Marshalled {
    const OP: &str = "CreateLoadBalancerListeners";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    add_listeners(&mut r, OP, required_list(OP, "Listeners", &req.listeners)?)?;
    Ok(r)
}

pub(crate) fn delete_load_balancer_listeners(req: &DeleteLoadBalancerListenersRequest) -> Marshalled {
    const OP: &str = "DeleteLoadBalancerListeners";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    let ports = required_list(OP, "LoadBalancerPorts", &req.load_balancer_ports)?;
    for p in ports {
        port(OP, "LoadBalancerPorts", Some(*p))?;
    }
    let ports: Vec<String> = ports.iter().map(i32::to_string).collect();
    r.add_member_list("LoadBalancerPorts", &ports);
    Ok(r)
}

pub(crate) fn set_load_balancer_listener_ssl_certificate(
    req: &SetLoadBalancerListenerSSLCertificateRequest,
) -> Marshalled {
    const OP: &str = "SetLoadBalancerListenerSSLCertificate";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    r.add_parameter(
        "LoadBalancerPort",
        port(OP, "LoadBalancerPort", req.load_balancer_port)?.to_string(),
    );
    r.add_parameter("SSLCertificateId", required(OP, "SSLCertificateId", &req.ssl_certificate_id)?);
    Ok(r)
}

pub(crate) fn create_app_cookie_stickiness_policy(req: &CreateAppCookieStickinessPolicyRequest) -> Marshalled {
    const OP: &str = "CreateAppCookieStickinessPolicy";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    r.add_parameter("PolicyName", required(OP, "PolicyName", &req.policy_name)?);
    r.add_parameter("CookieName", required(OP, "CookieName", &req.cookie_name)?);
    Ok(r)
}

pub(crate) fn create_lb_cookie_stickiness_policy(req: &CreateLBCookieStickinessPolicyRequest) -> Marshalled {
    const OP: &str = "CreateLBCookieStickinessPolicy";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    r.add_parameter("PolicyName", required(OP, "PolicyName", &req.policy_name)?);
    r.add_optional("CookieExpirationPeriod", req.cookie_expiration_period);
    Ok(r)
}

pub(crate) fn create_load_balancer_policy(req: &CreateLoadBalancerPolicyRequest) -> Marshalled {
    const OP: &str = "CreateLoadBalancerPolicy";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    r.add_parameter("PolicyName", required(OP, "PolicyName", &req.policy_name)?);
    r.add_parameter("PolicyTypeName", required(OP, "PolicyTypeName", &req.policy_type_name)?);
    r.add_member_structs("PolicyAttributes", &req.policy_attributes, |r, prefix, attr| {
        r.add_optional(format!("{}.AttributeName", prefix), attr.attribute_name.as_deref());
        r.add_optional(format!("{}.AttributeValue", prefix), attr.attribute_value.as_deref());
        Ok::<_, ClientError>(())
    })?;
    Ok(r)
}

pub(crate) fn delete_load_balancer_policy(req: &DeleteLoadBalancerPolicyRequest) -> Marshalled {
    const OP: &str = "DeleteLoadBalancerPolicy";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    r.add_parameter("PolicyName", required(OP, "PolicyName", &req.policy_name)?);
    Ok(r)
}

pub(crate) fn describe_load_balancer_policies(req: &DescribeLoadBalancerPoliciesRequest) -> Marshalled {
    let mut r = query("DescribeLoadBalancerPolicies");
    r.add_optional("LoadBalancerName", req.load_balancer_name.as_deref());
    r.add_member_list("PolicyNames", &req.policy_names);
    Ok(r)
}

pub(crate) fn describe_load_balancer_policy_types(req: &DescribeLoadBalancerPolicyTypesRequest) -> Marshalled {
    let mut r = query("DescribeLoadBalancerPolicyTypes");
    r.add_member_list("PolicyTypeNames", &req.policy_type_names);
    Ok(r)
}

pub(crate) fn set_load_balancer_policies_for_backend_server(
    req: &SetLoadBalancerPoliciesForBackendServerRequest,
) -> Marshalled {
    const OP: &str = "SetLoadBalancerPoliciesForBackendServer";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    r.add_parameter("InstancePort", port(OP, "InstancePort", req.instance_port)?.to_string());
    r.add_member_list_or_empty("PolicyNames", &req.policy_names);
    Ok(r)
}

pub(crate) fn set_load_balancer_policies_of_listener(req: &SetLoadBalancerPoliciesOfListenerRequest) -> Marshalled {
    const OP: &str = "SetLoadBalancerPoliciesOfListener";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    r.add_parameter(
        "LoadBalancerPort",
        port(OP, "LoadBalancerPort", req.load_balancer_port)?.to_string(),
    );
    r.add_member_list_or_empty("PolicyNames", &req.policy_names);
    Ok(r)
}

pub(crate) fn register_instances_with_load_balancer(req: &RegisterInstancesWithLoadBalancerRequest) -> Marshalled {
    const OP: &str = "RegisterInstancesWithLoadBalancer";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    add_instances(&mut r, OP, required_list(OP, "Instances", &req.instances)?)?;
    Ok(r)
}

pub(crate) fn deregister_instances_from_load_balancer(
    req: &DeregisterInstancesFromLoadBalancerRequest,
) -> Marshalled {
    const OP: &str = "DeregisterInstancesFromLoadBalancer";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    add_instances(&mut r, OP, required_list(OP, "Instances", &req.instances)?)?;
    Ok(r)
}

pub(crate) fn describe_instance_health(req: &DescribeInstanceHealthRequest) -> Marshalled {
    const OP: &str = "DescribeInstanceHealth";
    let mut r = name_only(OP, &req.load_balancer_name)?;
    add_instances(&mut r, OP, &req.instances)?;
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn params(r: &Request) -> BTreeMap<&str, &str> {
        r.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn create_load_balancer_with_one_listener() {
        let req = CreateLoadBalancerRequest::new("web", vec![Listener::new("HTTP", 80, 8080)]);
        let r = create_load_balancer(&req).unwrap();
        let expected: BTreeMap<&str, &str> = [
            ("Action", "CreateLoadBalancer"),
            ("Version", "2012-06-01"),
            ("LoadBalancerName", "web"),
            ("Listeners.member.1.Protocol", "HTTP"),
            ("Listeners.member.1.LoadBalancerPort", "80"),
            ("Listeners.member.1.InstancePort", "8080"),
        ]
        .into_iter()
        .collect();
        assert_eq!(params(&r), expected);
        assert_eq!(r.operation, "CreateLoadBalancer");
    }

    #[test]
    fn create_load_balancer_full() {
        let req = CreateLoadBalancerRequest::new(
            "api",
            vec![
                Listener::new("HTTP", 80, 8080),
                Listener::new("HTTPS", 443, 8080)
                    .with_instance_protocol("HTTP")
                    .with_ssl_certificate_id("arn:cert"),
            ],
        )
        .with_subnets(["subnet-1", "subnet-2"])
        .with_security_groups(["sg-1"])
        .with_scheme("internal")
        .with_tags(vec![Tag::new("env", "prod"), Tag::key("team")]);
        let r = create_load_balancer(&req).unwrap();
        assert_eq!(r.parameter("Listeners.member.2.SSLCertificateId"), Some("arn:cert"));
        assert_eq!(r.parameter("Listeners.member.2.InstanceProtocol"), Some("HTTP"));
        assert_eq!(r.parameter("Subnets.member.2"), Some("subnet-2"));
        assert_eq!(r.parameter("SecurityGroups.member.1"), Some("sg-1"));
        assert_eq!(r.parameter("Scheme"), Some("internal"));
        assert_eq!(r.parameter("Tags.member.1.Value"), Some("prod"));
        assert_eq!(r.parameter("Tags.member.2.Key"), Some("team"));
        assert_eq!(r.parameter("Tags.member.2.Value"), None);
        assert_eq!(r.parameter("AvailabilityZones.member.1"), None);
    }

    #[test]
    fn missing_name_fails_fast() {
        let req = CreateLoadBalancerRequest {
            listeners: vec![Listener::new("HTTP", 80, 80)],
            ..Default::default()
        };
        assert_eq!(
            create_load_balancer(&req).unwrap_err(),
            ClientError::missing("CreateLoadBalancer", "LoadBalancerName")
        );
    }

    #[test]
    fn empty_name_counts_as_missing() {
        let req = DeleteLoadBalancerRequest::new("");
        assert!(matches!(
            delete_load_balancer(&req),
            Err(ClientError::MissingField { field: "LoadBalancerName", .. })
        ));
    }

    #[test]
    fn missing_listeners_fails_fast() {
        let req = CreateLoadBalancerRequest::new("web", vec![]);
        assert_eq!(
            create_load_balancer(&req).unwrap_err(),
            ClientError::missing("CreateLoadBalancer", "Listeners")
        );
    }

    #[test]
    fn listener_fields_are_checked() {
        let mut listener = Listener::new("HTTP", 80, 8080);
        listener.instance_port = None;
        let req = CreateLoadBalancerListenersRequest::new("web", vec![listener]);
        assert_eq!(
            create_load_balancer_listeners(&req).unwrap_err(),
            ClientError::missing("CreateLoadBalancerListeners", "Listener.InstancePort")
        );

        let req = CreateLoadBalancerListenersRequest::new("web", vec![Listener::new("TCP", 70000, 80)]);
        assert!(matches!(
            create_load_balancer_listeners(&req),
            Err(ClientError::InvalidField { field: "Listener.LoadBalancerPort", .. })
        ));
    }

    #[test]
    fn describe_load_balancers_default_is_bare() {
        let r = describe_load_balancers(&DescribeLoadBalancersRequest::default()).unwrap();
        assert_eq!(r.parameters.len(), 2);
    }

    #[test]
    fn page_size_bounds() {
        let ok = DescribeLoadBalancersRequest::new().with_page_size(400);
        assert_eq!(describe_load_balancers(&ok).unwrap().parameter("PageSize"), Some("400"));
        let too_big = DescribeLoadBalancersRequest::new().with_page_size(401);
        assert!(describe_load_balancers(&too_big).is_err());
        let zero = DescribeLoadBalancersRequest::new().with_page_size(0);
        assert!(describe_load_balancers(&zero).is_err());
    }

    #[test]
    fn empty_policy_names_clear_the_listener() {
        let req = SetLoadBalancerPoliciesOfListenerRequest::new("web", 443, Vec::<String>::new());
        let r = set_load_balancer_policies_of_listener(&req).unwrap();
        assert_eq!(r.parameter("PolicyNames"), Some(""));
        assert_eq!(r.parameter("LoadBalancerPort"), Some("443"));
        assert!(r.encode_form().contains("PolicyNames=&"));

        let req = SetLoadBalancerPoliciesForBackendServerRequest::new("web", 8443, ["p1", "p2"]);
        let r = set_load_balancer_policies_for_backend_server(&req).unwrap();
        assert_eq!(r.parameter("PolicyNames"), None);
        assert_eq!(r.parameter("PolicyNames.member.2"), Some("p2"));
    }

    #[test]
    fn health_check_encoding() {
        let req = ConfigureHealthCheckRequest::new("web", HealthCheck::new("HTTP:8080/ping", 30, 5, 2, 10));
        let r = configure_health_check(&req).unwrap();
        assert_eq!(r.parameter("HealthCheck.Target"), Some("HTTP:8080/ping"));
        assert_eq!(r.parameter("HealthCheck.Interval"), Some("30"));
        assert_eq!(r.parameter("HealthCheck.Timeout"), Some("5"));
        assert_eq!(r.parameter("HealthCheck.UnhealthyThreshold"), Some("2"));
        assert_eq!(r.parameter("HealthCheck.HealthyThreshold"), Some("10"));

        let mut partial = HealthCheck::new("TCP:22", 30, 5, 2, 10);
        partial.timeout = None;
        let req = ConfigureHealthCheckRequest::new("web", partial);
        assert_eq!(
            configure_health_check(&req).unwrap_err(),
            ClientError::missing("ConfigureHealthCheck", "HealthCheck.Timeout")
        );
    }

    #[test]
    fn attributes_encoding() {
        let attrs = LoadBalancerAttributes::default()
            .with_cross_zone_load_balancing(true)
            .with_connection_draining(false, None)
            .with_access_log(AccessLog {
                enabled: Some(true),
                s3_bucket_name: Some("logs".into()),
                emit_interval: Some(5),
                s3_bucket_prefix: None,
            });
        let r = modify_load_balancer_attributes(&ModifyLoadBalancerAttributesRequest::new("web", attrs)).unwrap();
        assert_eq!(r.parameter("LoadBalancerAttributes.CrossZoneLoadBalancing.Enabled"), Some("true"));
        assert_eq!(r.parameter("LoadBalancerAttributes.ConnectionDraining.Enabled"), Some("false"));
        assert_eq!(r.parameter("LoadBalancerAttributes.ConnectionDraining.Timeout"), None);
        assert_eq!(r.parameter("LoadBalancerAttributes.AccessLog.EmitInterval"), Some("5"));
        assert_eq!(r.parameter("LoadBalancerAttributes.AccessLog.S3BucketName"), Some("logs"));
        assert_eq!(r.parameter("LoadBalancerAttributes.ConnectionSettings.IdleTimeout"), None);
    }

    #[test]
    fn tags_need_keys() {
        let req = AddTagsRequest::new("web", vec![Tag::default()]);
        assert_eq!(add_tags(&req).unwrap_err(), ClientError::missing("AddTags", "Tag.Key"));

        let req = RemoveTagsRequest::new("web", ["env"]);
        let r = remove_tags(&req).unwrap();
        assert_eq!(r.parameter("LoadBalancerNames.member.1"), Some("web"));
        assert_eq!(r.parameter("Tags.member.1.Key"), Some("env"));
    }

    #[test]
    fn instance_lists() {
        let r = register_instances_with_load_balancer(&RegisterInstancesWithLoadBalancerRequest::new(
            "web",
            ["i-1", "i-2"],
        ))
        .unwrap();
        assert_eq!(r.parameter("Instances.member.2.InstanceId"), Some("i-2"));

        let empty = DeregisterInstancesFromLoadBalancerRequest::new("web", Vec::<String>::new());
        assert!(deregister_instances_from_load_balancer(&empty).is_err());

        let r = describe_instance_health(&DescribeInstanceHealthRequest::new("web", Vec::<String>::new())).unwrap();
        assert_eq!(r.parameters.len(), 3);
    }

    #[test]
    fn listener_ports_are_numbers() {
        let r = delete_load_balancer_listeners(&DeleteLoadBalancerListenersRequest::new("web", vec![80, 443])).unwrap();
        assert_eq!(r.parameter("LoadBalancerPorts.member.1"), Some("80"));
        assert_eq!(r.parameter("LoadBalancerPorts.member.2"), Some("443"));
    }

    #[test]
    fn policy_attributes() {
        let req = CreateLoadBalancerPolicyRequest::new("web", "tls", "SSLNegotiationPolicyType")
            .with_policy_attributes(vec![PolicyAttribute::new("Reference-Security-Policy", "ELBSecurityPolicy-2016-08")]);
        let r = create_load_balancer_policy(&req).unwrap();
        assert_eq!(r.parameter("PolicyAttributes.member.1.AttributeName"), Some("Reference-Security-Policy"));
        assert_eq!(r.parameter("PolicyTypeName"), Some("SSLNegotiationPolicyType"));
    }
}
