use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Listeners ───────────────────────────────────────────────────────────

/// A port/protocol mapping from the load balancer to back-end instances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Listener {
    /// `HTTP`, `HTTPS`, `TCP` or `SSL`.
    pub protocol: Option<String>,
    pub load_balancer_port: Option<i32>,
    /// Defaults on the service side to the front-end protocol family.
    pub instance_protocol: Option<String>,
    pub instance_port: Option<i32>,
    /// ARN of the server certificate for HTTPS and SSL listeners.
    pub ssl_certificate_id: Option<String>,
}

impl Listener {
    pub fn new(protocol: impl Into<String>, load_balancer_port: i32, instance_port: i32) -> Self {
        Self {
            protocol: Some(protocol.into()),
            load_balancer_port: Some(load_balancer_port),
            instance_port: Some(instance_port),
            ..Default::default()
        }
    }
}

string_setters!(Listener {
    with_instance_protocol => instance_protocol,
    with_ssl_certificate_id => ssl_certificate_id,
});

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListenerDescription {
    pub listener: Option<Listener>,
    pub policy_names: Vec<String>,
}

// ── Health checks and instances ─────────────────────────────────────────

/// Health check settings. `target` is `PROTOCOL:PORT[/PATH]`, e.g.
/// `HTTP:8080/health`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthCheck {
    pub target: Option<String>,
    /// Seconds between checks.
    pub interval: Option<i32>,
    /// Seconds before a check counts as failed; must be below `interval`.
    pub timeout: Option<i32>,
    pub unhealthy_threshold: Option<i32>,
    pub healthy_threshold: Option<i32>,
}

impl HealthCheck {
    pub fn new(
        target: impl Into<String>,
        interval: i32,
        timeout: i32,
        unhealthy_threshold: i32,
        healthy_threshold: i32,
    ) -> Self {
        Self {
            target: Some(target.into()),
            interval: Some(interval),
            timeout: Some(timeout),
            unhealthy_threshold: Some(unhealthy_threshold),
            healthy_threshold: Some(healthy_threshold),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: Option<String>,
}

impl Instance {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: Some(instance_id.into()),
        }
    }
}

impl From<&str> for Instance {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Instance {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Health of one registered instance as seen by the load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstanceState {
    pub instance_id: Option<String>,
    /// `InService`, `OutOfService` or `Unknown`.
    pub state: Option<String>,
    /// `ELB`, `Instance` or `N/A`.
    pub reason_code: Option<String>,
    pub description: Option<String>,
}

// ── Tags ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tag {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    /// A tag with a key and no value.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: None,
        }
    }
}

/// Tag key used when removing tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagKeyOnly {
    pub key: Option<String>,
}

impl TagKeyOnly {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: Some(key.into()) }
    }
}

impl From<&str> for TagKeyOnly {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagDescription {
    pub load_balancer_name: Option<String>,
    pub tags: Vec<Tag>,
}

// ── Policies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppCookieStickinessPolicy {
    pub policy_name: Option<String>,
    pub cookie_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LBCookieStickinessPolicy {
    pub policy_name: Option<String>,
    /// Seconds; absent means the cookie lives for the browser session.
    pub cookie_expiration_period: Option<i64>,
}

/// Policies attached to a load balancer, grouped by kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policies {
    pub app_cookie_stickiness_policies: Vec<AppCookieStickinessPolicy>,
    pub lb_cookie_stickiness_policies: Vec<LBCookieStickinessPolicy>,
    pub other_policies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendServerDescription {
    pub instance_port: Option<i32>,
    pub policy_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyAttribute {
    pub attribute_name: Option<String>,
    pub attribute_value: Option<String>,
}

impl PolicyAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute_name: Some(name.into()),
            attribute_value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyAttributeDescription {
    pub attribute_name: Option<String>,
    pub attribute_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyDescription {
    pub policy_name: Option<String>,
    pub policy_type_name: Option<String>,
    pub policy_attribute_descriptions: Vec<PolicyAttributeDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyAttributeTypeDescription {
    pub attribute_name: Option<String>,
    pub attribute_type: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<String>,
    /// `ONE(1)`, `ZERO_OR_ONE(0,1)`, `ZERO_OR_MORE(0..*)` or `ONE_OR_MORE(1..*)`.
    pub cardinality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyTypeDescription {
    pub policy_type_name: Option<String>,
    pub description: Option<String>,
    pub policy_attribute_type_descriptions: Vec<PolicyAttributeTypeDescription>,
}

// ── Load balancers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceSecurityGroup {
    pub owner_alias: Option<String>,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadBalancerDescription {
    pub load_balancer_name: Option<String>,
    pub dns_name: Option<String>,
    pub canonical_hosted_zone_name: Option<String>,
    pub canonical_hosted_zone_name_id: Option<String>,
    pub listener_descriptions: Vec<ListenerDescription>,
    pub policies: Option<Policies>,
    pub backend_server_descriptions: Vec<BackendServerDescription>,
    pub availability_zones: Vec<String>,
    pub subnets: Vec<String>,
    pub vpc_id: Option<String>,
    pub instances: Vec<Instance>,
    pub health_check: Option<HealthCheck>,
    pub source_security_group: Option<SourceSecurityGroup>,
    pub security_groups: Vec<String>,
    pub created_time: Option<DateTime<Utc>>,
    /// `internet-facing` or `internal`.
    pub scheme: Option<String>,
}

// ── Attributes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrossZoneLoadBalancing {
    pub enabled: Option<bool>,
}

/// Access log delivery to S3.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessLog {
    pub enabled: Option<bool>,
    pub s3_bucket_name: Option<String>,
    /// Minutes: 5 or 60.
    pub emit_interval: Option<i32>,
    pub s3_bucket_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionDraining {
    pub enabled: Option<bool>,
    /// Seconds to keep existing connections open before deregistering.
    pub timeout: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Seconds a connection may be idle before it is closed.
    pub idle_timeout: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdditionalAttribute {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadBalancerAttributes {
    pub cross_zone_load_balancing: Option<CrossZoneLoadBalancing>,
    pub access_log: Option<AccessLog>,
    pub connection_draining: Option<ConnectionDraining>,
    pub connection_settings: Option<ConnectionSettings>,
    pub additional_attributes: Vec<AdditionalAttribute>,
}

impl LoadBalancerAttributes {
    pub fn with_cross_zone_load_balancing(mut self, enabled: bool) -> Self {
        self.cross_zone_load_balancing = Some(CrossZoneLoadBalancing { enabled: Some(enabled) });
        self
    }

    pub fn with_connection_draining(mut self, enabled: bool, timeout: Option<i32>) -> Self {
        self.connection_draining = Some(ConnectionDraining {
            enabled: Some(enabled),
            timeout,
        });
        self
    }

    pub fn with_idle_timeout(mut self, seconds: i32) -> Self {
        self.connection_settings = Some(ConnectionSettings {
            idle_timeout: Some(seconds),
        });
        self
    }

    pub fn with_access_log(mut self, access_log: AccessLog) -> Self {
        self.access_log = Some(access_log);
        self
    }
}
