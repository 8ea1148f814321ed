//! Blocking ELB client: one method per API operation.

use crate::error::{ElbErrorKind, ElbResult};
use crate::model::*;
use crate::{marshall, unmarshall, ELB_SERVICE};
use lbsdk_core::{
    Call, ClientConfig, ClientError, Credentials, CredentialsProvider, ErrorUnmarshaller, HttpTransport, Invoker,
    InvokerBuilder, MetricsCollector, RequestSigner, StaticCredentialsProvider,
};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Synchronous Elastic Load Balancing client.
///
/// Every method accepts either a bare request or a [`Call`] carrying
/// credentials for that call only. Methods block until the response has
/// been read and interpreted.
pub struct ElbClient {
    invoker: Invoker<ElbErrorKind>,
    config: ClientConfig,
}

impl ElbClient {
    pub fn builder() -> ElbClientBuilder {
        ElbClientBuilder::new()
    }

    /// Client for `config`, with credentials from the environment.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder().config(config).build()
    }

    /// Client signing every call with fixed credentials.
    pub fn with_credentials(credentials: Credentials, config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder().config(config).credentials(credentials).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Url {
        self.invoker.endpoint()
    }

    pub fn signing_region(&self) -> &str {
        self.invoker.signing_region()
    }

    /// Seconds added to the local clock when signing.
    pub fn time_offset(&self) -> i64 {
        self.invoker.time_offset()
    }

    pub fn set_time_offset(&self, seconds: i64) {
        self.invoker.set_time_offset(seconds)
    }

    /// Add an error unmarshaller ahead of the generic fallback.
    pub fn register_error_unmarshaller(&mut self, unmarshaller: Box<dyn ErrorUnmarshaller<ElbErrorKind>>) {
        self.invoker.dispatcher_mut().register(unmarshaller);
    }

    // ── Load balancers ──────────────────────────────────────────────

    pub fn create_load_balancer(
        &self,
        call: impl Into<Call<CreateLoadBalancerRequest>>,
    ) -> ElbResult<CreateLoadBalancerResult> {
        self.invoker
            .execute(call.into(), marshall::create_load_balancer, unmarshall::create_load_balancer)
    }

    /// Deleting a load balancer that does not exist succeeds.
    pub fn delete_load_balancer(
        &self,
        call: impl Into<Call<DeleteLoadBalancerRequest>>,
    ) -> ElbResult<DeleteLoadBalancerResult> {
        self.invoker
            .execute(call.into(), marshall::delete_load_balancer, unmarshall::delete_load_balancer)
    }

    pub fn describe_load_balancers(
        &self,
        call: impl Into<Call<DescribeLoadBalancersRequest>>,
    ) -> ElbResult<DescribeLoadBalancersResult> {
        self.invoker
            .execute(call.into(), marshall::describe_load_balancers, unmarshall::describe_load_balancers)
    }

    /// Follow `NextMarker` until every load balancer has been listed.
    ///
    /// A marker the service already handed out fails the listing with
    /// [`ClientError::Parse`] instead of paging forever.
    pub fn describe_all_load_balancers(&self) -> ElbResult<Vec<LoadBalancerDescription>> {
        let mut all = Vec::new();
        let mut seen = HashSet::new();
        let mut marker: Option<String> = None;
        loop {
            let page = self.describe_load_balancers(DescribeLoadBalancersRequest {
                marker: marker.take(),
                ..Default::default()
            })?;
            all.extend(page.load_balancer_descriptions);
            match page.next_marker {
                Some(next) if !seen.insert(next.clone()) => {
                    return Err(ClientError::parse(format!(
                        "DescribeLoadBalancers returned marker '{}' twice",
                        next
                    ))
                    .into())
                }
                Some(next) => marker = Some(next),
                None => return Ok(all),
            }
        }
    }

    pub fn configure_health_check(
        &self,
        call: impl Into<Call<ConfigureHealthCheckRequest>>,
    ) -> ElbResult<ConfigureHealthCheckResult> {
        self.invoker
            .execute(call.into(), marshall::configure_health_check, unmarshall::configure_health_check)
    }

    pub fn describe_load_balancer_attributes(
        &self,
        call: impl Into<Call<DescribeLoadBalancerAttributesRequest>>,
    ) -> ElbResult<DescribeLoadBalancerAttributesResult> {
        self.invoker.execute(
            call.into(),
            marshall::describe_load_balancer_attributes,
            unmarshall::describe_load_balancer_attributes,
        )
    }

    pub fn modify_load_balancer_attributes(
        &self,
        call: impl Into<Call<ModifyLoadBalancerAttributesRequest>>,
    ) -> ElbResult<ModifyLoadBalancerAttributesResult> {
        self.invoker.execute(
            call.into(),
            marshall::modify_load_balancer_attributes,
            unmarshall::modify_load_balancer_attributes,
        )
    }

    // ── Network placement ───────────────────────────────────────────

    pub fn apply_security_groups_to_load_balancer(
        &self,
        call: impl Into<Call<ApplySecurityGroupsToLoadBalancerRequest>>,
    ) -> ElbResult<ApplySecurityGroupsToLoadBalancerResult> {
        self.invoker.execute(
            call.into(),
            marshall::apply_security_groups_to_load_balancer,
            unmarshall::apply_security_groups_to_load_balancer,
        )
    }

    pub fn attach_load_balancer_to_subnets(
        &self,
        call: impl Into<Call<AttachLoadBalancerToSubnetsRequest>>,
    ) -> ElbResult<AttachLoadBalancerToSubnetsResult> {
        self.invoker.execute(
            call.into(),
            marshall::attach_load_balancer_to_subnets,
            unmarshall::attach_load_balancer_to_subnets,
        )
    }

    pub fn detach_load_balancer_from_subnets(
        &self,
        call: impl Into<Call<DetachLoadBalancerFromSubnetsRequest>>,
    ) -> ElbResult<DetachLoadBalancerFromSubnetsResult> {
        self.invoker.execute(
            call.into(),
            marshall::detach_load_balancer_from_subnets,
            unmarshall::detach_load_balancer_from_subnets,
        )
    }

    pub fn enable_availability_zones_for_load_balancer(
        &self,
        call: impl Into<Call<EnableAvailabilityZonesForLoadBalancerRequest>>,
    ) -> ElbResult<EnableAvailabilityZonesForLoadBalancerResult> {
        self.invoker.execute(
            call.into(),
            marshall::enable_availability_zones_for_load_balancer,
            unmarshall::enable_availability_zones_for_load_balancer,
        )
    }

    pub fn disable_availability_zones_for_load_balancer(
        &self,
        call: impl Into<Call<DisableAvailabilityZonesForLoadBalancerRequest>>,
    ) -> ElbResult<DisableAvailabilityZonesForLoadBalancerResult> {
        self.invoker.execute(
            call.into(),
            marshall::disable_availability_zones_for_load_balancer,
            unmarshall::disable_availability_zones_for_load_balancer,
        )
    }

    // ── Listeners ───────────────────────────────────────────────────

    pub fn create_load_balancer_listeners(
        &self,
        call: impl Into<Call<CreateLoadBalancerListenersRequest>>,
    ) -> ElbResult<CreateLoadBalancerListenersResult> {
        self.invoker.execute(
            call.into(),
            marshall::create_load_balancer_listeners,
            unmarshall::create_load_balancer_listeners,
        )
    }

    pub fn delete_load_balancer_listeners(
        &self,
        call: impl Into<Call<DeleteLoadBalancerListenersRequest>>,
    ) -> ElbResult<DeleteLoadBalancerListenersResult> {
        self.invoker.execute(
            call.into(),
            marshall::delete_load_balancer_listeners,
            unmarshall::delete_load_balancer_listeners,
        )
    }

    pub fn set_load_balancer_listener_ssl_certificate(
        &self,
        call: impl Into<Call<SetLoadBalancerListenerSSLCertificateRequest>>,
    ) -> ElbResult<SetLoadBalancerListenerSSLCertificateResult> {
        self.invoker.execute(
            call.into(),
            marshall::set_load_balancer_listener_ssl_certificate,
            unmarshall::set_load_balancer_listener_ssl_certificate,
        )
    }

    // ── Policies ────────────────────────────────────────────────────

    pub fn create_app_cookie_stickiness_policy(
        &self,
        call: impl Into<Call<CreateAppCookieStickinessPolicyRequest>>,
    ) -> ElbResult<CreateAppCookieStickinessPolicyResult> {
        self.invoker.execute(
            call.into(),
            marshall::create_app_cookie_stickiness_policy,
            unmarshall::create_app_cookie_stickiness_policy,
        )
    }

    pub fn create_lb_cookie_stickiness_policy(
        &self,
        call: impl Into<Call<CreateLBCookieStickinessPolicyRequest>>,
    ) -> ElbResult<CreateLBCookieStickinessPolicyResult> {
        self.invoker.execute(
            call.into(),
            marshall::create_lb_cookie_stickiness_policy,
            unmarshall::create_lb_cookie_stickiness_policy,
        )
    }

    pub fn create_load_balancer_policy(
        &self,
        call: impl Into<Call<CreateLoadBalancerPolicyRequest>>,
    ) -> ElbResult<CreateLoadBalancerPolicyResult> {
        self.invoker.execute(
            call.into(),
            marshall::create_load_balancer_policy,
            unmarshall::create_load_balancer_policy,
        )
    }

    pub fn delete_load_balancer_policy(
        &self,
        call: impl Into<Call<DeleteLoadBalancerPolicyRequest>>,
    ) -> ElbResult<DeleteLoadBalancerPolicyResult> {
        self.invoker.execute(
            call.into(),
            marshall::delete_load_balancer_policy,
            unmarshall::delete_load_balancer_policy,
        )
    }

    pub fn describe_load_balancer_policies(
        &self,
        call: impl Into<Call<DescribeLoadBalancerPoliciesRequest>>,
    ) -> ElbResult<DescribeLoadBalancerPoliciesResult> {
        self.invoker.execute(
            call.into(),
            marshall::describe_load_balancer_policies,
            unmarshall::describe_load_balancer_policies,
        )
    }

    pub fn describe_load_balancer_policy_types(
        &self,
        call: impl Into<Call<DescribeLoadBalancerPolicyTypesRequest>>,
    ) -> ElbResult<DescribeLoadBalancerPolicyTypesResult> {
        self.invoker.execute(
            call.into(),
            marshall::describe_load_balancer_policy_types,
            unmarshall::describe_load_balancer_policy_types,
        )
    }

    pub fn set_load_balancer_policies_for_backend_server(
        &self,
        call: impl Into<Call<SetLoadBalancerPoliciesForBackendServerRequest>>,
    ) -> ElbResult<SetLoadBalancerPoliciesForBackendServerResult> {
        self.invoker.execute(
            call.into(),
            marshall::set_load_balancer_policies_for_backend_server,
            unmarshall::set_load_balancer_policies_for_backend_server,
        )
    }

    pub fn set_load_balancer_policies_of_listener(
        &self,
        call: impl Into<Call<SetLoadBalancerPoliciesOfListenerRequest>>,
    ) -> ElbResult<SetLoadBalancerPoliciesOfListenerResult> {
        self.invoker.execute(
            call.into(),
            marshall::set_load_balancer_policies_of_listener,
            unmarshall::set_load_balancer_policies_of_listener,
        )
    }

    // ── Instances ───────────────────────────────────────────────────

    pub fn register_instances_with_load_balancer(
        &self,
        call: impl Into<Call<RegisterInstancesWithLoadBalancerRequest>>,
    ) -> ElbResult<RegisterInstancesWithLoadBalancerResult> {
        self.invoker.execute(
            call.into(),
            marshall::register_instances_with_load_balancer,
            unmarshall::register_instances_with_load_balancer,
        )
    }

    pub fn deregister_instances_from_load_balancer(
        &self,
        call: impl Into<Call<DeregisterInstancesFromLoadBalancerRequest>>,
    ) -> ElbResult<DeregisterInstancesFromLoadBalancerResult> {
        self.invoker.execute(
            call.into(),
            marshall::deregister_instances_from_load_balancer,
            unmarshall::deregister_instances_from_load_balancer,
        )
    }

    pub fn describe_instance_health(
        &self,
        call: impl Into<Call<DescribeInstanceHealthRequest>>,
    ) -> ElbResult<DescribeInstanceHealthResult> {
        self.invoker
            .execute(call.into(), marshall::describe_instance_health, unmarshall::describe_instance_health)
    }

    // ── Tags ────────────────────────────────────────────────────────

    pub fn add_tags(&self, call: impl Into<Call<AddTagsRequest>>) -> ElbResult<AddTagsResult> {
        self.invoker.execute(call.into(), marshall::add_tags, unmarshall::add_tags)
    }

    pub fn remove_tags(&self, call: impl Into<Call<RemoveTagsRequest>>) -> ElbResult<RemoveTagsResult> {
        self.invoker.execute(call.into(), marshall::remove_tags, unmarshall::remove_tags)
    }

    pub fn describe_tags(&self, call: impl Into<Call<DescribeTagsRequest>>) -> ElbResult<DescribeTagsResult> {
        self.invoker.execute(call.into(), marshall::describe_tags, unmarshall::describe_tags)
    }
}

impl std::fmt::Debug for ElbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElbClient")
            .field("endpoint", &self.endpoint().as_str())
            .field("signing_region", &self.signing_region())
            .finish()
    }
}

/// Configures an [`ElbClient`]. Anything left unset gets the workspace
/// defaults: reqwest transport, environment credentials, SigV4, no metrics.
pub struct ElbClientBuilder {
    inner: InvokerBuilder<ElbErrorKind>,
}

impl ElbClientBuilder {
    pub fn new() -> Self {
        Self {
            inner: InvokerBuilder::new(ELB_SERVICE),
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.config(config);
        self
    }

    /// Sign with fixed credentials.
    pub fn credentials(self, credentials: Credentials) -> Self {
        self.credentials_provider(Arc::new(StaticCredentialsProvider::new(credentials)))
    }

    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.inner = self.inner.credentials_provider(provider);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.inner = self.inner.transport(transport);
        self
    }

    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.inner = self.inner.signer(signer);
        self
    }

    pub fn metrics(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.inner = self.inner.metrics(collector);
        self
    }

    pub fn build(self) -> Result<ElbClient, ClientError> {
        let config = self.inner.client_config().clone();
        let invoker = self.inner.build()?;
        Ok(ElbClient { invoker, config })
    }
}

impl Default for ElbClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
