//! Pooled ELB client.
//!
//! Every operation of [`ElbClient`] is offered in two shapes: `*_async`
//! returns a [`TaskHandle`], and `*_async_with_handler` additionally reports
//! the outcome to an [`AsyncHandler`] on the worker thread. Either way the
//! outcome is delivered through the handle.

use crate::client::ElbClient;
use crate::error::ElbErrorKind;
use crate::model::*;
use lbsdk_core::{AsyncHandler, Call, ClientError, TaskHandle, WorkerPool};
use std::sync::Arc;
use std::time::Duration;

/// Runs [`ElbClient`] calls on a bounded pool of worker threads.
///
/// Dropping the client abandons queued calls; calls already on the wire
/// complete but nobody observes them. Use
/// [`shutdown_graceful`](Self::shutdown_graceful) to drain instead.
pub struct AsyncElbClient {
    client: Arc<ElbClient>,
    pool: WorkerPool,
}

impl AsyncElbClient {
    /// Pool sized from the client's `async_pool_size`.
    pub fn new(client: ElbClient) -> Result<Self, ClientError> {
        let size = client.config().async_pool_size;
        Self::with_pool_size(client, size)
    }

    pub fn with_pool_size(client: ElbClient, size: usize) -> Result<Self, ClientError> {
        Ok(Self {
            client: Arc::new(client),
            pool: WorkerPool::new(size)?,
        })
    }

    /// The wrapped blocking client.
    pub fn client(&self) -> &ElbClient {
        &self.client
    }

    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    /// Let queued and running calls finish, waiting at most `timeout`.
    /// Blocks the calling thread while draining.
    pub fn shutdown_graceful(self, timeout: Duration) {
        self.pool.shutdown_graceful(timeout)
    }

    /// Abandon queued calls; the same as dropping the client.
    pub fn shutdown_now(self) {
        self.pool.shutdown_now()
    }
}

macro_rules! async_operations {
    ($($op:ident, $op_async:ident, $op_with_handler:ident: $req:ty => $res:ty;)*) => {
        impl AsyncElbClient {
            $(
                pub fn $op_async(&self, call: impl Into<Call<$req>>) -> TaskHandle<$res, ElbErrorKind> {
                    let client = Arc::clone(&self.client);
                    let call = call.into();
                    self.pool.submit(move || client.$op(call))
                }

                pub fn $op_with_handler<H>(
                    &self,
                    call: impl Into<Call<$req>>,
                    handler: H,
                ) -> TaskHandle<$res, ElbErrorKind>
                where
                    H: AsyncHandler<$req, $res, ElbErrorKind>,
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
    add_tags, add_tags_async, add_tags_async_with_handler:
        AddTagsRequest => AddTagsResult;
    apply_security_groups_to_load_balancer,
    apply_security_groups_to_load_balancer_async,
    apply_security_groups_to_load_balancer_async_with_handler:
        ApplySecurityGroupsToLoadBalancerRequest => ApplySecurityGroupsToLoadBalancerResult;
    attach_load_balancer_to_subnets,
    attach_load_balancer_to_subnets_async,
    attach_load_balancer_to_subnets_async_with_handler:
        AttachLoadBalancerToSubnetsRequest => AttachLoadBalancerToSubnetsResult;
    configure_health_check, configure_health_check_async, configure_health_check_async_with_handler:
        ConfigureHealthCheckRequest => ConfigureHealthCheckResult;
    create_app_cookie_stickiness_policy,
    create_app_cookie_stickiness_policy_async,
    create_app_cookie_stickiness_policy_async_with_handler:
        CreateAppCookieStickinessPolicyRequest => CreateAppCookieStickinessPolicyResult;
    create_lb_cookie_stickiness_policy,
    create_lb_cookie_stickiness_policy_async,
    create_lb_cookie_stickiness_policy_async_with_handler:
        CreateLBCookieStickinessPolicyRequest => CreateLBCookieStickinessPolicyResult;
    create_load_balancer, create_load_balancer_async, create_load_balancer_async_with_handler:
        CreateLoadBalancerRequest => CreateLoadBalancerResult;
    create_load_balancer_listeners,
    create_load_balancer_listeners_async,
    create_load_balancer_listeners_async_with_handler:
        CreateLoadBalancerListenersRequest => CreateLoadBalancerListenersResult;
    create_load_balancer_policy, create_load_balancer_policy_async, create_load_balancer_policy_async_with_handler:
        CreateLoadBalancerPolicyRequest => CreateLoadBalancerPolicyResult;
    delete_load_balancer, delete_load_balancer_async, delete_load_balancer_async_with_handler:
        DeleteLoadBalancerRequest => DeleteLoadBalancerResult;
    delete_load_balancer_listeners,
    delete_load_balancer_listeners_async,
    delete_load_balancer_listeners_async_with_handler:
        DeleteLoadBalancerListenersRequest => DeleteLoadBalancerListenersResult;
    delete_load_balancer_policy, delete_load_balancer_policy_async, delete_load_balancer_policy_async_with_handler:
        DeleteLoadBalancerPolicyRequest => DeleteLoadBalancerPolicyResult;
    deregister_instances_from_load_balancer,
    deregister_instances_from_load_balancer_async,
    deregister_instances_from_load_balancer_async_with_handler:
        DeregisterInstancesFromLoadBalancerRequest => DeregisterInstancesFromLoadBalancerResult;
    describe_instance_health, describe_instance_health_async, describe_instance_health_async_with_handler:
        DescribeInstanceHealthRequest => DescribeInstanceHealthResult;
    describe_load_balancer_attributes,
    describe_load_balancer_attributes_async,
    describe_load_balancer_attributes_async_with_handler:
        DescribeLoadBalancerAttributesRequest => DescribeLoadBalancerAttributesResult;
    describe_load_balancer_policies,
    describe_load_balancer_policies_async,
    describe_load_balancer_policies_async_with_handler:
        DescribeLoadBalancerPoliciesRequest => DescribeLoadBalancerPoliciesResult;
    describe_load_balancer_policy_types,
    describe_load_balancer_policy_types_async,
    describe_load_balancer_policy_types_async_with_handler:
        DescribeLoadBalancerPolicyTypesRequest => DescribeLoadBalancerPolicyTypesResult;
    describe_load_balancers, describe_load_balancers_async, describe_load_balancers_async_with_handler:
        DescribeLoadBalancersRequest => DescribeLoadBalancersResult;
    describe_tags, describe_tags_async, describe_tags_async_with_handler:
        DescribeTagsRequest => DescribeTagsResult;
    detach_load_balancer_from_subnets,
    detach_load_balancer_from_subnets_async,
    detach_load_balancer_from_subnets_async_with_handler:
        DetachLoadBalancerFromSubnetsRequest => DetachLoadBalancerFromSubnetsResult;
    disable_availability_zones_for_load_balancer,
    disable_availability_zones_for_load_balancer_async,
    disable_availability_zones_for_load_balancer_async_with_handler:
        DisableAvailabilityZonesForLoadBalancerRequest => DisableAvailabilityZonesForLoadBalancerResult;
    enable_availability_zones_for_load_balancer,
    enable_availability_zones_for_load_balancer_async,
    enable_availability_zones_for_load_balancer_async_with_handler:
        EnableAvailabilityZonesForLoadBalancerRequest => EnableAvailabilityZonesForLoadBalancerResult;
    modify_load_balancer_attributes,
    modify_load_balancer_attributes_async,
    modify_load_balancer_attributes_async_with_handler:
        ModifyLoadBalancerAttributesRequest => ModifyLoadBalancerAttributesResult;
    register_instances_with_load_balancer,
    register_instances_with_load_balancer_async,
    register_instances_with_load_balancer_async_with_handler:
        RegisterInstancesWithLoadBalancerRequest => RegisterInstancesWithLoadBalancerResult;
    remove_tags, remove_tags_async, remove_tags_async_with_handler:
        RemoveTagsRequest => RemoveTagsResult;
    set_load_balancer_listener_ssl_certificate,
    set_load_balancer_listener_ssl_certificate_async,
    set_load_balancer_listener_ssl_certificate_async_with_handler:
        SetLoadBalancerListenerSSLCertificateRequest => SetLoadBalancerListenerSSLCertificateResult;
    set_load_balancer_policies_for_backend_server,
    set_load_balancer_policies_for_backend_server_async,
    set_load_balancer_policies_for_backend_server_async_with_handler:
        SetLoadBalancerPoliciesForBackendServerRequest => SetLoadBalancerPoliciesForBackendServerResult;
    set_load_balancer_policies_of_listener,
    set_load_balancer_policies_of_listener_async,
    set_load_balancer_policies_of_listener_async_with_handler:
        SetLoadBalancerPoliciesOfListenerRequest => SetLoadBalancerPoliciesOfListenerResult;
}

impl std::fmt::Debug for AsyncElbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncElbClient")
            .field("client", &self.client)
            .field("pool", &self.pool)
            .finish()
    }
}
