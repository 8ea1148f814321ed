//! AsyncElbClient: handles, handlers, cancellation and the pool bound.

use lbsdk_core::{
    handler_fn, ClientConfig, ClientError, Credentials, HttpRequest, HttpResponse, HttpTransport, SdkError,
    TaskState, TransportError,
};
use lbsdk_elb::model::*;
use lbsdk_elb::{AsyncElbClient, ElbClient, ElbErrorKind};
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

mock! {
    Transport {}
    impl HttpTransport for Transport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
    }
}

fn async_client(transport: MockTransport, pool_size: usize) -> AsyncElbClient {
    let client = ElbClient::builder()
        .config(ClientConfig::default().with_async_pool_size(pool_size))
        .credentials(Credentials::new("AKIDTEST", "secret"))
        .transport(Arc::new(transport))
        .build()
        .unwrap();
    AsyncElbClient::new(client).unwrap()
}

fn delete_ok() -> HttpResponse {
    HttpResponse::new(
        200,
        "<DeleteLoadBalancerResponse><DeleteLoadBalancerResult/></DeleteLoadBalancerResponse>",
    )
}

#[test]
fn pool_size_comes_from_config() {
    let client = async_client(MockTransport::new(), 3);
    assert_eq!(client.pool_size(), 3);
}

#[test]
fn handle_delivers_the_result() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| {
        Ok(HttpResponse::new(
            200,
            "<DescribeTagsResponse><DescribeTagsResult><TagDescriptions><member>\
             <LoadBalancerName>web</LoadBalancerName>\
             <Tags><member><Key>env</Key><Value>prod</Value></member></Tags>\
             </member></TagDescriptions></DescribeTagsResult></DescribeTagsResponse>",
        ))
    });
    let client = async_client(transport, 2);

    let out = client
        .describe_tags_async(DescribeTagsRequest::new(["web"]))
        .wait()
        .unwrap();
    assert_eq!(out.tag_descriptions.len(), 1);
    assert_eq!(out.tag_descriptions[0].tags, vec![Tag::new("env", "prod")]);
}

#[test]
fn handler_sees_the_original_request() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| Ok(delete_ok()));
    let client = async_client(transport, 1);

    let (tx, rx) = mpsc::channel();
    let handler = handler_fn(
        move |req: &DeleteLoadBalancerRequest, _: &DeleteLoadBalancerResult| {
            tx.send(req.load_balancer_name.clone()).unwrap();
        },
        |_: &SdkError<ElbErrorKind>| panic!("unexpected failure"),
    );
    let handle = client.delete_load_balancer_async_with_handler(DeleteLoadBalancerRequest::new("web"), handler);

    assert!(handle.wait().is_ok());
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap().as_deref(), Some("web"));
}

#[test]
fn handler_receives_service_errors() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| {
        Ok(HttpResponse::new(
            400,
            "<ErrorResponse><Error><Type>Sender</Type><Code>DuplicateLoadBalancerName</Code>\
             <Message>exists</Message></Error><RequestId>r</RequestId></ErrorResponse>",
        ))
    });
    let client = async_client(transport, 1);

    let (tx, rx) = mpsc::channel();
    let handler = handler_fn(
        |_: &CreateLoadBalancerRequest, _: &CreateLoadBalancerResult| panic!("unexpected success"),
        move |err: &SdkError<ElbErrorKind>| {
            tx.send(err.kind()).unwrap();
        },
    );
    let req = CreateLoadBalancerRequest::new("web", vec![Listener::new("TCP", 443, 443)]);
    let err = client
        .create_load_balancer_async_with_handler(req, handler)
        .wait()
        .unwrap_err();

    assert_eq!(err.kind(), Some(ElbErrorKind::DuplicateLoadBalancerName));
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        Some(ElbErrorKind::DuplicateLoadBalancerName)
    );
}

#[test]
fn queued_call_can_be_cancelled() {
    let (release_tx, release_rx) = mpsc::sync_channel::<()>(0);
    let release_rx = std::sync::Mutex::new(release_rx);

    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(move |_| {
        let _ = release_rx.lock().unwrap().recv_timeout(Duration::from_secs(5));
        Ok(delete_ok())
    });
    let client = async_client(transport, 1);

    let first = client.delete_load_balancer_async(DeleteLoadBalancerRequest::new("a"));
    let second = client.delete_load_balancer_async(DeleteLoadBalancerRequest::new("b"));

    assert!(second.cancel());
    assert_eq!(second.state(), TaskState::Cancelled);
    release_tx.send(()).unwrap();

    assert!(first.wait().is_ok());
    assert_eq!(second.wait().unwrap_err(), SdkError::Client(ClientError::Cancelled));
}

#[test]
fn concurrency_never_exceeds_the_pool_size() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (i, p) = (Arc::clone(&in_flight), Arc::clone(&peak));

    let mut transport = MockTransport::new();
    transport.expect_send().times(9).returning(move |_| {
        let now = i.fetch_add(1, Ordering::SeqCst) + 1;
        p.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(15));
        i.fetch_sub(1, Ordering::SeqCst);
        Ok(delete_ok())
    });
    let client = async_client(transport, 3);

    let handles: Vec<_> = (0..9)
        .map(|n| client.delete_load_balancer_async(DeleteLoadBalancerRequest::new(format!("lb-{}", n))))
        .collect();
    for handle in handles {
        assert!(handle.wait().is_ok());
    }
    assert!(peak.load(Ordering::SeqCst) <= 3);
}

#[test]
fn graceful_shutdown_finishes_queued_calls() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(4).returning(|_| {
        std::thread::sleep(Duration::from_millis(20));
        Ok(delete_ok())
    });
    let client = async_client(transport, 1);

    let handles: Vec<_> = (0..4)
        .map(|n| client.delete_load_balancer_async(DeleteLoadBalancerRequest::new(format!("lb-{}", n))))
        .collect();
    client.shutdown_graceful(Duration::from_secs(10));

    for handle in handles {
        assert!(handle.wait().is_ok());
    }
}

#[test]
fn validation_failures_surface_through_the_handle() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(0);
    let client = async_client(transport, 1);

    let err = client
        .configure_health_check_async(ConfigureHealthCheckRequest::default())
        .wait()
        .unwrap_err();
    assert!(matches!(err, SdkError::Client(ClientError::MissingField { .. })));
}

#[tokio::test]
async fn handle_can_be_awaited() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| {
        Ok(HttpResponse::new(
            200,
            "<DescribeLoadBalancerPolicyTypesResponse><DescribeLoadBalancerPolicyTypesResult>\
             <PolicyTypeDescriptions><member><PolicyTypeName>SSLNegotiationPolicyType</PolicyTypeName>\
             <Description>Listener policy that defines the ciphers</Description>\
             </member></PolicyTypeDescriptions>\
             </DescribeLoadBalancerPolicyTypesResult></DescribeLoadBalancerPolicyTypesResponse>",
        ))
    });
    let client = async_client(transport, 2);

    let out = client
        .describe_load_balancer_policy_types_async(DescribeLoadBalancerPolicyTypesRequest::default())
        .await
        .unwrap();
    assert_eq!(
        out.policy_type_descriptions[0].policy_type_name.as_deref(),
        Some("SSLNegotiationPolicyType")
    );
}
