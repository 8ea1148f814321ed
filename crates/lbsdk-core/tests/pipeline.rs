//! End-to-end tests of the dispatch pipeline against a scripted transport.

use lbsdk_core::xml::XmlNode;
use lbsdk_core::{
    Call, ClientError, Credentials, HttpRequest, HttpResponse, HttpTransport, Invoker, Protocol, Request,
    SdkError, ServiceErrorKind, ServiceMetadata, StaticCredentialsProvider, TransportError, WorkerPool,
};
use mockall::mock;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mock! {
    Transport {}
    impl HttpTransport for Transport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WidgetError {
    WidgetNotFound,
    DuplicateWidget,
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl ServiceErrorKind for WidgetError {
    fn all() -> &'static [Self] {
        &[WidgetError::WidgetNotFound, WidgetError::DuplicateWidget]
    }

    fn code(&self) -> &'static str {
        match self {
            WidgetError::WidgetNotFound => "WidgetNotFound",
            WidgetError::DuplicateWidget => "DuplicateWidget",
        }
    }
}

const WIDGETS: ServiceMetadata = ServiceMetadata {
    signing_name: "widgets",
    endpoint_prefix: "widgets",
    default_host: "widgets.amazonaws.com",
    api_version: "2019-02-03",
    protocol: Protocol::Query,
};

#[derive(Debug, Clone, Default)]
struct DescribeWidgets {
    names: Vec<String>,
}

fn marshall(req: &DescribeWidgets) -> Result<Request, ClientError> {
    let mut r = Request::query("DescribeWidgets", WIDGETS.api_version);
    r.add_member_list("WidgetNames", &req.names);
    Ok(r)
}

fn unmarshall(resp: &HttpResponse) -> Result<Vec<String>, ClientError> {
    let result = XmlNode::parse_result(&resp.body_text(), "DescribeWidgets")?;
    Ok(result.string_list("Widgets"))
}

/// Echoes the requested names back as a DescribeWidgets response.
fn echo(req: &HttpRequest) -> Result<HttpResponse, TransportError> {
    let body = req.body_text();
    let members: String = body
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .filter(|(k, _)| k.starts_with("WidgetNames.member."))
        .map(|(_, v)| format!("<member>{}</member>", v))
        .collect();
    Ok(HttpResponse::new(
        200,
        format!(
            "<DescribeWidgetsResponse><DescribeWidgetsResult><Widgets>{}</Widgets></DescribeWidgetsResult></DescribeWidgetsResponse>",
            members
        ),
    ))
}

fn invoker(transport: MockTransport) -> Arc<Invoker<WidgetError>> {
    Arc::new(
        Invoker::builder(WIDGETS)
            .transport(Arc::new(transport))
            .credentials_provider(Arc::new(StaticCredentialsProvider::new(Credentials::new(
                "AKIDTEST", "secret",
            ))))
            .build()
            .unwrap(),
    )
}

#[test]
fn request_fields_survive_the_round_trip() {
    let mut transport = MockTransport::new();
    transport.expect_send().returning(echo);
    let invoker = invoker(transport);

    let req = DescribeWidgets {
        names: vec!["alpha".into(), "beta".into(), "gamma".into()],
    };
    let out = invoker.execute(Call::new(req.clone()), marshall, unmarshall).unwrap();
    assert_eq!(out, req.names);
}

#[test]
fn empty_list_result_is_empty_vec() {
    let mut transport = MockTransport::new();
    transport.expect_send().returning(echo);
    let invoker = invoker(transport);
    let out = invoker
        .execute(Call::new(DescribeWidgets::default()), marshall, unmarshall)
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn each_failure_has_exactly_one_classification() {
    let cases = [
        ("WidgetNotFound", Some(WidgetError::WidgetNotFound)),
        ("DuplicateWidget", Some(WidgetError::DuplicateWidget)),
        ("Throttling", None),
    ];
    for (code, expected) in cases {
        let body = format!(
            "<ErrorResponse><Error><Type>Sender</Type><Code>{}</Code><Message>nope</Message></Error><RequestId>rid</RequestId></ErrorResponse>",
            code
        );
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(move |_| Ok(HttpResponse::new(400, body.clone())));
        let err = invoker(transport)
            .execute(Call::new(DescribeWidgets::default()), marshall, unmarshall)
            .unwrap_err();
        match (err, expected) {
            (SdkError::Service { kind, details }, Some(want)) => {
                assert_eq!(kind, want);
                assert_eq!(details.request_id.as_deref(), Some("rid"));
            }
            (SdkError::Unclassified(details), None) => assert_eq!(details.code, code),
            (other, _) => panic!("{} classified as {:?}", code, other),
        }
    }
}

#[test]
fn pooled_calls_all_complete() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (i, p) = (Arc::clone(&in_flight), Arc::clone(&peak));

    let mut transport = MockTransport::new();
    transport.expect_send().times(12).returning(move |req| {
        let now = i.fetch_add(1, Ordering::SeqCst) + 1;
        p.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(10));
        i.fetch_sub(1, Ordering::SeqCst);
        echo(req)
    });
    let invoker = invoker(transport);
    let pool = WorkerPool::new(4).unwrap();

    let handles: Vec<_> = (0..12)
        .map(|n| {
            let invoker = Arc::clone(&invoker);
            pool.submit(move || {
                let req = DescribeWidgets {
                    names: vec![format!("w{}", n)],
                };
                invoker.execute(Call::new(req), marshall, unmarshall)
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.wait().unwrap(), vec![format!("w{}", n)]);
    }
    assert!(peak.load(Ordering::SeqCst) <= 4);
}
