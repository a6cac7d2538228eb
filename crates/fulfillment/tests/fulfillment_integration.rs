//! Integration tests for the fulfillment workflow against the in-memory transport.

use std::time::Duration;

use common::{OrderId, PickJobId, Version};
use contracts::{
    Consumer, ConsumerAddress, LineItemArticle, OrderLineItem, PickStatus,
};
use fulfillment::{
    FulfillmentError, FulfillmentService, FulfillmentWorkflow, InMemoryTransport, Method,
    RetryPolicy, StaticTokenProvider,
};
use serde_json::{Value, json};

type TestWorkflow = FulfillmentWorkflow<InMemoryTransport, StaticTokenProvider>;

struct TestHarness {
    workflow: TestWorkflow,
    transport: InMemoryTransport,
}

impl TestHarness {
    fn new(policy: RetryPolicy) -> Self {
        let transport = InMemoryTransport::new();
        let workflow = FulfillmentWorkflow::new(
            FulfillmentService::new(transport.clone()),
            StaticTokenProvider::new("integration-token"),
            policy,
        );
        Self {
            workflow,
            transport,
        }
    }

    fn script_order_created(&self, items: &[OrderLineItem]) {
        self.transport.respond(
            Method::Post,
            "/orders",
            json!({
                "id": "order-1",
                "consumer": consumer(),
                "orderDate": "2020-11-03T10:15:30.123Z",
                "orderLineItems": items,
                "status": "OPEN",
                "version": 0,
                "tenantOrderId": "b3c1d6f2-6b1e-4c1a-9a8e-2d0c9f6a1e55",
            }),
        );
    }
}

fn consumer() -> Consumer {
    Consumer::new(
        "test@test.de",
        vec![ConsumerAddress::new(
            "Werdener Straße",
            "17a",
            "40226",
            "Düsseldorf",
            "DE",
            "Meier",
        )],
    )
}

fn playstation(quantity: u32) -> OrderLineItem {
    OrderLineItem::new("", LineItemArticle::new("a-ps5", "PlayStation 5"), quantity)
}

fn summary(id: &str, version: u64) -> Value {
    json!({
        "id": id,
        "orderRef": "order-1",
        "version": version,
        "facilityRef": "facility-1",
        "status": "OPEN",
        "created": "2020-11-03T10:15:31.000Z",
        "lastModified": "2020-11-03T10:15:31.000Z",
    })
}

fn pick_job(id: &str, version: u64, status: &str, quantity: u32, picked: u32, line_status: &str) -> Value {
    json!({
        "id": id,
        "orderRef": "order-1",
        "version": version,
        "facilityRef": "facility-1",
        "status": status,
        "orderDate": "2020-11-03T10:15:30.123Z",
        "pickLineItems": [{
            "article": {"tenantArticleId": "a-ps5", "title": "PlayStation 5", "attributes": []},
            "quantity": quantity,
            "id": format!("{id}-line-1"),
            "picked": picked,
            "status": line_status,
        }],
        "deliveryinformation": {
            "targetTime": "2020-11-04T10:00:00.000Z",
            "channel": "SHIPPING",
        },
        "shortId": "AB-1",
    })
}

#[tokio::test(start_paused = true)]
async fn test_order_is_created_picked_and_closed() {
    let harness = TestHarness::new(RetryPolicy::default());
    let items = [playstation(1), playstation(1)];
    harness.script_order_created(&items);
    harness.transport.respond(
        Method::Get,
        "/pickjobs",
        json!({"total": 1, "pickjobs": [summary("pj-1", 1)]}),
    );
    harness.transport.respond(
        Method::Patch,
        "/pickjobs/pj-1",
        pick_job("pj-1", 2, "IN_PROGRESS", 5, 0, "OPEN"),
    );
    harness.transport.respond(
        Method::Patch,
        "/pickjobs/pj-1",
        pick_job("pj-1", 3, "CLOSED", 5, 5, "CLOSED"),
    );

    let report = harness.workflow.run(&items, &consumer()).await.unwrap();

    assert_eq!(report.order.id, OrderId::new("order-1"));
    assert_eq!(report.order.version, Version::initial());
    assert_eq!(report.closed_pick_jobs.len(), 1);

    let closed = &report.closed_pick_jobs[0];
    assert_eq!(closed.version, Version::new(3));
    assert_eq!(closed.status, PickStatus::Closed);
    assert_eq!(closed.pick_line_items[0].picked, 5);
    assert_eq!(closed.pick_line_items[0].status, PickStatus::Closed);

    let patches = harness.transport.requests_to(Method::Patch, "/pickjobs/pj-1");
    assert_eq!(patches.len(), 2);
    assert_eq!(patches[0].body.as_ref().unwrap()["version"], 1);
    assert_eq!(patches[1].body.as_ref().unwrap()["version"], 2);
    assert_eq!(
        patches[1].body.as_ref().unwrap()["actions"][1],
        json!({"action": "ModifyPickLineItem", "id": "pj-1-line-1", "picked": 5, "status": "CLOSED"})
    );
    assert!(
        harness
            .transport
            .requests()
            .iter()
            .all(|r| r.token.expose() == "integration-token")
    );
}

#[tokio::test(start_paused = true)]
async fn test_every_pick_job_is_processed() {
    let harness = TestHarness::new(RetryPolicy::default());
    let items = [playstation(1)];
    harness.script_order_created(&items);
    harness.transport.respond(
        Method::Get,
        "/pickjobs",
        json!({"total": 2, "pickjobs": [summary("pj-1", 1), summary("pj-2", 4)]}),
    );
    for (id, version) in [("pj-1", 1), ("pj-2", 4)] {
        let path = format!("/pickjobs/{id}");
        harness.transport.respond(
            Method::Patch,
            path.clone(),
            pick_job(id, version + 1, "IN_PROGRESS", 1, 0, "OPEN"),
        );
        harness.transport.respond(
            Method::Patch,
            path,
            pick_job(id, version + 2, "CLOSED", 1, 1, "CLOSED"),
        );
    }

    let report = harness.workflow.run(&items, &consumer()).await.unwrap();

    let ids: Vec<PickJobId> = report.closed_pick_jobs.iter().map(|j| j.id.clone()).collect();
    assert_eq!(ids, vec![PickJobId::new("pj-1"), PickJobId::new("pj-2")]);
    assert_eq!(report.closed_pick_jobs[1].version, Version::new(6));
}

#[tokio::test(start_paused = true)]
async fn test_pick_jobs_appearing_late_are_found() {
    let harness = TestHarness::new(RetryPolicy::fixed(5, Duration::from_secs(2)));
    let items = [playstation(1)];
    harness.script_order_created(&items);
    harness
        .transport
        .respond(Method::Get, "/pickjobs", json!({"total": 0, "pickjobs": []}));
    harness.transport.respond(
        Method::Get,
        "/pickjobs",
        json!({"total": 1, "pickjobs": [summary("pj-1", 1)]}),
    );
    harness.transport.respond(
        Method::Patch,
        "/pickjobs/pj-1",
        pick_job("pj-1", 2, "IN_PROGRESS", 1, 0, "OPEN"),
    );
    harness.transport.respond(
        Method::Patch,
        "/pickjobs/pj-1",
        pick_job("pj-1", 3, "CLOSED", 1, 1, "CLOSED"),
    );

    let start = tokio::time::Instant::now();
    let report = harness.workflow.run(&items, &consumer()).await.unwrap();

    assert_eq!(report.closed_pick_jobs.len(), 1);
    assert_eq!(harness.transport.requests_to(Method::Get, "/pickjobs").len(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_polling_exhaustion_surfaces_no_pick_jobs() {
    let harness = TestHarness::new(RetryPolicy::fixed(5, Duration::from_secs(2)));
    let items = [playstation(1)];
    harness.script_order_created(&items);
    harness
        .transport
        .respond_always(Method::Get, "/pickjobs", json!({"total": 0, "pickjobs": []}));

    let start = tokio::time::Instant::now();
    let err = harness.workflow.run(&items, &consumer()).await.unwrap_err();

    assert!(matches!(err, FulfillmentError::NoPickJobs { ref order_ref } if order_ref.as_str() == "order-1"));
    assert_eq!(harness.transport.requests_to(Method::Get, "/pickjobs").len(), 6);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
    assert!(harness.transport.requests_to(Method::Patch, "/pickjobs/pj-1").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lost_update_aborts_the_run() {
    let harness = TestHarness::new(RetryPolicy::default());
    let items = [playstation(1)];
    harness.script_order_created(&items);
    harness.transport.respond(
        Method::Get,
        "/pickjobs",
        json!({"total": 1, "pickjobs": [summary("pj-1", 1)]}),
    );
    // Another writer advanced the job in between.
    harness.transport.respond(
        Method::Patch,
        "/pickjobs/pj-1",
        pick_job("pj-1", 3, "IN_PROGRESS", 1, 0, "OPEN"),
    );

    let err = harness.workflow.run(&items, &consumer()).await.unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(harness.transport.requests_to(Method::Patch, "/pickjobs/pj-1").len(), 1);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_server() {
    let harness = TestHarness::new(RetryPolicy::none());

    let err = harness
        .workflow
        .run(&[playstation(0)], &consumer())
        .await
        .unwrap_err();

    assert!(err.is_contract_violation());
    assert_eq!(harness.transport.request_count(), 0);
}
