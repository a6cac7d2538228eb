//! Integration tests for the contract schemas.

use common::{OrderId, PickJobId, Version};
use contracts::{
    ArticleAttributeItem, Consumer, ConsumerAddress, Contract, ItemCategory, LineItemArticle,
    ModificationAction, Order, OrderForCreation, OrderLineItem, PickJob, PickStatus,
    PickingPatchActions, StrippedPickJobs,
};
use serde_json::{Value, json};

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

fn line_item() -> OrderLineItem {
    let article = LineItemArticle::new("4b5c1e2a-0000-4000-8000-000000000001", "PlayStation 5")
        .with_attribute(ArticleAttributeItem {
            category: Some(ItemCategory::Descriptive),
            priority: Some(100),
            key: "color".to_string(),
            value: "white".to_string(),
        });
    let mut item = OrderLineItem::new("", article, 1);
    item.scannable_codes = Some(vec![]);
    item.shop_price = Some(1.0);
    item
}

fn server_pick_job(version: u64, status: &str, picked: u32, item_status: &str) -> Value {
    json!({
        "id": "pj-1",
        "orderRef": "order-1",
        "version": version,
        "facilityRef": "facility-1",
        "status": status,
        "orderDate": "2020-11-03T10:15:30.123Z",
        "tenantOrderId": "4b5c1e2a-0000-4000-8000-00000000abcd",
        "pickLineItems": [{
            "id": "pli-1",
            "article": {"tenantArticleId": "a-1", "title": "PlayStation 5", "attributes": []},
            "quantity": 5,
            "picked": picked,
            "status": item_status,
        }],
        "deliveryinformation": {"targetTime": "2020-11-04T10:00:00Z", "channel": "COLLECT"},
        "created": "2020-11-03T10:15:31.000Z",
        "lastModified": "2020-11-03T10:16:02.541+01:00",
        "shortId": "AB-12",
        "anonymized": false,
    })
}

#[test]
fn order_creation_payload_survives_the_outbound_gate_unchanged() {
    let order = OrderForCreation::new(consumer(), vec![line_item()]);
    let validated = order.validated().unwrap();
    assert_eq!(validated, order);

    let wire = serde_json::to_value(&validated).unwrap();
    assert_eq!(wire["orderLineItems"][0]["article"]["attributes"][0]["category"], "descriptive");
    assert_eq!(wire["consumer"]["addresses"][0]["houseNumber"], "17a");
    assert!(wire["consumer"]["addresses"][0].get("firstName").is_none());
}

#[test]
fn server_echo_of_creation_payload_parses_as_order() {
    let order = OrderForCreation::new(consumer(), vec![line_item()]);
    let mut wire = serde_json::to_value(&order).unwrap();
    wire["id"] = json!("order-1");
    wire["status"] = json!("OPEN");
    wire["version"] = json!(0);

    let parsed = Order::parse(&wire).unwrap();
    assert_eq!(parsed.id, OrderId::new("order-1"));
    assert_eq!(parsed.version, Version::initial());
    assert_eq!(parsed.order_line_items, vec![line_item()]);
    assert_eq!(
        parsed.tenant_order_id,
        Some(order.tenant_order_id.to_string())
    );
}

#[test]
fn broken_order_creation_payload_lists_every_violation() {
    let err = OrderForCreation::parse(&json!({
        "consumer": {"email": "x", "addresses": [{"country": "de"}]},
        "orderDate": "yesterday",
        "orderLineItems": [{"article": {}, "quantity": 0}],
        "tenantOrderId": "not-a-uuid",
    }))
    .unwrap_err();

    for path in [
        "consumer.email",
        "consumer.addresses[0].street",
        "consumer.addresses[0].houseNumber",
        "consumer.addresses[0].postalCode",
        "consumer.addresses[0].city",
        "consumer.addresses[0].country",
        "consumer.addresses[0].lastName",
        "orderDate",
        "orderLineItems[0].article.tenantArticleId",
        "orderLineItems[0].article.title",
        "orderLineItems[0].article.attributes",
        "orderLineItems[0].quantity",
        "orderLineItems[0].id",
        "tenantOrderId",
    ] {
        assert!(err.has_issue_at(path), "missing issue at {path}: {err}");
    }
    assert_eq!(err.issues.len(), 14);
}

#[test]
fn pick_job_response_parses_with_offsets_and_fractions() {
    let job = PickJob::parse(&server_pick_job(2, "IN_PROGRESS", 0, "OPEN")).unwrap();
    assert_eq!(job.id, PickJobId::new("pj-1"));
    assert_eq!(job.status, PickStatus::InProgress);
    assert_eq!(job.anonymized, Some(false));
}

#[test]
fn perfect_pick_patch_mirrors_line_items() {
    let job = PickJob::parse(&server_pick_job(2, "IN_PROGRESS", 0, "OPEN")).unwrap();
    let patch = PickingPatchActions::perfect_pick_and_close(&job);

    assert_eq!(patch.version, Version::new(2));
    assert_eq!(
        patch.actions,
        vec![
            ModificationAction::modify_pick_job(PickStatus::Closed),
            ModificationAction::modify_pick_line_item("pli-1", 5, PickStatus::Closed),
        ]
    );
    assert!(patch.validated().is_ok());
}

#[test]
fn empty_listing_is_structurally_valid() {
    let listing = StrippedPickJobs::parse(&json!({"total": 0, "pickjobs": []})).unwrap();
    assert!(listing.is_empty());
}

#[test]
fn non_object_payloads_are_rejected_not_panicking() {
    for payload in [json!(null), json!(42), json!("order"), json!([1, 2])] {
        assert!(Order::parse(&payload).is_err());
        assert!(PickJob::parse(&payload).is_err());
        assert!(StrippedPickJobs::parse(&payload).is_err());
    }
}
