//! Order contracts.

use common::{OrderId, Version};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::consumer::Consumer;
use crate::delivery::DeliveryPreferences;
use crate::schema::{Bounds, Cardinality, Contract, Presence, Text, Validator};
use crate::shared::{CustomAttributes, LineItemArticle, Timestamp};

/// Status of an order as reported by the server.
///
/// Only `OPEN` and `CANCELLED` are interpreted; any other server-defined
/// token is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Open,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Other(token) => token,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OPEN" => OrderStatus::Open,
            "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub article: LineItemArticle,

    /// Ordered quantity, at least 1.
    pub quantity: u32,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scannable_codes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,
}

impl OrderLineItem {
    pub fn new(id: impl Into<String>, article: LineItemArticle, quantity: u32) -> Self {
        Self {
            article,
            quantity,
            id: id.into(),
            scannable_codes: None,
            shop_price: None,
            custom_attributes: None,
        }
    }
}

impl Contract for OrderLineItem {
    const NAME: &'static str = "OrderLineItem";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.nested::<LineItemArticle>(obj, "article", Presence::Required);
        v.integer(obj, "quantity", Presence::Required, Bounds::POSITIVE);
        v.text(obj, "id", Presence::Required, Text::Any);
        v.list_of_text(obj, "scannableCodes", Presence::Optional, Text::Any);
        v.number(obj, "shopPrice", Presence::Optional);
        v.free_form(obj, "customAttributes", Presence::Optional);
    }
}

/// Request body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForCreation {
    pub consumer: Consumer,
    pub order_date: Timestamp,
    pub order_line_items: Vec<OrderLineItem>,

    /// Idempotency key chosen by the tenant.
    pub tenant_order_id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_preferences: Option<DeliveryPreferences>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,
}

impl OrderForCreation {
    /// Builds an order dated now with a fresh idempotency id.
    pub fn new(consumer: Consumer, order_line_items: Vec<OrderLineItem>) -> Self {
        Self {
            consumer,
            order_date: Timestamp::now(),
            order_line_items,
            tenant_order_id: Uuid::new_v4(),
            delivery_preferences: None,
            custom_attributes: None,
        }
    }
}

impl Contract for OrderForCreation {
    const NAME: &'static str = "OrderForCreation";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.nested::<Consumer>(obj, "consumer", Presence::Required);
        v.text(obj, "orderDate", Presence::Required, Text::IsoDateTime);
        v.list_of::<OrderLineItem>(
            obj,
            "orderLineItems",
            Presence::Required,
            Cardinality::NonEmpty,
        );
        v.text(obj, "tenantOrderId", Presence::Required, Text::Uuid);
        v.nested::<DeliveryPreferences>(obj, "deliveryPreferences", Presence::Optional);
        v.free_form(obj, "customAttributes", Presence::Optional);
    }
}

/// An order as stored by the server.
///
/// Created once; this system never mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub consumer: Consumer,
    pub order_date: Timestamp,
    pub order_line_items: Vec<OrderLineItem>,
    pub status: OrderStatus,
    pub version: Version,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_preferences: Option<DeliveryPreferences>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

impl Contract for Order {
    const NAME: &'static str = "Order";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "id", Presence::Required, Text::NonEmpty);
        v.nested::<Consumer>(obj, "consumer", Presence::Required);
        v.text(obj, "orderDate", Presence::Required, Text::IsoDateTime);
        v.list_of::<OrderLineItem>(
            obj,
            "orderLineItems",
            Presence::Required,
            Cardinality::NonEmpty,
        );
        v.text(obj, "status", Presence::Required, Text::Token);
        v.integer(obj, "version", Presence::Required, Bounds::NON_NEGATIVE);
        v.text(obj, "tenantOrderId", Presence::Optional, Text::Any);
        v.nested::<DeliveryPreferences>(obj, "deliveryPreferences", Presence::Optional);
        v.free_form(obj, "customAttributes", Presence::Optional);
        v.text(obj, "created", Presence::Optional, Text::IsoDateTime);
        v.text(obj, "lastModified", Presence::Optional, Text::IsoDateTime);
    }
}
