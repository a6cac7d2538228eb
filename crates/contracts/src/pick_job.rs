//! Pick job contracts and the pick status state machine.

use common::{OrderId, PickJobId, Version};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Bounds, Cardinality, Contract, ContractEnum, Presence, Text, Validator};
use crate::shared::{CustomAttributes, LineItemArticle, Timestamp};

/// Status of a pick job or pick line item.
///
/// State transitions:
/// ```text
/// Open ──► InProgress ──► Closed
///   │                       ▲
///   └───────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickStatus {
    #[default]
    Open,
    InProgress,
    /// Terminal.
    Closed,
}

impl PickStatus {
    /// Returns true if a mutation may move this status to `target`.
    ///
    /// Status only ever moves forward.
    pub fn can_transition_to(&self, target: PickStatus) -> bool {
        self.rank() < target.rank()
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, PickStatus::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PickStatus::Open => "OPEN",
            PickStatus::InProgress => "IN_PROGRESS",
            PickStatus::Closed => "CLOSED",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            PickStatus::Open => 0,
            PickStatus::InProgress => 1,
            PickStatus::Closed => 2,
        }
    }
}

impl ContractEnum for PickStatus {
    const VARIANTS: &'static [&'static str] = &["OPEN", "IN_PROGRESS", "CLOSED"];
}

impl std::fmt::Display for PickStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a pick job's goods leave the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryChannel {
    Collect,
    Shipping,
}

impl ContractEnum for DeliveryChannel {
    const VARIANTS: &'static [&'static str] = &["COLLECT", "SHIPPING"];
}

/// One article to pick, with requested and picked quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickLineItem {
    pub article: LineItemArticle,

    /// Requested quantity, at least 1.
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scannable_codes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,

    pub id: String,

    /// Picked so far; never above `quantity` once closed.
    pub picked: u32,

    pub status: PickStatus,
}

impl PickLineItem {
    /// Returns true if the item is closed with exactly the requested quantity picked.
    pub fn is_perfectly_picked(&self) -> bool {
        self.status == PickStatus::Closed && self.picked == self.quantity
    }
}

impl Contract for PickLineItem {
    const NAME: &'static str = "PickLineItem";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.nested::<LineItemArticle>(obj, "article", Presence::Required);
        v.integer(obj, "quantity", Presence::Required, Bounds::POSITIVE);
        v.list_of_text(obj, "scannableCodes", Presence::Optional, Text::Any);
        v.free_form(obj, "customAttributes", Presence::Optional);
        v.text(obj, "id", Presence::Required, Text::Any);
        v.integer(obj, "picked", Presence::Required, Bounds::NON_NEGATIVE);
        v.one_of::<PickStatus>(obj, "status", Presence::Required);
    }
}

/// Delivery information of a pick job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickJobDeliveryInformation {
    pub target_time: Timestamp,
    pub channel: DeliveryChannel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Contract for PickJobDeliveryInformation {
    const NAME: &'static str = "PickJobDeliveryInformation";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "targetTime", Presence::Required, Text::IsoDateTime);
        v.one_of::<DeliveryChannel>(obj, "channel", Presence::Required);
        v.any(obj, "details", Presence::Optional);
    }
}

/// Summary projection of a pick job, as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrippedPickJob {
    pub id: PickJobId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_ref: Option<OrderId>,

    pub version: Version,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_ref: Option<String>,

    pub status: PickStatus,
    pub created: Timestamp,
    pub last_modified: Timestamp,
}

impl Contract for StrippedPickJob {
    const NAME: &'static str = "StrippedPickJob";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "id", Presence::Required, Text::Any);
        v.text(obj, "orderRef", Presence::Optional, Text::Any);
        v.integer(obj, "version", Presence::Required, Bounds::NON_NEGATIVE);
        v.text(obj, "facilityRef", Presence::Optional, Text::Any);
        v.one_of::<PickStatus>(obj, "status", Presence::Required);
        v.text(obj, "created", Presence::Required, Text::IsoDateTime);
        v.text(obj, "lastModified", Presence::Required, Text::IsoDateTime);
    }
}

/// Response body of `GET /pickjobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrippedPickJobs {
    pub total: u64,
    pub pickjobs: Vec<StrippedPickJob>,
}

impl StrippedPickJobs {
    pub fn is_empty(&self) -> bool {
        self.pickjobs.is_empty()
    }
}

impl Contract for StrippedPickJobs {
    const NAME: &'static str = "StrippedPickJobs";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.integer(obj, "total", Presence::Required, Bounds::NON_NEGATIVE);
        v.list_of::<StrippedPickJob>(obj, "pickjobs", Presence::Required, Cardinality::Any);
    }
}

/// A full pick job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickJob {
    pub id: PickJobId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_ref: Option<OrderId>,

    pub version: Version,
    pub facility_ref: String,
    pub status: PickStatus,
    pub order_date: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_order_id: Option<String>,

    /// Never empty.
    pub pick_line_items: Vec<PickLineItem>,

    #[serde(rename = "deliveryinformation")]
    pub delivery_information: PickJobDeliveryInformation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    pub short_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymized: Option<bool>,
}

impl PickJob {
    /// Returns true if every line item is closed with its full quantity picked.
    pub fn is_perfectly_picked(&self) -> bool {
        self.pick_line_items
            .iter()
            .all(PickLineItem::is_perfectly_picked)
    }
}

impl Contract for PickJob {
    const NAME: &'static str = "PickJob";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "id", Presence::Required, Text::Any);
        v.text(obj, "orderRef", Presence::Optional, Text::Any);
        v.integer(obj, "version", Presence::Required, Bounds::NON_NEGATIVE);
        v.text(obj, "facilityRef", Presence::Required, Text::Any);
        v.one_of::<PickStatus>(obj, "status", Presence::Required);
        v.text(obj, "orderDate", Presence::Required, Text::IsoDateTime);
        v.text(obj, "tenantOrderId", Presence::Optional, Text::Any);
        v.list_of::<PickLineItem>(
            obj,
            "pickLineItems",
            Presence::Required,
            Cardinality::NonEmpty,
        );
        v.nested::<PickJobDeliveryInformation>(obj, "deliveryinformation", Presence::Required);
        v.free_form(obj, "customAttributes", Presence::Optional);
        v.text(obj, "created", Presence::Optional, Text::IsoDateTime);
        v.text(obj, "lastModified", Presence::Optional, Text::IsoDateTime);
        v.text(obj, "shortId", Presence::Required, Text::Any);
        v.boolean(obj, "anonymized", Presence::Optional);
    }
}
