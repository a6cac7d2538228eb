//! Delivery preferences of an order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Contract, Presence, Text, Validator};
use crate::shared::Timestamp;

/// How and when the consumer wants the order delivered.
///
/// `collect` and `shipping` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_time: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Value>,
}

impl Contract for DeliveryPreferences {
    const NAME: &'static str = "DeliveryPreferences";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "targetTime", Presence::Optional, Text::IsoDateTime);
        v.any(obj, "collect", Presence::Optional);
        v.any(obj, "shipping", Presence::Optional);
    }
}
