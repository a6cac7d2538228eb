//! Consumer (end customer) contracts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Cardinality, Contract, Presence, Text, Validator};
use crate::shared::CustomAttributes;

/// A postal address of a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerAddress {
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,

    /// ISO 3166-1 alpha-2, e.g. `DE`.
    pub country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_address_info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salutation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl ConsumerAddress {
    /// Creates an address with the required fields only.
    pub fn new(
        street: impl Into<String>,
        house_number: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            house_number: house_number.into(),
            postal_code: postal_code.into(),
            city: city.into(),
            country: country.into(),
            phone_numbers: None,
            additional_address_info: None,
            custom_attributes: None,
            salutation: None,
            first_name: None,
            last_name: last_name.into(),
            company_name: None,
        }
    }
}

impl Contract for ConsumerAddress {
    const NAME: &'static str = "ConsumerAddress";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "street", Presence::Required, Text::SingleLine);
        v.text(obj, "houseNumber", Presence::Required, Text::SingleLine);
        v.text(obj, "postalCode", Presence::Required, Text::SingleLine);
        v.text(obj, "city", Presence::Required, Text::SingleLine);
        v.text(obj, "country", Presence::Required, Text::CountryCode);
        v.list_of_any(obj, "phoneNumbers", Presence::Optional);
        v.text(obj, "additionalAddressInfo", Presence::Optional, Text::Any);
        v.free_form(obj, "customAttributes", Presence::Optional);
        v.text(obj, "salutation", Presence::Optional, Text::Any);
        v.text(obj, "firstName", Presence::Optional, Text::Any);
        v.text(obj, "lastName", Presence::Required, Text::Any);
        v.text(obj, "companyName", Presence::Optional, Text::Any);
    }
}

/// The customer an order is placed for.
///
/// The address list may be structurally empty, although a real order is
/// expected to carry at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumer {
    pub email: String,
    pub addresses: Vec<ConsumerAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,
}

impl Consumer {
    pub fn new(email: impl Into<String>, addresses: Vec<ConsumerAddress>) -> Self {
        Self {
            email: email.into(),
            addresses,
            custom_attributes: None,
        }
    }
}

impl Contract for Consumer {
    const NAME: &'static str = "Consumer";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "email", Presence::Required, Text::Email);
        v.list_of::<ConsumerAddress>(obj, "addresses", Presence::Required, Cardinality::Any);
        v.free_form(obj, "customAttributes", Presence::Optional);
    }
}
