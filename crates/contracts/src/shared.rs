//! Building blocks shared by orders and pick jobs.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{Bounds, Cardinality, Contract, ContractEnum, Presence, Text, Validator};

/// Free-form tenant attributes attached to most entities.
pub type CustomAttributes = Map<String, Value>;

/// An ISO-8601 date-time as exchanged on the wire.
///
/// Kept verbatim so that a round trip through the API never rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// The current UTC time with millisecond precision, e.g. `2020-11-03T10:15:30.123Z`.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Wraps a raw string. Validity is enforced by the enclosing contract.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the timestamp. A value without offset is read as UTC.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.0).ok().or_else(|| {
            NaiveDateTime::parse_from_str(&self.0, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of an article attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemCategory {
    Descriptive,
    Miscellaneous,
    PickingSequence,
}

impl ContractEnum for ItemCategory {
    const VARIANTS: &'static [&'static str] = &["descriptive", "miscellaneous", "pickingSequence"];
}

/// A key/value attribute of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAttributeItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ItemCategory>,

    /// 1 to 1000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,

    pub key: String,
    pub value: String,
}

impl ArticleAttributeItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: None,
            priority: None,
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Contract for ArticleAttributeItem {
    const NAME: &'static str = "ArticleAttributeItem";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.one_of::<ItemCategory>(obj, "category", Presence::Optional);
        v.integer(obj, "priority", Presence::Optional, Bounds::between(1, 1000));
        v.text(obj, "key", Presence::Required, Text::NonEmpty);
        v.text(obj, "value", Presence::Required, Text::NonEmpty);
    }
}

/// The article a line item refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemArticle {
    pub tenant_article_id: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<CustomAttributes>,

    pub attributes: Vec<ArticleAttributeItem>,
}

impl LineItemArticle {
    pub fn new(tenant_article_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            tenant_article_id: tenant_article_id.into(),
            title: title.into(),
            image_url: None,
            custom_attributes: None,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute, keeping insertion order.
    pub fn with_attribute(mut self, attribute: ArticleAttributeItem) -> Self {
        self.attributes.push(attribute);
        self
    }
}

impl Contract for LineItemArticle {
    const NAME: &'static str = "LineItemArticle";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "tenantArticleId", Presence::Required, Text::Any);
        v.text(obj, "title", Presence::Required, Text::Any);
        v.text(obj, "imageUrl", Presence::Optional, Text::Any);
        v.free_form(obj, "customAttributes", Presence::Optional);
        v.list_of::<ArticleAttributeItem>(obj, "attributes", Presence::Required, Cardinality::Any);
    }
}
