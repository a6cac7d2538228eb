//! Declarative contract validation over untyped JSON payloads.
//!
//! A [`Contract`] describes its field rules in [`Contract::check`] against a
//! [`Validator`]. The validator walks the payload, records every violated rule
//! with its JSON path, and never stops at the first failure. Only a payload
//! without issues is deserialized into the typed value, so a typed value that
//! came out of [`Contract::parse`] always satisfies its invariants.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Issue, ValidationError};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

static ISO_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d*)?(?:Z|[+-]\d{2}:\d{2})?$")
        .expect("ISO-8601 pattern compiles")
});

static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("country code pattern compiles"));

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("token pattern compiles"));

/// A typed payload guarded by field rules.
pub trait Contract: Serialize + DeserializeOwned {
    /// Contract name used in error messages.
    const NAME: &'static str;

    /// Records every rule `value` violates.
    fn check(value: &Value, v: &mut Validator);

    /// Validates an untyped payload and converts it into the typed value.
    ///
    /// Keys not named by the contract are dropped.
    fn parse(value: &Value) -> Result<Self, ValidationError> {
        let mut v = Validator::new();
        Self::check(value, &mut v);
        v.finish(Self::NAME)?;
        <Self as Deserialize>::deserialize(value)
            .map_err(|e| ValidationError::single(Self::NAME, "", e.to_string()))
    }

    /// Re-validates a locally built value before it leaves the process.
    fn validated(&self) -> Result<Self, ValidationError> {
        let value = serde_json::to_value(self)
            .map_err(|e| ValidationError::single(Self::NAME, "", e.to_string()))?;
        Self::parse(&value)
    }
}

/// Parses a non-empty JSON array of `C`.
pub fn parse_non_empty<C: Contract>(value: &Value) -> Result<Vec<C>, ValidationError> {
    let mut v = Validator::new();
    v.check_list(value, Cardinality::NonEmpty, |v, item| C::check(item, v));
    v.finish(C::NAME)?;
    value
        .as_array()
        .into_iter()
        .flatten()
        .map(|item| {
            <C as Deserialize>::deserialize(item)
                .map_err(|e| ValidationError::single(C::NAME, "", e.to_string()))
        })
        .collect()
}

/// A closed set of string values.
pub trait ContractEnum {
    /// Every accepted wire value.
    const VARIANTS: &'static [&'static str];
}

/// Whether a field must be present.
///
/// `null` counts as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Rules for string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    /// Any string, including the empty one.
    Any,
    /// At least one character.
    NonEmpty,
    /// At least one character and no line breaks.
    SingleLine,
    Email,
    /// ISO-8601 date-time with optional fractional seconds and `Z`/offset.
    IsoDateTime,
    /// ISO 3166-1 alpha-2, upper case.
    CountryCode,
    Uuid,
    /// Upper-case server token such as `OPEN` or `IN_PROGRESS`.
    Token,
}

impl Text {
    fn check(self, s: &str) -> Result<(), &'static str> {
        let ok = match self {
            Text::Any => true,
            Text::NonEmpty => !s.is_empty(),
            Text::SingleLine => {
                !s.is_empty()
                    && !s
                        .chars()
                        .any(|c| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
            }
            Text::Email => EMAIL.is_match(s),
            Text::IsoDateTime => ISO_DATE_TIME.is_match(s),
            Text::CountryCode => COUNTRY_CODE.is_match(s),
            Text::Uuid => uuid::Uuid::parse_str(s).is_ok(),
            Text::Token => TOKEN.is_match(s),
        };
        if ok { Ok(()) } else { Err(self.expectation()) }
    }

    fn expectation(self) -> &'static str {
        match self {
            Text::Any => "expected string",
            Text::NonEmpty => "must contain at least 1 character",
            Text::SingleLine => "must be a non-empty single line",
            Text::Email => "invalid email address",
            Text::IsoDateTime => "must be an ISO-8601 date-time",
            Text::CountryCode => "must be a two-letter upper-case country code",
            Text::Uuid => "must be a UUID",
            Text::Token => "must be an upper-case status token",
        }
    }
}

/// Inclusive integer bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Bounds {
    /// No bounds.
    pub const ANY: Bounds = Bounds {
        min: None,
        max: None,
    };

    /// Non-negative integers.
    pub const NON_NEGATIVE: Bounds = Bounds::at_least(0);

    /// Strictly positive integers.
    pub const POSITIVE: Bounds = Bounds::at_least(1);

    pub const fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn check(&self, n: i128) -> Result<(), String> {
        match (self.min, self.max) {
            (Some(min), _) if n < i128::from(min) => {
                Err(format!("must be greater than or equal to {min}"))
            }
            (_, Some(max)) if n > i128::from(max) => {
                Err(format!("must be less than or equal to {max}"))
            }
            _ => Ok(()),
        }
    }
}

/// Whether an array may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Any,
    NonEmpty,
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Collects rule violations while walking a payload.
#[derive(Debug, Default)]
pub struct Validator {
    path: Vec<Segment>,
    issues: Vec<Issue>,
}

impl Validator {
    /// Creates a validator positioned at the payload root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation at the current path.
    pub fn report(&mut self, message: impl Into<String>) {
        let path = self.current_path();
        self.issues.push(Issue::new(path, message));
    }

    /// Returns true while no violation has been recorded.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the recorded violations.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Converts the collected violations into a result for `contract`.
    pub fn finish(self, contract: &'static str) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(contract, self.issues))
        }
    }

    /// Runs `f` one level deeper, under the object key `key`.
    pub fn at_key<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(Segment::Key(key.to_string()));
        let result = f(self);
        self.path.pop();
        result
    }

    /// Runs `f` one level deeper, under the array index `index`.
    pub fn at_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(Segment::Index(index));
        let result = f(self);
        self.path.pop();
        result
    }

    fn current_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) if out.is_empty() => out.push_str(key),
                Segment::Key(key) => {
                    out.push('.');
                    out.push_str(key);
                }
                Segment::Index(index) => out.push_str(&format!("[{index}]")),
            }
        }
        out
    }

    // ---- value-level rules -------------------------------------------------

    /// Requires `value` to be an object and returns it.
    pub fn object<'a>(&mut self, value: &'a Value) -> Option<&'a Map<String, Value>> {
        match value.as_object() {
            Some(obj) => Some(obj),
            None => {
                self.report(format!("expected object, received {}", kind(value)));
                None
            }
        }
    }

    pub fn check_text(&mut self, value: &Value, rule: Text) {
        match value.as_str() {
            Some(s) => {
                if let Err(message) = rule.check(s) {
                    self.report(message);
                }
            }
            None => self.report(format!("expected string, received {}", kind(value))),
        }
    }

    pub fn check_integer(&mut self, value: &Value, bounds: Bounds) {
        let n = match value {
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from)),
            _ => None,
        };
        match n {
            Some(n) => {
                if let Err(message) = bounds.check(n) {
                    self.report(message);
                }
            }
            None => self.report(format!("expected integer, received {}", kind(value))),
        }
    }

    pub fn check_number(&mut self, value: &Value) {
        if !value.is_number() {
            self.report(format!("expected number, received {}", kind(value)));
        }
    }

    pub fn check_boolean(&mut self, value: &Value) {
        if !value.is_boolean() {
            self.report(format!("expected boolean, received {}", kind(value)));
        }
    }

    pub fn check_one_of<E: ContractEnum>(&mut self, value: &Value) {
        match value.as_str() {
            Some(s) if E::VARIANTS.contains(&s) => {}
            Some(s) => self.report(format!(
                "expected one of {}, received \"{s}\"",
                E::VARIANTS.join(" | ")
            )),
            None => self.report(format!(
                "expected one of {}, received {}",
                E::VARIANTS.join(" | "),
                kind(value)
            )),
        }
    }

    /// Requires `value` to be an array and checks every element with `each`.
    pub fn check_list(
        &mut self,
        value: &Value,
        cardinality: Cardinality,
        mut each: impl FnMut(&mut Self, &Value),
    ) {
        let Some(items) = value.as_array() else {
            self.report(format!("expected array, received {}", kind(value)));
            return;
        };
        if cardinality == Cardinality::NonEmpty && items.is_empty() {
            self.report("must contain at least 1 element");
        }
        for (index, item) in items.iter().enumerate() {
            self.at_index(index, |v| each(v, item));
        }
    }

    // ---- field-level rules -------------------------------------------------

    /// Returns the field's value, reporting it when a required field is absent.
    pub fn field<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        presence: Presence,
    ) -> Option<&'a Value> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                if presence == Presence::Required {
                    self.at_key(key, |v| v.report("required"));
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    pub fn text(&mut self, obj: &Map<String, Value>, key: &str, presence: Presence, rule: Text) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| v.check_text(value, rule));
        }
    }

    pub fn integer(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        presence: Presence,
        bounds: Bounds,
    ) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| v.check_integer(value, bounds));
        }
    }

    pub fn number(&mut self, obj: &Map<String, Value>, key: &str, presence: Presence) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| v.check_number(value));
        }
    }

    pub fn boolean(&mut self, obj: &Map<String, Value>, key: &str, presence: Presence) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| v.check_boolean(value));
        }
    }

    pub fn one_of<E: ContractEnum>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        presence: Presence,
    ) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| v.check_one_of::<E>(value));
        }
    }

    /// A free-form JSON object.
    pub fn free_form(&mut self, obj: &Map<String, Value>, key: &str, presence: Presence) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| {
                v.object(value);
            });
        }
    }

    /// Any JSON value; only presence is checked.
    pub fn any(&mut self, obj: &Map<String, Value>, key: &str, presence: Presence) {
        self.field(obj, key, presence);
    }

    pub fn nested<C: Contract>(&mut self, obj: &Map<String, Value>, key: &str, presence: Presence) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| C::check(value, v));
        }
    }

    pub fn list_of<C: Contract>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        presence: Presence,
        cardinality: Cardinality,
    ) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| {
                v.check_list(value, cardinality, |v, item| C::check(item, v))
            });
        }
    }

    pub fn list_of_text(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        presence: Presence,
        rule: Text,
    ) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| {
                v.check_list(value, Cardinality::Any, |v, item| v.check_text(item, rule))
            });
        }
    }

    /// An array whose elements are not constrained.
    pub fn list_of_any(&mut self, obj: &Map<String, Value>, key: &str, presence: Presence) {
        if let Some(value) = self.field(obj, key, presence) {
            self.at_key(key, |v| v.check_list(value, Cardinality::Any, |_, _| {}));
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
