//! Data contracts of the fulfillment API.
//!
//! Every request body is validated before it is sent and every response body
//! after it is received. Validation is pure: it never performs I/O and never
//! mutates its input. A failing payload yields a [`ValidationError`] listing
//! every violated field.
//!
//! - [`schema`]: the [`Contract`] trait and the [`Validator`] rule set
//! - [`consumer`], [`order`], [`pick_job`], [`actions`]: the API shapes
//! - [`identity`]: token exchange with the identity provider

pub mod actions;
pub mod consumer;
pub mod delivery;
pub mod error;
pub mod identity;
pub mod order;
pub mod pick_job;
pub mod schema;
pub mod shared;

pub use actions::{ModificationAction, PickingPatchActions};
pub use consumer::{Consumer, ConsumerAddress};
pub use delivery::DeliveryPreferences;
pub use error::{Issue, ValidationError};
pub use identity::{TokenRequest, TokenResponse};
pub use order::{Order, OrderForCreation, OrderLineItem, OrderStatus};
pub use pick_job::{
    DeliveryChannel, PickJob, PickJobDeliveryInformation, PickLineItem, PickStatus,
    StrippedPickJob, StrippedPickJobs,
};
pub use schema::{Contract, Validator, parse_non_empty};
pub use shared::{ArticleAttributeItem, CustomAttributes, ItemCategory, LineItemArticle, Timestamp};
