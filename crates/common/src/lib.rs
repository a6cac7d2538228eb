//! Shared types for the fulfillment workflow crates.

pub mod types;

pub use types::{AuthToken, OrderId, PickJobId, Version};
