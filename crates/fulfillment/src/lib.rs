//! Fulfillment workflow engine.
//!
//! Creates orders, discovers the pick jobs the server derives from them and
//! moves those pick jobs through `OPEN → IN_PROGRESS → CLOSED` with
//! optimistic concurrency control.
//!
//! - [`service`]: the four API operations plus pick job polling
//! - [`post_condition`]: verification that a versioned mutation landed
//! - [`retry`]: fixed-delay retry for eventually-consistent reads
//! - [`transport`]: the HTTP seam and its in-memory double
//! - [`identity`]: bearer token acquisition
//! - [`workflow`]: the end-to-end flow for one order

pub mod error;
pub mod identity;
pub mod post_condition;
pub mod retry;
pub mod service;
pub mod transport;
pub mod workflow;

pub use error::{FulfillmentError, Result};
pub use identity::{HttpIdentityClient, StaticTokenProvider, TokenProvider};
pub use post_condition::{ConflictReason, PostCondition};
pub use retry::{RetryPolicy, retry};
pub use service::FulfillmentService;
pub use transport::{ApiRequest, HttpTransport, InMemoryTransport, Method, Transport};
pub use workflow::{FulfillmentWorkflow, WorkflowReport};
