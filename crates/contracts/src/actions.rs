//! Versioned patch actions for pick jobs.

use common::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pick_job::{PickJob, PickStatus};
use crate::schema::{Bounds, Cardinality, Contract, ContractEnum, Presence, Text, Validator};

/// One modification inside a pick job patch, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ModificationAction {
    /// Changes the status of the pick job itself.
    ModifyPickJob { status: PickStatus },

    /// Records picking progress of one line item.
    ModifyPickLineItem {
        id: String,
        picked: u32,
        status: PickStatus,
    },
}

impl ModificationAction {
    pub fn modify_pick_job(status: PickStatus) -> Self {
        ModificationAction::ModifyPickJob { status }
    }

    pub fn modify_pick_line_item(id: impl Into<String>, picked: u32, status: PickStatus) -> Self {
        ModificationAction::ModifyPickLineItem {
            id: id.into(),
            picked,
            status,
        }
    }

    /// Wire name of the action.
    pub fn kind(&self) -> &'static str {
        match self {
            ModificationAction::ModifyPickJob { .. } => "ModifyPickJob",
            ModificationAction::ModifyPickLineItem { .. } => "ModifyPickLineItem",
        }
    }
}

struct ActionKind;

impl ContractEnum for ActionKind {
    const VARIANTS: &'static [&'static str] = &["ModifyPickJob", "ModifyPickLineItem"];
}

impl Contract for ModificationAction {
    const NAME: &'static str = "ModificationAction";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.one_of::<ActionKind>(obj, "action", Presence::Required);
        match obj.get("action").and_then(Value::as_str) {
            Some("ModifyPickJob") => {
                v.one_of::<PickStatus>(obj, "status", Presence::Required);
            }
            Some("ModifyPickLineItem") => {
                v.text(obj, "id", Presence::Required, Text::Any);
                v.integer(obj, "picked", Presence::Required, Bounds::NON_NEGATIVE);
                v.one_of::<PickStatus>(obj, "status", Presence::Required);
            }
            _ => {}
        }
    }
}

/// Request body of `PATCH /pickjobs/{id}`.
///
/// `version` is the version the caller last read; the server rejects or
/// the caller detects a stale write when it does not match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickingPatchActions {
    pub version: Version,

    /// Never empty.
    pub actions: Vec<ModificationAction>,
}

impl PickingPatchActions {
    pub fn new(version: Version, actions: Vec<ModificationAction>) -> Self {
        Self { version, actions }
    }

    /// A patch that only moves the pick job to `status`.
    pub fn set_status(version: Version, status: PickStatus) -> Self {
        Self::new(version, vec![ModificationAction::modify_pick_job(status)])
    }

    /// Closes `pick_job` and marks every line item as fully picked.
    ///
    /// The job-level action comes first, followed by one action per line item
    /// in line item order.
    pub fn perfect_pick_and_close(pick_job: &PickJob) -> Self {
        let mut actions = Vec::with_capacity(pick_job.pick_line_items.len() + 1);
        actions.push(ModificationAction::modify_pick_job(PickStatus::Closed));
        actions.extend(pick_job.pick_line_items.iter().map(|item| {
            ModificationAction::modify_pick_line_item(
                item.id.clone(),
                item.quantity,
                PickStatus::Closed,
            )
        }));
        Self::new(pick_job.version, actions)
    }
}

impl Contract for PickingPatchActions {
    const NAME: &'static str = "PickingPatchActions";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.integer(obj, "version", Presence::Required, Bounds::NON_NEGATIVE);
        v.list_of::<ModificationAction>(obj, "actions", Presence::Required, Cardinality::NonEmpty);
    }
}
