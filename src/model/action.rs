//! Occupant-initiated territory actions.
//!
//! Hosts queue `Action`s on `PendingActions`; the actions system validates
//! them each tick and hands accepted ones to the command applicator. Every
//! action ends up with exactly one `ActionResult`.

use serde::{Deserialize, Serialize};

use super::ids::{AnchorId, OccupantId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Caller-chosen id echoed back in the result.
    pub id: u64,
    pub actor: OccupantId,
    pub kind: ActionKind,
}

/// Cells are addressed by id, as typed by a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Claim { cell: String, anchor: AnchorId },
    Release { cell: String },
    SetHeadquarters { cell: String },
    AddToTown { cell: String },
    Rename { cell: String, name: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_id: u64,
    pub actor: OccupantId,
    pub outcome: ActionOutcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Success { event_id: u64 },
    Failed { reason: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success { .. })
    }
}
