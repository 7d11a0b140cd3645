pub mod applicator;
mod apply_presence;
mod apply_territory;
mod apply_upkeep;

use bevy_ecs::message::Message;

use crate::economy::ClaimRequest;
use crate::model::{AnchorId, CellCoord, GroupId, OccupantId};
use crate::presence::PresenceChange;

pub use applicator::apply_territory_commands;

/// A command describing an intended territory change.
///
/// Systems emit these via `MessageWriter<TerritoryCommand>`. The applicator
/// in `TickPhase::PostUpdate` is the only code that mutates the territory:
/// it applies each command, records audit entries in `EventLog` and emits
/// `TerritoryNotice` messages.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct TerritoryCommand {
    pub kind: TerritoryCommandKind,
    /// The occupant action this command answers, if any. The applicator
    /// reports the outcome to `ActionResults`.
    pub action: Option<ActionRef>,
}

/// Identifies the action a command was issued for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionRef {
    pub id: u64,
    pub actor: OccupantId,
}

impl TerritoryCommand {
    pub fn new(kind: TerritoryCommandKind) -> Self {
        Self { kind, action: None }
    }

    pub fn for_action(mut self, id: u64, actor: OccupantId) -> Self {
        self.action = Some(ActionRef { id, actor });
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TerritoryCommandKind {
    // -- Claims --
    Claim(ClaimRequest),
    SetHeadquarters {
        cell: CellCoord,
        group: GroupId,
    },
    Release {
        cell: CellCoord,
        group: GroupId,
    },
    AddToTown {
        cell: CellCoord,
        group: GroupId,
    },
    Rename {
        cell: CellCoord,
        group: GroupId,
        name: Option<String>,
    },

    // -- Administration --
    AddBadlands {
        cell: CellCoord,
    },
    RemoveBadlands {
        cell: CellCoord,
    },
    AnchorDestroyed {
        anchor: AnchorId,
    },
    DissolveGroup {
        group: GroupId,
    },

    // -- Periodic --
    CollectUpkeep,
    Presence(PresenceChange),
}
