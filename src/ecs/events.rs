use bevy_ecs::message::Message;

use crate::model::{CellCoord, GroupId, OccupantId};
use crate::territory::TerritoryChange;

/// Notices emitted by the command applicator after state is applied.
///
/// Each variant carries the `event_id` of the `EventLog` entry it mirrors.
/// Systems in `TickPhase::Reactions` read these to follow up on changes.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum TerritoryNotice {
    Changed {
        event_id: u64,
        change: TerritoryChange,
    },
    UpkeepPaid {
        event_id: u64,
        group: GroupId,
        amount: u64,
    },
    UpkeepMissed {
        event_id: u64,
        group: GroupId,
        owed: u64,
        overdue_secs: u64,
    },
    Entered {
        event_id: u64,
        occupant: OccupantId,
        cell: CellCoord,
    },
    Left {
        event_id: u64,
        occupant: OccupantId,
        cell: CellCoord,
    },
}

impl TerritoryNotice {
    pub fn event_id(&self) -> u64 {
        match self {
            TerritoryNotice::Changed { event_id, .. }
            | TerritoryNotice::UpkeepPaid { event_id, .. }
            | TerritoryNotice::UpkeepMissed { event_id, .. }
            | TerritoryNotice::Entered { event_id, .. }
            | TerritoryNotice::Left { event_id, .. } => *event_id,
        }
    }
}
