//! Territory manager: sole owner and mutator of every grid cell.

mod depth;
mod manager;

use serde::{Deserialize, Serialize};

use crate::model::{AnchorId, CellCoord, CellType, GroupId, OccupantId};

pub use depth::scan_depth;
pub use manager::{AnchorPlan, TerritoryManager};

/// Why a cell returned to wilderness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclaimReason {
    /// The owning group released it.
    Released,
    AnchorDestroyed,
    GroupDissolved,
    UpkeepForfeit,
}

/// A completed mutation. Observers receive these after the state they
/// describe is fully applied.
#[derive(Clone, Debug, PartialEq)]
pub enum TerritoryChange {
    Claimed {
        cell: CellCoord,
        group: GroupId,
        claimant: OccupantId,
        anchor: AnchorId,
        kind: CellType,
    },
    Captured {
        cell: CellCoord,
        from: GroupId,
        to: GroupId,
        claimant: OccupantId,
        kind: CellType,
    },
    AnchorMoved {
        cell: CellCoord,
        group: GroupId,
        from: Option<AnchorId>,
        to: AnchorId,
    },
    HeadquartersMoved {
        cell: CellCoord,
        group: GroupId,
        previous: Option<CellCoord>,
    },
    Unclaimed {
        cell: CellCoord,
        group: GroupId,
        previous: CellType,
        reason: UnclaimReason,
    },
    BadlandsAdded {
        cell: CellCoord,
    },
    BadlandsRemoved {
        cell: CellCoord,
    },
    TownFounded {
        cell: CellCoord,
        group: GroupId,
    },
    Renamed {
        cell: CellCoord,
        name: Option<String>,
    },
}

impl TerritoryChange {
    pub fn cell(&self) -> CellCoord {
        match self {
            TerritoryChange::Claimed { cell, .. }
            | TerritoryChange::Captured { cell, .. }
            | TerritoryChange::AnchorMoved { cell, .. }
            | TerritoryChange::HeadquartersMoved { cell, .. }
            | TerritoryChange::Unclaimed { cell, .. }
            | TerritoryChange::BadlandsAdded { cell }
            | TerritoryChange::BadlandsRemoved { cell }
            | TerritoryChange::TownFounded { cell, .. }
            | TerritoryChange::Renamed { cell, .. } => *cell,
        }
    }

    /// The group that holds the cell after the change, if any.
    pub fn group(&self) -> Option<GroupId> {
        match self {
            TerritoryChange::Claimed { group, .. }
            | TerritoryChange::AnchorMoved { group, .. }
            | TerritoryChange::HeadquartersMoved { group, .. }
            | TerritoryChange::Unclaimed { group, .. }
            | TerritoryChange::TownFounded { group, .. } => Some(*group),
            TerritoryChange::Captured { to, .. } => Some(*to),
            TerritoryChange::BadlandsAdded { .. }
            | TerritoryChange::BadlandsRemoved { .. }
            | TerritoryChange::Renamed { .. } => None,
        }
    }

    /// Whether the owning group of the cell changed.
    pub fn changes_ownership(&self) -> bool {
        matches!(
            self,
            TerritoryChange::Claimed { .. }
                | TerritoryChange::Captured { .. }
                | TerritoryChange::Unclaimed { .. }
                | TerritoryChange::TownFounded { .. }
        )
    }
}

/// Synchronous listener for territory mutations.
pub trait TerritoryObserver: Send + Sync {
    fn on_change(&mut self, change: &TerritoryChange, territory: &TerritoryManager);
}

impl<F> TerritoryObserver for F
where
    F: FnMut(&TerritoryChange, &TerritoryManager) + Send + Sync,
{
    fn on_change(&mut self, change: &TerritoryChange, territory: &TerritoryManager) {
        self(change, territory)
    }
}
