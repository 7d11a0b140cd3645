use serde::{Deserialize, Serialize};

use super::cell::{CellType, TerritoryCell};
use super::ids::{AnchorId, GroupId, OccupantId};

/// Persisted shape of one cell. Derived values such as depth are never
/// stored; they are recomputed on rehydration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: CellType,
    pub owner_group_id: Option<GroupId>,
    pub claimant_id: Option<OccupantId>,
    pub anchor_id: Option<AnchorId>,
}

impl From<&TerritoryCell> for CellRecord {
    fn from(cell: &TerritoryCell) -> Self {
        Self {
            id: cell.id.clone(),
            name: cell.name.clone(),
            kind: cell.kind,
            owner_group_id: cell.owner,
            claimant_id: cell.claimant,
            anchor_id: cell.anchor,
        }
    }
}

/// Persisted upkeep state of one group. Times are server seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub group_id: GroupId,
    pub next_due: u64,
    pub past_due: bool,
}
