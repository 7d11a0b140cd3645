use serde::{Deserialize, Serialize};

use super::grid::CellCoord;
use super::ids::{AnchorId, GroupId, OccupantId};

/// Territory type of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CellType {
    #[default]
    Wilderness,
    Claimed,
    Headquarters,
    Town,
    Badlands,
}

string_enum!(CellType {
    Wilderness => "wilderness",
    Claimed => "claimed",
    Headquarters => "headquarters",
    Town => "town",
    Badlands => "badlands",
});

impl CellType {
    pub const ALL: [CellType; 5] = [
        CellType::Wilderness,
        CellType::Claimed,
        CellType::Headquarters,
        CellType::Town,
        CellType::Badlands,
    ];

    /// Only wilderness can be claimed from scratch.
    pub fn is_claimable(self) -> bool {
        matches!(self, CellType::Wilderness)
    }

    /// Types that must carry an owning group (and only these).
    pub fn is_owned_kind(self) -> bool {
        matches!(
            self,
            CellType::Claimed | CellType::Headquarters | CellType::Town
        )
    }

    /// Types that count toward a group's upkeep bill.
    pub fn is_taxable(self) -> bool {
        self.is_owned_kind()
    }

    /// Inherently PVP-enabled land.
    pub fn is_dangerous(self) -> bool {
        matches!(self, CellType::Badlands)
    }

    /// Whether protected structures standing here are shielded from damage
    /// outside of war.
    pub fn defends_structures(self) -> bool {
        self.is_owned_kind()
    }

    /// Types an anchor structure can represent.
    pub fn is_anchored(self) -> bool {
        matches!(self, CellType::Claimed | CellType::Headquarters)
    }
}

/// Mutable state of one grid cell. Only the territory manager writes these.
#[derive(Clone, Debug, PartialEq)]
pub struct TerritoryCell {
    pub id: String,
    pub coord: CellCoord,
    pub kind: CellType,
    pub owner: Option<GroupId>,
    pub claimant: Option<OccupantId>,
    pub name: Option<String>,
    pub anchor: Option<AnchorId>,
}

impl TerritoryCell {
    pub fn wilderness(id: String, coord: CellCoord) -> Self {
        Self {
            id,
            coord,
            kind: CellType::Wilderness,
            owner: None,
            claimant: None,
            name: None,
            anchor: None,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_owned_by(&self, group: GroupId) -> bool {
        self.owner == Some(group)
    }

    /// Reset to wilderness, keeping identity.
    pub(crate) fn clear(&mut self) {
        self.kind = CellType::Wilderness;
        self.owner = None;
        self.claimant = None;
        self.name = None;
        self.anchor = None;
    }

    /// The display name, falling back to the cell id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
