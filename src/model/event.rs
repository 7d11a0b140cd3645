use serde::{Deserialize, Serialize};

use super::ids::{GroupId, OccupantId};
use super::timestamp::ServerTime;

/// What happened, as recorded in the audit log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventKind {
    Claimed,
    Captured,
    AnchorMoved,
    HeadquartersMoved,
    Unclaimed,
    Forfeited,
    BadlandsAdded,
    BadlandsRemoved,
    TownFounded,
    Renamed,
    UpkeepPaid,
    UpkeepMissed,
    Entered,
    Left,
}

string_enum!(EventKind {
    Claimed => "claimed",
    Captured => "captured",
    AnchorMoved => "anchor_moved",
    HeadquartersMoved => "headquarters_moved",
    Unclaimed => "unclaimed",
    Forfeited => "forfeited",
    BadlandsAdded => "badlands_added",
    BadlandsRemoved => "badlands_removed",
    TownFounded => "town_founded",
    Renamed => "renamed",
    UpkeepPaid => "upkeep_paid",
    UpkeepMissed => "upkeep_missed",
    Entered => "entered",
    Left => "left",
});

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub kind: EventKind,
    pub timestamp: ServerTime,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant: Option<OccupantId>,
}
