use thiserror::Error;

use crate::model::{AnchorId, CellType, GroupId, OccupantId};

/// Failure to resolve a cell identifier against the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("malformed cell id {0:?}")]
    MalformedId(String),
    #[error("cell {id} is outside the {rows}x{cols} grid")]
    OutOfBounds { id: String, rows: usize, cols: usize },
}

/// Reason a claim-type operation was rejected. Rejection never mutates state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("unknown {0}")]
    UnknownGroup(GroupId),
    #[error("{0} does not belong to a group")]
    NoGroup(OccupantId),
    #[error("{group} has {members} members, {required} required to hold land")]
    GroupTooSmall {
        group: GroupId,
        members: u32,
        required: u32,
    },
    #[error("{occupant} is not a leader of {group}")]
    NotLeader { occupant: OccupantId, group: GroupId },
    #[error("cell {cell} is {kind} and cannot be claimed")]
    NotClaimable { cell: String, kind: CellType },
    #[error("cell {cell} is held by {owner} through a different anchor")]
    OwnedByOther { cell: String, owner: GroupId },
    #[error("cell {cell} is already held by {group} through {anchor}")]
    AlreadyOwned {
        cell: String,
        group: GroupId,
        anchor: AnchorId,
    },
    #[error("{anchor} already anchors cell {cell}")]
    AnchorInUse { anchor: AnchorId, cell: String },
    #[error("{0} is destroyed")]
    AnchorDestroyed(AnchorId),
    #[error("cell {cell} does not touch land held by {group}")]
    NotContiguous { cell: String, group: GroupId },
    #[error("claim costs {cost} and {payer} cannot pay it")]
    InsufficientResources { cost: u32, payer: OccupantId },
    #[error("cell {cell} is not held by {group}")]
    NotOwner { cell: String, group: GroupId },
    #[error("cell {cell} is {kind}, expected {expected}")]
    WrongKind {
        cell: String,
        kind: CellType,
        expected: &'static str,
    },
}

/// Persisted records that violate a territory invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("duplicate record for cell {0}")]
    DuplicateCell(String),
    #[error("cell {cell} of type {kind} cannot carry owner {owner:?}")]
    OwnerMismatch {
        cell: String,
        kind: CellType,
        owner: Option<GroupId>,
    },
    #[error("{group} has two headquarters: {first} and {second}")]
    DuplicateHeadquarters {
        group: GroupId,
        first: String,
        second: String,
    },
    #[error("{anchor} anchors both {first} and {second}")]
    DuplicateAnchor {
        anchor: AnchorId,
        first: String,
        second: String,
    },
    #[error("cell {cell} of type {kind} cannot carry {anchor}")]
    UnexpectedAnchor {
        cell: String,
        kind: CellType,
        anchor: AnchorId,
    },
    #[error("cell {cell} of type {kind} cannot carry claimant {claimant}")]
    UnexpectedClaimant {
        cell: String,
        kind: CellType,
        claimant: OccupantId,
    },
}

/// Failure reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Restore(#[from] RestoreError),
}

/// Failure loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
