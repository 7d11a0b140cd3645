#[macro_use]
mod macros;

pub mod action;
pub mod cell;
pub mod damage;
pub mod event;
pub mod grid;
pub mod ids;
pub mod record;
pub mod table;
pub mod timestamp;

pub use action::{Action, ActionKind, ActionOutcome, ActionResult};
pub use cell::{CellType, TerritoryCell};
pub use damage::{BuildingGrade, DamageInfo, DamageType, Structure, StructureCategory};
pub use event::{Event, EventKind};
pub use grid::{CellCoord, GridIndex, WorldPos};
pub use ids::{AnchorId, GroupId, OccupantId};
pub use record::{CellRecord, LedgerRecord};
pub use table::ClampedTable;
pub use timestamp::ServerTime;
