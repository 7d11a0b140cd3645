pub mod collab;
pub mod combat;
pub mod config;
pub mod ecs;
pub mod economy;
pub mod error;
pub mod flush;
pub mod model;
pub mod presence;
pub mod territory;

pub use config::TerritoryConfig;
pub use error::{ClaimError, ConfigError, GridError, PersistError, RestoreError};
pub use model::{
    AnchorId, CellCoord, CellType, DamageInfo, Event, EventKind, GridIndex, GroupId, OccupantId,
    ServerTime, TerritoryCell, WorldPos,
};
pub use territory::{TerritoryChange, TerritoryManager, TerritoryObserver, UnclaimReason};
