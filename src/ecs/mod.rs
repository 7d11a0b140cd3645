//! Headless Bevy runtime hosting the territory: one-second ticks, periodic
//! jobs as run conditions, and a single command applicator that owns every
//! territory mutation.

pub mod app;
pub mod clock;
pub mod commands;
pub mod conditions;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod schedule;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{authorize_damage, build_territory_app, build_territory_app_with_manager};
pub use clock::ServerClock;
pub use commands::{TerritoryCommand, TerritoryCommandKind};
pub use conditions::{anchor_poll_due, upkeep_due};
pub use events::TerritoryNotice;
pub use plugin::TerritoryPlugin;
pub use resources::{ActionResults, EventLog, OccupantPositions, PendingActions};
pub use schedule::{ServerTick, TickPhase, configure_tick_schedule};
