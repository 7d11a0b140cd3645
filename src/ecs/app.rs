use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};
use bevy_ecs::world::World;

use super::clock::ServerClock;
use super::commands::{TerritoryCommand, apply_territory_commands};
use super::events::TerritoryNotice;
use super::resources::{ActionResults, EventLog, OccupantPositions, PendingActions};
use super::schedule::{TickPhase, configure_tick_schedule};
use crate::collab::{AnchorRegistry, GroupRoster, StackVault, WarTable};
use crate::combat::{CombatAuthorizer, Combatant, Decision, Target};
use crate::config::TerritoryConfig;
use crate::economy::UpkeepLedger;
use crate::model::DamageInfo;
use crate::presence::PresenceTracker;
use crate::territory::TerritoryManager;

/// Build a headless app with an empty territory sized by `config.grid`.
///
/// Manual tick control:
/// ```no_run
/// # use territory_core::config::TerritoryConfig;
/// # use territory_core::ecs::{build_territory_app, ServerTick, TerritoryPlugin};
/// let mut app = build_territory_app(TerritoryConfig::default());
/// app.add_plugins(TerritoryPlugin);
/// for _ in 0..3_600 {  // one hour of one-second ticks
///     app.world_mut().run_schedule(ServerTick);
/// }
/// ```
pub fn build_territory_app(config: TerritoryConfig) -> App {
    let territory = TerritoryManager::new(config.grid.build());
    build_territory_app_with_manager(config, territory, UpkeepLedger::new())
}

/// Build a headless app around restored state.
pub fn build_territory_app_with_manager(
    config: TerritoryConfig,
    territory: TerritoryManager,
    ledger: UpkeepLedger,
) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(ServerClock::default());
    app.insert_resource(territory);
    app.insert_resource(ledger);
    app.insert_resource(config);
    app.insert_resource(EventLog::new());
    app.insert_resource(PendingActions::default());
    app.insert_resource(ActionResults::default());
    app.insert_resource(PresenceTracker::new());
    app.insert_resource(OccupantPositions::default());

    // Collaborators
    app.insert_resource(GroupRoster::new());
    app.insert_resource(WarTable::new());
    app.insert_resource(AnchorRegistry::new());
    app.insert_resource(StackVault::new());

    // Register message types
    MessageRegistry::register_message::<TerritoryCommand>(app.world_mut());
    MessageRegistry::register_message::<TerritoryNotice>(app.world_mut());

    // Single-threaded: one writer, deterministic order
    let mut schedule = configure_tick_schedule(ExecutorKind::SingleThreaded);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(TickPhase::PreUpdate));
    schedule.add_systems(apply_territory_commands.in_set(TickPhase::PostUpdate));
    app.add_schedule(schedule);
    app
}

/// Decide how much of `damage` may land, reading the territory, war table
/// and config straight from the world. `None` if any of them is missing.
pub fn authorize_damage(
    world: &World,
    attacker: Option<&Combatant>,
    target: &Target,
    damage: &DamageInfo,
) -> Option<Decision> {
    let territory = world.get_resource::<TerritoryManager>()?;
    let wars = world.get_resource::<WarTable>()?;
    let config = world.get_resource::<TerritoryConfig>()?;
    Some(CombatAuthorizer::new(territory, wars, config).authorize(attacker, target, damage))
}
