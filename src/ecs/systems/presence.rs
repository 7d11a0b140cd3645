//! Presence polling: diff occupant positions against the last known cell
//! each tick and hand border crossings to the applicator for logging.

use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageWriter;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::commands::{TerritoryCommand, TerritoryCommandKind};
use crate::ecs::resources::OccupantPositions;
use crate::ecs::schedule::{ServerTick, TickPhase};
use crate::presence::PresenceTracker;
use crate::territory::TerritoryManager;

pub struct PresencePlugin;

impl Plugin for PresencePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(ServerTick, track_presence.in_set(TickPhase::Update));
    }
}

fn track_presence(
    positions: Res<OccupantPositions>,
    territory: Res<TerritoryManager>,
    mut tracker: ResMut<PresenceTracker>,
    mut commands: MessageWriter<TerritoryCommand>,
) {
    for (occupant, position) in &positions.0 {
        if let Some(change) = tracker.observe(territory.grid(), *occupant, *position) {
            commands.write(TerritoryCommand::new(TerritoryCommandKind::Presence(change)));
        }
    }

    // Occupants no longer reported have disconnected or died
    for occupant in tracker.tracked() {
        if positions.0.contains_key(&occupant) {
            continue;
        }
        if let Some(change) = tracker.forget(occupant) {
            commands.write(TerritoryCommand::new(TerritoryCommandKind::Presence(change)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerritoryConfig;
    use crate::ecs::app::build_territory_app;
    use crate::ecs::events::TerritoryNotice;
    use crate::ecs::resources::EventLog;
    use crate::ecs::test_helpers::{drain_notices, tick};
    use crate::model::{CellCoord, EventKind, OccupantId, WorldPos};

    const ALICE: OccupantId = OccupantId(10);

    #[test]
    fn crossing_a_border_logs_exit_then_entry() {
        let mut app = build_territory_app(TerritoryConfig::default());
        app.add_plugins(PresencePlugin);

        app.world_mut()
            .resource_mut::<OccupantPositions>()
            .set(ALICE, WorldPos::new(10.0, 10.0));
        tick(&mut app);
        // Small moves inside A0 are silent
        app.world_mut()
            .resource_mut::<OccupantPositions>()
            .set(ALICE, WorldPos::new(20.0, 20.0));
        tick(&mut app);
        app.world_mut()
            .resource_mut::<OccupantPositions>()
            .set(ALICE, WorldPos::new(160.0, 10.0));
        tick(&mut app);

        let log = app.world().resource::<EventLog>();
        let kinds: Vec<EventKind> = log.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Entered, EventKind::Left, EventKind::Entered]);
        assert_eq!(log.events[2].cell.as_deref(), Some("B0"));
        assert_eq!(log.events[2].occupant, Some(ALICE));
    }

    #[test]
    fn vanished_occupant_leaves() {
        let mut app = build_territory_app(TerritoryConfig::default());
        app.add_plugins(PresencePlugin);
        app.world_mut()
            .resource_mut::<OccupantPositions>()
            .set(ALICE, WorldPos::new(10.0, 10.0));
        tick(&mut app);
        drain_notices(app.world_mut());

        app.world_mut().resource_mut::<OccupantPositions>().remove(ALICE);
        tick(&mut app);

        let notices = drain_notices(app.world_mut());
        assert_eq!(
            notices,
            vec![TerritoryNotice::Left {
                event_id: 2,
                occupant: ALICE,
                cell: CellCoord::new(0, 0),
            }]
        );
        assert!(app.world().resource::<PresenceTracker>().tracked().is_empty());
    }
}
