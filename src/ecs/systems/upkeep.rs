//! Periodic upkeep collection and ledger enrollment.

use bevy_app::{App, Plugin};
use bevy_ecs::message::{MessageReader, MessageWriter};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::config::TerritoryConfig;
use crate::ecs::clock::ServerClock;
use crate::ecs::commands::{TerritoryCommand, TerritoryCommandKind};
use crate::ecs::conditions::upkeep_due;
use crate::ecs::events::TerritoryNotice;
use crate::ecs::schedule::{ServerTick, TickPhase};
use crate::economy::UpkeepLedger;
use crate::territory::TerritoryChange;

pub struct UpkeepPlugin;

impl Plugin for UpkeepPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            ServerTick,
            schedule_upkeep.run_if(upkeep_due).in_set(TickPhase::Update),
        );
        app.add_systems(ServerTick, enroll_landholders.in_set(TickPhase::Reactions));
    }
}

fn schedule_upkeep(mut commands: MessageWriter<TerritoryCommand>) {
    commands.write(TerritoryCommand::new(TerritoryCommandKind::CollectUpkeep));
}

/// Start the upkeep clock for groups that just gained land.
fn enroll_landholders(
    mut notices: MessageReader<TerritoryNotice>,
    mut ledger: ResMut<UpkeepLedger>,
    clock: Res<ServerClock>,
    config: Res<TerritoryConfig>,
) {
    for notice in notices.read() {
        let TerritoryNotice::Changed { change, .. } = notice else {
            continue;
        };
        let group = match change {
            TerritoryChange::Claimed { group, .. } | TerritoryChange::TownFounded { group, .. } => {
                *group
            }
            TerritoryChange::Captured { to, .. } => *to,
            _ => continue,
        };
        if ledger.enroll(group, clock.time, config.upkeep.period_secs) {
            tracing::debug!("{group} enrolled for upkeep");
        }
    }
}
