//! Anchor polling: cells whose anchor structure was destroyed revert to
//! wilderness on the next poll.

use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageWriter;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::Res;

use crate::collab::{AnchorRegistry, AnchorStatus};
use crate::ecs::commands::{TerritoryCommand, TerritoryCommandKind};
use crate::ecs::conditions::anchor_poll_due;
use crate::ecs::schedule::{ServerTick, TickPhase};
use crate::territory::TerritoryManager;

pub struct AnchorsPlugin;

impl Plugin for AnchorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            ServerTick,
            poll_anchors.run_if(anchor_poll_due).in_set(TickPhase::Update),
        );
    }
}

fn poll_anchors(
    territory: Res<TerritoryManager>,
    anchors: Res<AnchorRegistry>,
    mut commands: MessageWriter<TerritoryCommand>,
) {
    for anchor in territory.cells().filter_map(|cell| cell.anchor) {
        if anchors.is_destroyed(anchor) {
            commands.write(TerritoryCommand::new(
                TerritoryCommandKind::AnchorDestroyed { anchor },
            ));
        }
    }
}
