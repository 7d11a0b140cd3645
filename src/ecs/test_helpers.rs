use bevy_app::App;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::collab::GroupRoster;
use crate::ecs::commands::TerritoryCommand;
use crate::ecs::events::TerritoryNotice;
use crate::ecs::schedule::ServerTick;
use crate::model::{GroupId, OccupantId};

/// Run one one-second tick.
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(ServerTick);
}

pub fn tick_n(app: &mut App, n: u64) {
    for _ in 0..n {
        app.world_mut().run_schedule(ServerTick);
    }
}

pub fn write_command(world: &mut World, cmd: TerritoryCommand) {
    world.resource_mut::<Messages<TerritoryCommand>>().write(cmd);
}

/// Take every notice still buffered.
pub fn drain_notices(world: &mut World) -> Vec<TerritoryNotice> {
    world
        .resource_mut::<Messages<TerritoryNotice>>()
        .drain()
        .collect()
}

/// Register a group led by `leader`, padded with generated members up to
/// `members`.
pub fn seed_group(world: &mut World, group: GroupId, name: &str, leader: OccupantId, members: u32) {
    let mut roster = world.resource_mut::<GroupRoster>();
    roster.create(group, name, leader);
    for i in 1..u64::from(members) {
        roster.add_member(group, OccupantId(group.0 * 1_000 + i));
    }
}
