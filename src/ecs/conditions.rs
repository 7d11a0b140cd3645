use bevy_ecs::system::Res;

use super::clock::ServerClock;
use crate::config::TerritoryConfig;
use crate::model::ServerTime;

// Internal check functions for testability.

fn upkeep_check(time: ServerTime, config: &TerritoryConfig) -> bool {
    config.upkeep.enabled && time.is_multiple_of(config.upkeep.period_secs)
}

fn anchor_poll_check(time: ServerTime, config: &TerritoryConfig) -> bool {
    time.is_multiple_of(config.anchors.poll_interval_secs)
}

// Bevy run condition functions (for use with `.run_if()`).

pub fn upkeep_due(clock: Res<ServerClock>, config: Res<TerritoryConfig>) -> bool {
    upkeep_check(clock.time, &config)
}

pub fn anchor_poll_due(clock: Res<ServerClock>, config: Res<TerritoryConfig>) -> bool {
    anchor_poll_check(clock.time, &config)
}
