use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for one server second.
/// Run manually each tick via `app.world_mut().run_schedule(ServerTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerTick;

/// Ordered phases within each tick.
///
/// Phases run in declaration order: PreUpdate < Update < PostUpdate < Reactions < Last.
/// Systems in `Update` only read territory and emit commands; the applicator
/// in `PostUpdate` is the single writer; `Reactions` sees the applied state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickPhase {
    PreUpdate,
    Update,
    PostUpdate,
    Reactions,
    Last,
}

pub fn configure_tick_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(ServerTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            TickPhase::PreUpdate,
            TickPhase::Update,
            TickPhase::PostUpdate,
            TickPhase::Reactions,
            TickPhase::Last,
        )
            .chain(),
    );
    schedule.add_systems(advance_clock.in_set(TickPhase::Last));
    schedule
}
