use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use crate::model::ServerTime;

/// Server clock resource tracking the current time and tick count.
///
/// Advances by one second per tick. The `advance_clock` system moves the
/// clock forward at the end of each tick (in `TickPhase::Last`), so systems
/// see the current time before it advances.
#[derive(Resource, Debug, Default)]
pub struct ServerClock {
    pub time: ServerTime,
    pub tick_count: u64,
}

impl ServerClock {
    pub fn new(start: ServerTime) -> Self {
        Self {
            time: start,
            tick_count: 0,
        }
    }

    /// Advance the clock by one second.
    pub fn advance(&mut self) {
        self.time = self.time + 1;
        self.tick_count += 1;
    }
}

/// Registered in `TickPhase::Last`.
pub fn advance_clock(mut clock: ResMut<ServerClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp::{SECONDS_PER_DAY, SECONDS_PER_HOUR};

    #[test]
    fn new_clock_starts_at_given_time() {
        let clock = ServerClock::new(ServerTime::from_minutes(5));
        assert_eq!(clock.time.as_secs(), 300);
        assert_eq!(clock.tick_count, 0);
    }

    #[test]
    fn advance_increments_second() {
        let mut clock = ServerClock::default();
        clock.advance();
        assert_eq!(clock.time.second(), 1);
        assert_eq!(clock.tick_count, 1);
    }

    #[test]
    fn advance_rolls_over_hour_and_day() {
        let mut clock = ServerClock::default();
        for _ in 0..SECONDS_PER_HOUR {
            clock.advance();
        }
        assert_eq!(clock.time.hour(), 1);
        assert_eq!(clock.time.minute(), 0);

        let mut clock = ServerClock::new(ServerTime::from_secs(SECONDS_PER_DAY - 1));
        clock.advance();
        assert_eq!(clock.time.day(), 1);
        assert_eq!(clock.time.hour(), 0);
    }
}
