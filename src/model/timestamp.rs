use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const MINUTES_PER_HOUR: u64 = 60;
pub const HOURS_PER_DAY: u64 = 24;

pub const SECONDS_PER_HOUR: u64 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR; // 3,600
pub const SECONDS_PER_DAY: u64 = SECONDS_PER_HOUR * HOURS_PER_DAY; // 86,400

/// Server time as whole seconds since the world started.
///
/// A plain `u64` wrapper. Natural ordering equals chronological ordering.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ServerTime(u64);

impl ServerTime {
    pub const ZERO: ServerTime = ServerTime(0);

    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self(minutes * SECONDS_PER_MINUTE)
    }

    pub fn as_secs(self) -> u64 {
        self.0
    }

    /// True when this instant falls on a multiple of `period` seconds.
    /// A zero period never fires.
    pub fn is_multiple_of(self, period: u64) -> bool {
        period != 0 && self.0.is_multiple_of(period)
    }

    /// Seconds elapsed since `earlier` (saturating).
    pub fn secs_since(self, earlier: ServerTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn day(self) -> u64 {
        self.0 / SECONDS_PER_DAY
    }

    pub fn hour(self) -> u64 {
        (self.0 % SECONDS_PER_DAY) / SECONDS_PER_HOUR
    }

    pub fn minute(self) -> u64 {
        (self.0 % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    pub fn second(self) -> u64 {
        self.0 % SECONDS_PER_MINUTE
    }
}

impl Add<u64> for ServerTime {
    type Output = ServerTime;

    fn add(self, secs: u64) -> ServerTime {
        ServerTime(self.0.saturating_add(secs))
    }
}

impl fmt::Display for ServerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "D{} {:02}:{:02}:{:02}",
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}
