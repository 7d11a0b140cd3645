pub mod event_log;

use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use crate::model::{Action, ActionResult, OccupantId, WorldPos};

pub use event_log::{EventDraft, EventLog};

/// Actions queued by the host, drained by the actions system every tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingActions(pub Vec<Action>);

/// Results from processed actions.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionResults(pub Vec<ActionResult>);

/// Latest known position of every connected occupant. The host overwrites
/// entries as occupants move and removes them on disconnect or death.
#[derive(Resource, Debug, Clone, Default)]
pub struct OccupantPositions(pub BTreeMap<OccupantId, WorldPos>);

impl OccupantPositions {
    pub fn set(&mut self, occupant: OccupantId, position: WorldPos) {
        self.0.insert(occupant, position);
    }

    pub fn remove(&mut self, occupant: OccupantId) -> Option<WorldPos> {
        self.0.remove(&occupant)
    }
}
