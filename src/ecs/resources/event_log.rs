use bevy_ecs::resource::Resource;

use crate::model::{Event, EventKind, GroupId, OccupantId, ServerTime};

/// Accumulates audit events between flushes. Ids keep increasing across
/// flushes.
#[derive(Resource, Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<Event>,
    next_id: u64,
}

/// Fields of an event that is about to be recorded.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub kind: EventKind,
    pub description: String,
    pub cell: Option<String>,
    pub group: Option<GroupId>,
    pub occupant: Option<OccupantId>,
}

impl EventDraft {
    pub fn new(kind: EventKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            cell: None,
            group: None,
            occupant: None,
        }
    }

    pub fn cell(mut self, id: impl Into<String>) -> Self {
        self.cell = Some(id.into());
        self
    }

    pub fn group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn occupant(mut self, occupant: OccupantId) -> Self {
        self.occupant = Some(occupant);
        self
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event stamped with `timestamp`, returning its id.
    pub fn record(&mut self, timestamp: ServerTime, draft: EventDraft) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.events.push(Event {
            id,
            kind: draft.kind,
            timestamp,
            description: draft.description,
            cell: draft.cell,
            group: draft.group,
            occupant: draft.occupant,
        });
        id
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Hand over buffered events, keeping the id sequence.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
