use crate::ecs::events::TerritoryNotice;
use crate::ecs::resources::EventDraft;
use crate::model::{CellCoord, EventKind};
use crate::presence::PresenceChange;

use super::applicator::ApplyCtx;

/// Log a border crossing. Exits are recorded before entries.
pub(crate) fn apply_presence(ctx: &mut ApplyCtx, change: PresenceChange) -> u64 {
    let occupant = change.occupant;
    let mut last = 0;

    if let Some(cell) = change.left {
        let draft = draft(ctx, EventKind::Left, cell, "left").occupant(occupant);
        last = ctx.record(draft);
        ctx.emit(TerritoryNotice::Left {
            event_id: last,
            occupant,
            cell,
        });
    }
    if let Some(cell) = change.entered {
        let draft = draft(ctx, EventKind::Entered, cell, "entered").occupant(occupant);
        last = ctx.record(draft);
        ctx.emit(TerritoryNotice::Entered {
            event_id: last,
            occupant,
            cell,
        });
    }
    last
}

fn draft(ctx: &ApplyCtx, kind: EventKind, coord: CellCoord, verb: &str) -> EventDraft {
    let id = ctx.territory.grid().cell_id(coord);
    let Some(cell) = ctx.territory.get_at(coord) else {
        return EventDraft::new(kind, format!("{verb} {id}")).cell(id);
    };
    let place = match (&cell.name, cell.owner) {
        (Some(name), _) => format!("{name} ({id})"),
        (None, Some(owner)) => format!("{id}, held by {}", ctx.group_name(owner)),
        (None, None) => format!("{id} ({})", cell.kind),
    };
    let draft = EventDraft::new(kind, format!("{verb} {place}")).cell(id);
    match cell.owner {
        Some(owner) => draft.group(owner),
        None => draft,
    }
}
