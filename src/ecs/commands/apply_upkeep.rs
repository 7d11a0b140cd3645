use crate::ecs::events::TerritoryNotice;
use crate::ecs::resources::EventDraft;
use crate::economy::{UpkeepOutcome, collect_upkeep};
use crate::model::EventKind;

use super::applicator::ApplyCtx;

/// Bill every due group. Returns the id of the last event recorded.
pub(crate) fn apply_collect_upkeep(ctx: &mut ApplyCtx) -> u64 {
    let outcomes = collect_upkeep(
        ctx.clock_time,
        &mut ctx.territory,
        &mut ctx.ledger,
        &mut ctx.vault,
        &ctx.config.upkeep,
    );

    let mut last = 0;
    for outcome in outcomes {
        last = match outcome {
            UpkeepOutcome::Paid { group, amount, .. } => {
                let draft = EventDraft::new(
                    EventKind::UpkeepPaid,
                    format!("{} paid {amount} upkeep", ctx.group_name(group)),
                )
                .group(group);
                let event_id = ctx.record(draft);
                ctx.emit(TerritoryNotice::UpkeepPaid {
                    event_id,
                    group,
                    amount,
                });
                event_id
            }
            UpkeepOutcome::Delinquent {
                group,
                owed,
                overdue_secs,
            } => {
                let draft = EventDraft::new(
                    EventKind::UpkeepMissed,
                    format!(
                        "{} could not pay {owed} upkeep, {overdue_secs}s overdue",
                        ctx.group_name(group)
                    ),
                )
                .group(group);
                let event_id = ctx.record(draft);
                ctx.emit(TerritoryNotice::UpkeepMissed {
                    event_id,
                    group,
                    owed,
                    overdue_secs,
                });
                event_id
            }
            UpkeepOutcome::Forfeited { change, .. } => ctx.record_change(change),
        };
    }
    last
}
