use crate::economy::{ClaimRequest, process_claim};
use crate::error::ClaimError;
use crate::model::{AnchorId, GroupId};
use crate::territory::{TerritoryChange, UnclaimReason};

use super::applicator::ApplyCtx;

pub(crate) fn apply_claim(ctx: &mut ApplyCtx, request: &ClaimRequest) -> Result<u64, ClaimError> {
    let receipt = process_claim(
        &mut ctx.territory,
        request,
        &ctx.roster,
        &ctx.anchors,
        &mut ctx.vault,
        &ctx.config.claims,
    )?;
    Ok(ctx.record_change(receipt.change))
}

/// Record the change produced by a direct manager mutation.
pub(crate) fn apply_change(
    ctx: &mut ApplyCtx,
    result: Result<TerritoryChange, ClaimError>,
) -> Result<u64, ClaimError> {
    let change = result?;
    Ok(ctx.record_change(change))
}

pub(crate) fn apply_anchor_destroyed(ctx: &mut ApplyCtx, anchor: AnchorId) -> u64 {
    ctx.anchors.mark_destroyed(anchor);
    match ctx.territory.handle_anchor_destroyed(anchor) {
        Some(change) => ctx.record_change(change),
        None => 0,
    }
}

/// Unclaim all land, end every war and drop the group's upkeep schedule.
pub(crate) fn apply_dissolve_group(ctx: &mut ApplyCtx, group: GroupId) -> u64 {
    let name = ctx.group_name(group);
    let changes = ctx.territory.unclaim_all(group, UnclaimReason::GroupDissolved);
    let mut last = 0;
    for change in changes {
        last = ctx.record_change(change);
    }
    ctx.wars.forget_group(group);
    ctx.ledger.remove(group);
    ctx.roster.dissolve(group);
    tracing::info!("{name} dissolved");
    last
}
