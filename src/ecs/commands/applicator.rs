use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::collab::{AnchorRegistry, GroupRoster, StackVault, WarTable};
use crate::config::TerritoryConfig;
use crate::ecs::clock::ServerClock;
use crate::ecs::events::TerritoryNotice;
use crate::ecs::resources::{ActionResults, EventDraft, EventLog};
use crate::economy::UpkeepLedger;
use crate::error::ClaimError;
use crate::model::{ActionOutcome, ActionResult, EventKind, GroupId, ServerTime};
use crate::territory::{TerritoryChange, TerritoryManager, UnclaimReason};

use super::{ActionRef, TerritoryCommand, TerritoryCommandKind};
use super::{apply_presence, apply_territory, apply_upkeep};

/// Resources the applicator owns while it runs, taken out of the world so
/// the `apply_*` functions can borrow them independently.
pub(crate) struct ApplyCtx {
    pub territory: TerritoryManager,
    pub ledger: UpkeepLedger,
    pub roster: GroupRoster,
    pub wars: WarTable,
    pub anchors: AnchorRegistry,
    pub vault: StackVault,
    pub event_log: EventLog,
    pub results: ActionResults,
    pub config: TerritoryConfig,
    pub clock_time: ServerTime,
    pub notices: Vec<TerritoryNotice>,
}

impl ApplyCtx {
    fn take(world: &mut World) -> Option<Self> {
        let complete = world.contains_resource::<ServerClock>()
            && world.contains_resource::<TerritoryManager>()
            && world.contains_resource::<UpkeepLedger>()
            && world.contains_resource::<GroupRoster>()
            && world.contains_resource::<WarTable>()
            && world.contains_resource::<AnchorRegistry>()
            && world.contains_resource::<StackVault>()
            && world.contains_resource::<EventLog>()
            && world.contains_resource::<ActionResults>()
            && world.contains_resource::<TerritoryConfig>();
        if !complete {
            return None;
        }

        Some(Self {
            clock_time: world.get_resource::<ServerClock>()?.time,
            territory: world.remove_resource()?,
            ledger: world.remove_resource()?,
            roster: world.remove_resource()?,
            wars: world.remove_resource()?,
            anchors: world.remove_resource()?,
            vault: world.remove_resource()?,
            event_log: world.remove_resource()?,
            results: world.remove_resource()?,
            config: world.remove_resource()?,
            notices: Vec::new(),
        })
    }

    fn restore(self, world: &mut World) {
        if let Some(mut messages) = world.get_resource_mut::<Messages<TerritoryNotice>>() {
            messages.write_batch(self.notices);
        }
        world.insert_resource(self.territory);
        world.insert_resource(self.ledger);
        world.insert_resource(self.roster);
        world.insert_resource(self.wars);
        world.insert_resource(self.anchors);
        world.insert_resource(self.vault);
        world.insert_resource(self.event_log);
        world.insert_resource(self.results);
        world.insert_resource(self.config);
    }

    pub(crate) fn group_name(&self, group: GroupId) -> String {
        self.roster
            .name_of(group)
            .map_or_else(|| group.to_string(), str::to_string)
    }

    /// Record an event for a completed change and queue its notice.
    pub(crate) fn record_change(&mut self, change: TerritoryChange) -> u64 {
        let cell = self.territory.grid().cell_id(change.cell());
        let (kind, description) = match &change {
            TerritoryChange::Claimed { group, .. } => (
                EventKind::Claimed,
                format!("{} claimed {cell}", self.group_name(*group)),
            ),
            TerritoryChange::Captured { from, to, .. } => (
                EventKind::Captured,
                format!(
                    "{} captured {cell} from {}",
                    self.group_name(*to),
                    self.group_name(*from)
                ),
            ),
            TerritoryChange::AnchorMoved { group, to, .. } => (
                EventKind::AnchorMoved,
                format!("{} re-anchored {cell} to {to}", self.group_name(*group)),
            ),
            TerritoryChange::HeadquartersMoved { group, .. } => (
                EventKind::HeadquartersMoved,
                format!(
                    "{} moved its headquarters to {cell}",
                    self.group_name(*group)
                ),
            ),
            TerritoryChange::Unclaimed {
                group,
                reason: UnclaimReason::UpkeepForfeit,
                ..
            } => (
                EventKind::Forfeited,
                format!(
                    "{} forfeited {cell} for unpaid upkeep",
                    self.group_name(*group)
                ),
            ),
            TerritoryChange::Unclaimed { group, reason, .. } => (
                EventKind::Unclaimed,
                format!("{} lost {cell} ({reason:?})", self.group_name(*group)),
            ),
            TerritoryChange::BadlandsAdded { .. } => {
                (EventKind::BadlandsAdded, format!("{cell} became badlands"))
            }
            TerritoryChange::BadlandsRemoved { .. } => (
                EventKind::BadlandsRemoved,
                format!("{cell} returned to wilderness"),
            ),
            TerritoryChange::TownFounded { group, .. } => (
                EventKind::TownFounded,
                format!("{} made {cell} part of a town", self.group_name(*group)),
            ),
            TerritoryChange::Renamed { name: Some(name), .. } => {
                (EventKind::Renamed, format!("{cell} renamed to {name}"))
            }
            TerritoryChange::Renamed { name: None, .. } => {
                (EventKind::Renamed, format!("{cell} name cleared"))
            }
        };

        let mut draft = EventDraft::new(kind, description).cell(cell);
        if let Some(group) = change.group() {
            draft = draft.group(group);
        }
        match &change {
            TerritoryChange::Claimed { claimant, .. }
            | TerritoryChange::Captured { claimant, .. } => {
                draft = draft.occupant(*claimant);
            }
            _ => {}
        }

        let event_id = self.event_log.record(self.clock_time, draft);
        self.notices.push(TerritoryNotice::Changed { event_id, change });
        event_id
    }

    pub(crate) fn record(&mut self, draft: EventDraft) -> u64 {
        self.event_log.record(self.clock_time, draft)
    }

    pub(crate) fn emit(&mut self, notice: TerritoryNotice) {
        self.notices.push(notice);
    }

    fn report(&mut self, action: Option<ActionRef>, outcome: &Result<u64, ClaimError>) {
        let Some(action) = action else {
            return;
        };
        let outcome = match outcome {
            Ok(event_id) => ActionOutcome::Success {
                event_id: *event_id,
            },
            Err(err) => ActionOutcome::Failed {
                reason: err.to_string(),
            },
        };
        self.results.0.push(ActionResult {
            action_id: action.id,
            actor: action.actor,
            outcome,
        });
    }
}

/// Exclusive system that drains all pending `TerritoryCommand` messages,
/// applies them, records the audit trail and emits `TerritoryNotice`s.
///
/// Runs in `TickPhase::PostUpdate`. Actions whose command changed nothing
/// succeed with event id 0.
pub fn apply_territory_commands(world: &mut World) {
    let commands: Vec<TerritoryCommand> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<TerritoryCommand>>() else {
            return;
        };
        messages.drain().collect()
    };

    if commands.is_empty() {
        return;
    }

    let Some(mut ctx) = ApplyCtx::take(world) else {
        tracing::error!(
            "territory resources missing, dropped {} commands",
            commands.len()
        );
        return;
    };

    for cmd in commands {
        let outcome = match cmd.kind {
            // Claims
            TerritoryCommandKind::Claim(request) => {
                apply_territory::apply_claim(&mut ctx, &request)
            }
            TerritoryCommandKind::SetHeadquarters { cell, group } => {
                let result = ctx.territory.set_headquarters(cell, group);
                apply_territory::apply_change(&mut ctx, result)
            }
            TerritoryCommandKind::Release { cell, group } => {
                let result = ctx.territory.release(cell, group);
                apply_territory::apply_change(&mut ctx, result)
            }
            TerritoryCommandKind::AddToTown { cell, group } => {
                let result = ctx.territory.add_to_town(cell, group);
                apply_territory::apply_change(&mut ctx, result)
            }
            TerritoryCommandKind::Rename { cell, group, name } => {
                let result = ctx.territory.rename(cell, group, name);
                apply_territory::apply_change(&mut ctx, result)
            }

            // Administration
            TerritoryCommandKind::AddBadlands { cell } => {
                let result = ctx.territory.add_badlands(cell);
                apply_territory::apply_change(&mut ctx, result)
            }
            TerritoryCommandKind::RemoveBadlands { cell } => {
                let result = ctx.territory.remove_badlands(cell);
                apply_territory::apply_change(&mut ctx, result)
            }
            TerritoryCommandKind::AnchorDestroyed { anchor } => Ok(
                apply_territory::apply_anchor_destroyed(&mut ctx, anchor),
            ),
            TerritoryCommandKind::DissolveGroup { group } => {
                Ok(apply_territory::apply_dissolve_group(&mut ctx, group))
            }

            // Periodic
            TerritoryCommandKind::CollectUpkeep => Ok(apply_upkeep::apply_collect_upkeep(&mut ctx)),
            TerritoryCommandKind::Presence(change) => {
                Ok(apply_presence::apply_presence(&mut ctx, change))
            }
        };

        if let Err(err) = &outcome {
            tracing::warn!("rejected territory command: {err}");
        }
        ctx.report(cmd.action, &outcome);
    }

    ctx.restore(world);
}
