//! Action intake.
//!
//! Drains `PendingActions` every tick, resolves the typed cell id and the
//! actor's group, and emits one `TerritoryCommand` per valid action. Actions
//! that fail before reaching the applicator are answered here; the rest are
//! answered by the applicator.

use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageWriter;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::collab::{GroupDirectory, GroupRoster};
use crate::ecs::commands::{TerritoryCommand, TerritoryCommandKind};
use crate::ecs::resources::{ActionResults, PendingActions};
use crate::ecs::schedule::{ServerTick, TickPhase};
use crate::economy::ClaimRequest;
use crate::error::ClaimError;
use crate::model::{Action, ActionKind, ActionOutcome, ActionResult};
use crate::territory::TerritoryManager;

pub struct ActionsPlugin;

impl Plugin for ActionsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(ServerTick, process_actions.in_set(TickPhase::Update));
    }
}

fn process_actions(
    mut pending: ResMut<PendingActions>,
    mut results: ResMut<ActionResults>,
    territory: Res<TerritoryManager>,
    roster: Res<GroupRoster>,
    mut commands: MessageWriter<TerritoryCommand>,
) {
    let actions = std::mem::take(&mut pending.0);

    for action in actions {
        match intake(&action, &territory, &*roster) {
            Ok(kind) => {
                commands.write(TerritoryCommand::new(kind).for_action(action.id, action.actor));
            }
            Err(err) => {
                tracing::warn!("rejected action {} from {}: {err}", action.id, action.actor);
                results.0.push(ActionResult {
                    action_id: action.id,
                    actor: action.actor,
                    outcome: ActionOutcome::Failed {
                        reason: err.to_string(),
                    },
                });
            }
        }
    }
}

/// Translate an action into a command, checking what can be checked without
/// mutating anything. Claims defer the leader check to claim processing.
fn intake<G>(
    action: &Action,
    territory: &TerritoryManager,
    groups: &G,
) -> Result<TerritoryCommandKind, ClaimError>
where
    G: GroupDirectory + ?Sized,
{
    let actor = action.actor;
    let group = groups.group_of(actor).ok_or(ClaimError::NoGroup(actor))?;
    let require_leader = || {
        if groups.has_leader(group, actor) {
            Ok(())
        } else {
            Err(ClaimError::NotLeader {
                occupant: actor,
                group,
            })
        }
    };

    let kind = match &action.kind {
        ActionKind::Claim { cell, anchor } => TerritoryCommandKind::Claim(ClaimRequest {
            cell: territory.resolve(cell)?,
            group,
            claimant: actor,
            anchor: *anchor,
        }),
        ActionKind::Release { cell } => {
            require_leader()?;
            TerritoryCommandKind::Release {
                cell: territory.resolve(cell)?,
                group,
            }
        }
        ActionKind::SetHeadquarters { cell } => {
            require_leader()?;
            TerritoryCommandKind::SetHeadquarters {
                cell: territory.resolve(cell)?,
                group,
            }
        }
        ActionKind::AddToTown { cell } => {
            require_leader()?;
            TerritoryCommandKind::AddToTown {
                cell: territory.resolve(cell)?,
                group,
            }
        }
        ActionKind::Rename { cell, name } => {
            require_leader()?;
            TerritoryCommandKind::Rename {
                cell: territory.resolve(cell)?,
                group,
                name: name.clone(),
            }
        }
    };
    Ok(kind)
}
