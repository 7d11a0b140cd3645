#![allow(dead_code)]

use bevy_app::App;
use territory_core::collab::{GroupRoster, Holder, StackVault};
use territory_core::ecs::{
    ActionResults, PendingActions, ServerTick, TerritoryPlugin, build_territory_app_with_manager,
};
use territory_core::economy::UpkeepLedger;
use territory_core::model::{Action, ActionKind, ActionOutcome, AnchorId, CellCoord};
use territory_core::{GroupId, OccupantId, TerritoryConfig, TerritoryManager};

pub const FOO: GroupId = GroupId(1);
pub const BAR: GroupId = GroupId(2);
/// Leader of FOO.
pub const ALICE: OccupantId = OccupantId(10);
/// Leader of BAR.
pub const BORIS: OccupantId = OccupantId(20);

/// An app with the full plugin set and two three-member groups.
pub fn app_with(config: TerritoryConfig, territory: TerritoryManager) -> App {
    let mut app = build_territory_app_with_manager(config, territory, UpkeepLedger::new());
    app.add_plugins(TerritoryPlugin);
    {
        let mut roster = app.world_mut().resource_mut::<GroupRoster>();
        roster.create(FOO, "FOO", ALICE);
        roster.add_member(FOO, OccupantId(11));
        roster.add_member(FOO, OccupantId(12));
        roster.create(BAR, "BAR", BORIS);
        roster.add_member(BAR, OccupantId(21));
        roster.add_member(BAR, OccupantId(22));
    }
    app
}

pub fn app() -> App {
    let config = TerritoryConfig::default();
    let territory = TerritoryManager::new(config.grid.build());
    app_with(config, territory)
}

pub fn tick_n(app: &mut App, n: u64) {
    for _ in 0..n {
        app.world_mut().run_schedule(ServerTick);
    }
}

pub fn deposit(app: &mut App, holder: Holder, amount: u32) {
    app.world_mut()
        .resource_mut::<StackVault>()
        .deposit(holder, amount);
}

pub fn act(app: &mut App, id: u64, actor: OccupantId, kind: ActionKind) {
    app.world_mut()
        .resource_mut::<PendingActions>()
        .0
        .push(Action { id, actor, kind });
}

pub fn claim(cell: &str, anchor: u64) -> ActionKind {
    ActionKind::Claim {
        cell: cell.to_string(),
        anchor: AnchorId(anchor),
    }
}

pub fn outcome(app: &App, id: u64) -> Option<ActionOutcome> {
    app.world()
        .resource::<ActionResults>()
        .0
        .iter()
        .find(|r| r.action_id == id)
        .map(|r| r.outcome.clone())
}

/// Claim a rectangular block for `group` directly on the manager, one
/// anchor per cell starting at `first_anchor`.
pub fn claim_block(
    territory: &mut TerritoryManager,
    group: GroupId,
    claimant: OccupantId,
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
    first_anchor: u64,
) {
    let mut anchor = first_anchor;
    for row in rows {
        for col in cols.clone() {
            territory
                .claim(CellCoord::new(row, col), group, claimant, AnchorId(anchor))
                .unwrap();
            anchor += 1;
        }
    }
}
