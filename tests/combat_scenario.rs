mod common;

use common::{ALICE, BAR, BORIS, FOO, act, app, app_with, claim, claim_block, outcome, tick_n};
use territory_core::collab::WarTable;
use territory_core::combat::{Combatant, Decision, StructureTarget, Target};
use territory_core::ecs::authorize_damage;
use territory_core::model::{
    BuildingGrade, CellCoord, DamageInfo, DamageType, Structure, StructureCategory, WorldPos,
};
use territory_core::{OccupantId, TerritoryConfig, TerritoryManager};

fn wall_at(position: WorldPos) -> Target {
    Target::Structure(StructureTarget {
        structure: Structure::new(StructureCategory::BuildingBlock, BuildingGrade::Stone),
        position,
        owner: Some(ALICE),
    })
}

fn raider(position: WorldPos) -> Combatant {
    Combatant::new(BORIS, Some(BAR), position)
}

#[test]
fn wall_in_headquarters_holds_until_war() {
    let mut app = app();
    {
        let territory = app.world().resource::<TerritoryManager>();
        assert_eq!((territory.grid().rows(), territory.grid().cols()), (20, 20));
    }

    act(&mut app, 1, ALICE, claim("A0", 1));
    tick_n(&mut app, 1);
    assert!(outcome(&app, 1).unwrap().is_success());
    assert_eq!(
        app.world()
            .resource::<TerritoryManager>()
            .headquarters_of(FOO)
            .unwrap()
            .id,
        "A0"
    );

    let wall = wall_at(WorldPos::new(75.0, 75.0));
    let attacker = raider(WorldPos::new(225.0, 75.0));
    let hit = DamageInfo::single(DamageType::Explosion, 275.0);

    let decision = authorize_damage(app.world(), Some(&attacker), &wall, &hit).unwrap();
    assert_eq!(decision, Decision::Deny);
    let mut blocked = hit.clone();
    decision.apply(&mut blocked);
    assert_eq!(blocked.total(), 0.0);

    app.world_mut().resource_mut::<WarTable>().declare_war(FOO, BAR);
    // A lone cell has depth 0, and the first defensive bonus is 0
    let decision = authorize_damage(app.world(), Some(&attacker), &wall, &hit).unwrap();
    assert_eq!(decision, Decision::Allow);
    let mut landed = hit.clone();
    decision.apply(&mut landed);
    assert_eq!(landed, hit);
}

#[test]
fn depth_softens_wartime_raids() {
    let config = TerritoryConfig::default();
    let mut territory = TerritoryManager::new(config.grid.build());
    // 5x5 block: the centre sits one cell deep
    claim_block(&mut territory, FOO, ALICE, 0..5, 0..5, 1);
    let centre = territory.grid().cell_to_position(CellCoord::new(2, 2));
    let edge = territory.grid().cell_to_position(CellCoord::new(0, 2));
    assert_eq!(territory.depth_in_friendly_territory(CellCoord::new(2, 2)), 1);

    let mut app = app_with(config, territory);
    app.world_mut().resource_mut::<WarTable>().declare_war(FOO, BAR);
    let attacker = raider(WorldPos::new(1_000.0, 1_000.0));
    let hit = DamageInfo::single(DamageType::Explosion, 100.0);

    let deep = authorize_damage(app.world(), Some(&attacker), &wall_at(centre), &hit).unwrap();
    assert_eq!(deep, Decision::Scale(0.5));
    let mut softened = hit.clone();
    deep.apply(&mut softened);
    assert_eq!(softened.total(), 50.0);

    let shallow = authorize_damage(app.world(), Some(&attacker), &wall_at(edge), &hit).unwrap();
    assert_eq!(shallow, Decision::Allow);
}

#[test]
fn twig_is_fair_game_but_walls_hold_everywhere() {
    let mut app = app();
    act(&mut app, 1, ALICE, claim("A0", 1));
    tick_n(&mut app, 1);
    let attacker = raider(WorldPos::new(225.0, 75.0));
    let hit = DamageInfo::single(DamageType::Slash, 10.0);

    let twig = Target::Structure(StructureTarget {
        structure: Structure::new(StructureCategory::BuildingBlock, BuildingGrade::Twig),
        position: WorldPos::new(75.0, 75.0),
        owner: Some(ALICE),
    });
    assert_eq!(
        authorize_damage(app.world(), Some(&attacker), &twig, &hit),
        Some(Decision::Allow)
    );

    let outside = wall_at(WorldPos::new(1_000.0, 1_000.0));
    assert_eq!(
        authorize_damage(app.world(), Some(&attacker), &outside, &hit),
        Some(Decision::Deny)
    );
}

#[test]
fn decay_is_reduced_on_claimed_land() {
    let mut app = app();
    act(&mut app, 1, ALICE, claim("A0", 1));
    tick_n(&mut app, 1);
    let rot = DamageInfo::single(DamageType::Decay, 8.0);

    let inside = authorize_damage(app.world(), None, &wall_at(WorldPos::new(75.0, 75.0)), &rot);
    assert_eq!(inside, Some(Decision::Scale(0.5)));
    let outside = authorize_damage(
        app.world(),
        None,
        &wall_at(WorldPos::new(1_000.0, 1_000.0)),
        &rot,
    );
    assert_eq!(outside, Some(Decision::Allow));
}

#[test]
fn owners_may_damage_their_own_walls() {
    let mut app = app();
    act(&mut app, 1, ALICE, claim("A0", 1));
    tick_n(&mut app, 1);
    let owner = Combatant::new(ALICE, Some(FOO), WorldPos::new(75.0, 75.0));
    let hit = DamageInfo::single(DamageType::Blunt, 30.0);
    assert_eq!(
        authorize_damage(app.world(), Some(&owner), &wall_at(WorldPos::new(80.0, 80.0)), &hit),
        Some(Decision::Allow)
    );
    // A groupmate hitting someone else's wall is still denied
    let mate = Combatant::new(OccupantId(11), Some(FOO), WorldPos::new(75.0, 75.0));
    assert_eq!(
        authorize_damage(app.world(), Some(&mate), &wall_at(WorldPos::new(80.0, 80.0)), &hit),
        Some(Decision::Deny)
    );
}
