use serde::{Deserialize, Serialize};

use crate::collab::{AnchorStatus, GroupDirectory, Holder, ResourceVault};
use crate::config::ClaimConfig;
use crate::error::ClaimError;
use crate::model::{AnchorId, CellCoord, GroupId, OccupantId};
use crate::territory::{AnchorPlan, TerritoryChange, TerritoryManager};

/// An occupant asking to claim, capture, or re-anchor a cell for their group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub cell: CellCoord,
    pub group: GroupId,
    pub claimant: OccupantId,
    pub anchor: AnchorId,
}

/// A completed claim and what it cost.
#[derive(Clone, Debug, PartialEq)]
pub struct ClaimReceipt {
    pub change: TerritoryChange,
    pub cost: u32,
}

/// Price of the group's next claim, keyed by how many cells it already holds.
pub fn claim_cost(territory: &TerritoryManager, group: GroupId, config: &ClaimConfig) -> u32 {
    config.costs.get(territory.owned_count(group))
}

/// Validate, charge, and apply a claim. Nothing is deducted and nothing
/// changes unless every check passes.
pub fn process_claim<G, A, V>(
    territory: &mut TerritoryManager,
    request: &ClaimRequest,
    groups: &G,
    anchors: &A,
    vault: &mut V,
    config: &ClaimConfig,
) -> Result<ClaimReceipt, ClaimError>
where
    G: GroupDirectory + ?Sized,
    A: AnchorStatus + ?Sized,
    V: ResourceVault + ?Sized,
{
    let ClaimRequest {
        cell,
        group,
        claimant,
        anchor,
    } = *request;

    if !groups.exists(group) {
        return Err(ClaimError::UnknownGroup(group));
    }
    let members = groups.member_count(group);
    if members < config.min_members {
        return Err(ClaimError::GroupTooSmall {
            group,
            members,
            required: config.min_members,
        });
    }
    if !groups.has_leader(group, claimant) {
        return Err(ClaimError::NotLeader {
            occupant: claimant,
            group,
        });
    }
    if anchors.is_destroyed(anchor) {
        return Err(ClaimError::AnchorDestroyed(anchor));
    }

    match territory.plan_anchor_claim(cell, group, anchor)? {
        AnchorPlan::Claim => {
            if config.require_contiguous
                && territory.owned_count(group) > 0
                && territory.contiguous_claimed_neighbor_count(cell, group) == 0
            {
                return Err(ClaimError::NotContiguous {
                    cell: territory.grid().cell_id(cell),
                    group,
                });
            }
            let cost = claim_cost(territory, group, config);
            if !vault.withdraw(Holder::Occupant(claimant), cost) {
                return Err(ClaimError::InsufficientResources {
                    cost,
                    payer: claimant,
                });
            }
            let change = territory.claim(cell, group, claimant, anchor)?;
            Ok(ClaimReceipt { change, cost })
        }
        AnchorPlan::Capture { .. } => {
            let change = territory.capture(cell, group, claimant, anchor)?;
            Ok(ClaimReceipt { change, cost: 0 })
        }
        AnchorPlan::MoveAnchor => {
            let change = territory.move_anchor(cell, group, anchor)?;
            Ok(ClaimReceipt { change, cost: 0 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{AnchorRegistry, GroupRoster, StackVault};
    use crate::model::{CellType, GridIndex};

    const FOO: GroupId = GroupId(1);
    const LEADER: OccupantId = OccupantId(10);

    struct Fixture {
        territory: TerritoryManager,
        roster: GroupRoster,
        anchors: AnchorRegistry,
        vault: StackVault,
        config: ClaimConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let mut roster = GroupRoster::new();
            roster.create(FOO, "FOO", LEADER);
            roster.add_member(FOO, OccupantId(11));
            roster.add_member(FOO, OccupantId(12));
            Self {
                territory: TerritoryManager::new(GridIndex::new(3000.0, 150.0)),
                roster,
                anchors: AnchorRegistry::new(),
                vault: StackVault::new(),
                config: ClaimConfig::default(),
            }
        }

        fn claim(&mut self, row: usize, col: usize, anchor: u64) -> Result<ClaimReceipt, ClaimError> {
            self.claim_as(row, col, anchor, LEADER)
        }

        fn claim_as(
            &mut self,
            row: usize,
            col: usize,
            anchor: u64,
            claimant: OccupantId,
        ) -> Result<ClaimReceipt, ClaimError> {
            let request = ClaimRequest {
                cell: CellCoord::new(row, col),
                group: FOO,
                claimant,
                anchor: AnchorId(anchor),
            };
            process_claim(
                &mut self.territory,
                &request,
                &self.roster,
                &self.anchors,
                &mut self.vault,
                &self.config,
            )
        }
    }

    #[test]
    fn cost_follows_owned_count_and_clamps() {
        let mut f = Fixture::new();
        assert_eq!(claim_cost(&f.territory, FOO, &f.config), 0);
        f.vault.deposit(Holder::Occupant(LEADER), 10_000);
        let mut paid = Vec::new();
        for col in 0..8 {
            paid.push(f.claim(0, col, col as u64 + 1).unwrap().cost);
        }
        assert_eq!(paid, vec![0, 100, 200, 300, 400, 500, 500, 500]);
        assert_eq!(f.vault.balance(Holder::Occupant(LEADER)), 10_000 - 2_500);
    }

    #[test]
    fn first_claim_is_free_headquarters() {
        let mut f = Fixture::new();
        let receipt = f.claim(0, 0, 1).unwrap();
        assert_eq!(receipt.cost, 0);
        assert_eq!(f.territory.get("A0").unwrap().kind, CellType::Headquarters);
    }

    #[test]
    fn unpaid_claim_changes_nothing() {
        let mut f = Fixture::new();
        f.claim(0, 0, 1).unwrap();
        f.vault.deposit(Holder::Occupant(LEADER), 60);
        f.vault.deposit(Holder::Occupant(LEADER), 30);
        let err = f.claim(0, 1, 2).unwrap_err();
        assert_eq!(err, ClaimError::InsufficientResources { cost: 100, payer: LEADER });
        assert_eq!(f.vault.stacks(Holder::Occupant(LEADER)), &[60, 30]);
        assert_eq!(f.territory.get("B0").unwrap().kind, CellType::Wilderness);
        assert!(f.territory.get_by_anchor(AnchorId(2)).is_none());
    }

    #[test]
    fn small_group_is_refused() {
        let mut f = Fixture::new();
        f.roster.remove_member(FOO, OccupantId(12));
        let err = f.claim(0, 0, 1).unwrap_err();
        assert_eq!(err, ClaimError::GroupTooSmall { group: FOO, members: 2, required: 3 });
        assert_eq!(f.territory.owned_count(FOO), 0);
    }

    #[test]
    fn only_leaders_claim() {
        let mut f = Fixture::new();
        let err = f.claim_as(0, 0, 1, OccupantId(11)).unwrap_err();
        assert!(matches!(err, ClaimError::NotLeader { .. }));
    }

    #[test]
    fn unknown_group_is_refused() {
        let mut f = Fixture::new();
        f.roster.dissolve(FOO);
        assert_eq!(f.claim(0, 0, 1).unwrap_err(), ClaimError::UnknownGroup(FOO));
    }

    #[test]
    fn destroyed_anchor_is_refused() {
        let mut f = Fixture::new();
        f.anchors.mark_destroyed(AnchorId(1));
        assert_eq!(f.claim(0, 0, 1).unwrap_err(), ClaimError::AnchorDestroyed(AnchorId(1)));
    }

    #[test]
    fn contiguity_when_required() {
        let mut f = Fixture::new();
        f.config.require_contiguous = true;
        f.vault.deposit(Holder::Occupant(LEADER), 1_000);
        // The first claim may land anywhere.
        f.claim(5, 5, 1).unwrap();
        let err = f.claim(9, 9, 2).unwrap_err();
        assert!(matches!(err, ClaimError::NotContiguous { .. }));
        assert_eq!(f.vault.balance(Holder::Occupant(LEADER)), 1_000);
        f.claim(5, 6, 3).unwrap();
    }

    #[test]
    fn capture_and_move_are_free() {
        let mut f = Fixture::new();
        f.claim(0, 0, 1).unwrap();
        let moved = f.claim(0, 0, 9).unwrap();
        assert_eq!(moved.cost, 0);
        assert!(matches!(moved.change, TerritoryChange::AnchorMoved { .. }));

        let bar = GroupId(2);
        f.roster.create(bar, "BAR", OccupantId(20));
        f.roster.add_member(bar, OccupantId(21));
        f.roster.add_member(bar, OccupantId(22));
        let request = ClaimRequest {
            cell: CellCoord::new(0, 0),
            group: bar,
            claimant: OccupantId(20),
            anchor: AnchorId(9),
        };
        let receipt = process_claim(
            &mut f.territory,
            &request,
            &f.roster,
            &f.anchors,
            &mut f.vault,
            &f.config,
        )
        .unwrap();
        assert_eq!(receipt.cost, 0);
        assert_eq!(f.territory.get("A0").unwrap().owner, Some(bar));
    }
}
