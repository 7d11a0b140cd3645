use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use bevy_ecs::resource::Resource;

use super::depth::scan_depth;
use super::{TerritoryChange, TerritoryObserver, UnclaimReason};
use crate::error::{ClaimError, GridError, RestoreError};
use crate::model::{
    AnchorId, CellCoord, CellRecord, CellType, GridIndex, GroupId, OccupantId, TerritoryCell,
    WorldPos,
};

/// What an anchor-targeted claim resolves to, given the cell's current state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnchorPlan {
    /// Wilderness becomes the group's land.
    Claim,
    /// Another group's anchor is taken over.
    Capture { from: GroupId },
    /// The group re-targets its own cell to a new anchor.
    MoveAnchor,
}

/// Owns every cell of the grid plus id and anchor indexes.
///
/// All mutation goes through this type. Each mutation either fails without
/// touching state or completes, refreshes derived depth values, and then
/// notifies observers.
#[derive(Resource)]
pub struct TerritoryManager {
    grid: GridIndex,
    cells: Vec<TerritoryCell>,
    by_id: HashMap<String, usize>,
    by_anchor: HashMap<AnchorId, usize>,
    depth: Vec<u32>,
    observers: Vec<Box<dyn TerritoryObserver>>,
}

impl fmt::Debug for TerritoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerritoryManager")
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("anchors", &self.by_anchor.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TerritoryManager {
    /// A grid of pure wilderness.
    pub fn new(grid: GridIndex) -> Self {
        let cells: Vec<TerritoryCell> = grid
            .coords()
            .map(|c| TerritoryCell::wilderness(grid.cell_id(c), c))
            .collect();
        let by_id = cells
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.id.clone(), slot))
            .collect();
        let depth = vec![0; cells.len()];
        Self {
            grid,
            cells,
            by_id,
            by_anchor: HashMap::new(),
            depth,
            observers: Vec::new(),
        }
    }

    /// Rehydrate from persisted records. Cells without a record stay
    /// wilderness. Any record that breaks an invariant fails the whole load.
    pub fn from_records(grid: GridIndex, records: &[CellRecord]) -> Result<Self, RestoreError> {
        let mut manager = Self::new(grid);
        let mut seen = HashSet::new();
        let mut headquarters: HashMap<GroupId, String> = HashMap::new();

        for record in records {
            let coord = manager.grid.parse_cell_id(&record.id)?;
            let id = manager.grid.cell_id(coord);
            if !seen.insert(coord) {
                return Err(RestoreError::DuplicateCell(id));
            }
            if record.kind.is_owned_kind() != record.owner_group_id.is_some() {
                return Err(RestoreError::OwnerMismatch {
                    cell: id,
                    kind: record.kind,
                    owner: record.owner_group_id,
                });
            }
            if let (CellType::Headquarters, Some(group)) = (record.kind, record.owner_group_id) {
                if let Some(first) = headquarters.insert(group, id.clone()) {
                    return Err(RestoreError::DuplicateHeadquarters {
                        group,
                        first,
                        second: id,
                    });
                }
            }
            if let Some(claimant) = record.claimant_id.filter(|_| !record.kind.is_owned_kind()) {
                return Err(RestoreError::UnexpectedClaimant {
                    cell: id,
                    kind: record.kind,
                    claimant,
                });
            }
            let slot = manager.slot_unchecked(coord);
            if let Some(anchor) = record.anchor_id {
                if !record.kind.is_anchored() {
                    return Err(RestoreError::UnexpectedAnchor {
                        cell: id,
                        kind: record.kind,
                        anchor,
                    });
                }
                if let Some(&other) = manager.by_anchor.get(&anchor) {
                    return Err(RestoreError::DuplicateAnchor {
                        anchor,
                        first: manager.cells[other].id.clone(),
                        second: id,
                    });
                }
                manager.by_anchor.insert(anchor, slot);
            }
            let cell = &mut manager.cells[slot];
            cell.kind = record.kind;
            cell.owner = record.owner_group_id;
            cell.claimant = record.claimant_id;
            cell.name = record.name.clone();
            cell.anchor = record.anchor_id;
        }

        manager.rebuild_depth();
        Ok(manager)
    }

    /// Persisted shape of every non-default cell.
    pub fn records(&self) -> Vec<CellRecord> {
        self.cells
            .iter()
            .filter(|c| c.kind != CellType::Wilderness || c.name.is_some())
            .map(CellRecord::from)
            .collect()
    }

    pub fn add_observer(&mut self, observer: impl TerritoryObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn get(&self, id: &str) -> Option<&TerritoryCell> {
        self.by_id.get(id).map(|&slot| &self.cells[slot])
    }

    pub fn get_at(&self, coord: CellCoord) -> Option<&TerritoryCell> {
        self.grid.slot(coord).map(|slot| &self.cells[slot])
    }

    pub fn get_by_anchor(&self, anchor: AnchorId) -> Option<&TerritoryCell> {
        self.by_anchor.get(&anchor).map(|&slot| &self.cells[slot])
    }

    /// The cell under a world position; off-map positions clamp to the edge.
    pub fn get_by_position(&self, pos: WorldPos) -> &TerritoryCell {
        let coord = self.grid.position_to_cell(pos);
        &self.cells[self.slot_unchecked(coord)]
    }

    /// Resolve a cell id to its coordinate.
    pub fn resolve(&self, id: &str) -> Result<CellCoord, GridError> {
        match self.by_id.get(id) {
            Some(&slot) => Ok(self.cells[slot].coord),
            None => self.grid.parse_cell_id(id),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &TerritoryCell> {
        self.cells.iter()
    }

    pub fn owned_by(&self, group: GroupId) -> Vec<&TerritoryCell> {
        self.cells.iter().filter(|c| c.is_owned_by(group)).collect()
    }

    /// Snapshot of a group's cell coordinates, safe to iterate while mutating.
    pub fn owned_coords(&self, group: GroupId) -> Vec<CellCoord> {
        self.cells
            .iter()
            .filter(|c| c.is_owned_by(group))
            .map(|c| c.coord)
            .collect()
    }

    pub fn of_kind(&self, kind: CellType) -> Vec<&TerritoryCell> {
        self.cells.iter().filter(|c| c.kind == kind).collect()
    }

    pub fn owned_count(&self, group: GroupId) -> usize {
        self.cells.iter().filter(|c| c.is_owned_by(group)).count()
    }

    pub fn taxable_count(&self, group: GroupId) -> usize {
        self.cells
            .iter()
            .filter(|c| c.is_owned_by(group) && c.kind.is_taxable())
            .count()
    }

    pub fn headquarters_of(&self, group: GroupId) -> Option<&TerritoryCell> {
        self.cells
            .iter()
            .find(|c| c.kind == CellType::Headquarters && c.is_owned_by(group))
    }

    /// Every group holding at least one cell.
    pub fn owner_groups(&self) -> BTreeSet<GroupId> {
        self.cells.iter().filter_map(|c| c.owner).collect()
    }

    /// How many of the four cardinal neighbours `group` holds.
    pub fn contiguous_claimed_neighbor_count(&self, coord: CellCoord, group: GroupId) -> usize {
        self.grid
            .neighbors(coord)
            .filter(|&n| self.get_at(n).is_some_and(|c| c.is_owned_by(group)))
            .count()
    }

    /// Cached depth of a cell inside its owner's territory.
    pub fn depth_in_friendly_territory(&self, coord: CellCoord) -> u32 {
        self.grid.slot(coord).map_or(0, |slot| self.depth[slot])
    }

    /// Depth computed by a fresh scan, bypassing the cache.
    pub fn compute_depth(&self, coord: CellCoord) -> u32 {
        scan_depth(&self.grid, &self.cells, coord)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Decide what targeting `anchor` at `coord` would do for `group`,
    /// without changing anything.
    pub fn plan_anchor_claim(
        &self,
        coord: CellCoord,
        group: GroupId,
        anchor: AnchorId,
    ) -> Result<AnchorPlan, ClaimError> {
        let cell = self.cell(coord)?;
        if let Some(other) = self.get_by_anchor(anchor) {
            if other.coord != coord {
                return Err(ClaimError::AnchorInUse {
                    anchor,
                    cell: other.id.clone(),
                });
            }
        }
        match (cell.kind, cell.owner) {
            (kind, _) if kind.is_claimable() => Ok(AnchorPlan::Claim),
            (kind, Some(owner)) if kind.is_anchored() && owner == group => {
                if cell.anchor == Some(anchor) {
                    Err(ClaimError::AlreadyOwned {
                        cell: cell.id.clone(),
                        group,
                        anchor,
                    })
                } else {
                    Ok(AnchorPlan::MoveAnchor)
                }
            }
            (kind, Some(owner)) if kind.is_anchored() => {
                if cell.anchor == Some(anchor) {
                    Ok(AnchorPlan::Capture { from: owner })
                } else {
                    Err(ClaimError::OwnedByOther {
                        cell: cell.id.clone(),
                        owner,
                    })
                }
            }
            (kind, _) => Err(ClaimError::NotClaimable {
                cell: cell.id.clone(),
                kind,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Wilderness becomes the group's land; its first cell becomes the
    /// headquarters.
    pub fn claim(
        &mut self,
        coord: CellCoord,
        group: GroupId,
        claimant: OccupantId,
        anchor: AnchorId,
    ) -> Result<TerritoryChange, ClaimError> {
        if self.plan_anchor_claim(coord, group, anchor)? != AnchorPlan::Claim {
            let cell = self.cell(coord)?;
            return Err(ClaimError::NotClaimable {
                cell: cell.id.clone(),
                kind: cell.kind,
            });
        }
        let kind = if self.owned_count(group) == 0 {
            CellType::Headquarters
        } else {
            CellType::Claimed
        };
        let slot = self.slot_unchecked(coord);
        let cell = &mut self.cells[slot];
        cell.kind = kind;
        cell.owner = Some(group);
        cell.claimant = Some(claimant);
        cell.anchor = Some(anchor);
        self.by_anchor.insert(anchor, slot);
        tracing::info!("{group} claimed {} as {kind}", self.cells[slot].id);

        Ok(self.finish(TerritoryChange::Claimed {
            cell: coord,
            group,
            claimant,
            anchor,
            kind,
        }))
    }

    /// Take over another group's cell through its anchor.
    pub fn capture(
        &mut self,
        coord: CellCoord,
        group: GroupId,
        claimant: OccupantId,
        anchor: AnchorId,
    ) -> Result<TerritoryChange, ClaimError> {
        let AnchorPlan::Capture { from } = self.plan_anchor_claim(coord, group, anchor)? else {
            let cell = self.cell(coord)?;
            return Err(ClaimError::WrongKind {
                cell: cell.id.clone(),
                kind: cell.kind,
                expected: "land held by another group",
            });
        };
        let kind = if self.headquarters_of(group).is_some() {
            CellType::Claimed
        } else {
            CellType::Headquarters
        };
        let slot = self.slot_unchecked(coord);
        let cell = &mut self.cells[slot];
        cell.kind = kind;
        cell.owner = Some(group);
        cell.claimant = Some(claimant);
        cell.name = None;
        tracing::info!("{group} captured {} from {from}", self.cells[slot].id);

        Ok(self.finish(TerritoryChange::Captured {
            cell: coord,
            from,
            to: group,
            claimant,
            kind,
        }))
    }

    /// Re-target one of the group's own cells to a different anchor.
    pub fn move_anchor(
        &mut self,
        coord: CellCoord,
        group: GroupId,
        anchor: AnchorId,
    ) -> Result<TerritoryChange, ClaimError> {
        if self.plan_anchor_claim(coord, group, anchor)? != AnchorPlan::MoveAnchor {
            return Err(ClaimError::NotOwner {
                cell: self.cell(coord)?.id.clone(),
                group,
            });
        }
        let slot = self.slot_unchecked(coord);
        let from = self.cells[slot].anchor.replace(anchor);
        if let Some(old) = from {
            self.by_anchor.remove(&old);
        }
        self.by_anchor.insert(anchor, slot);

        Ok(self.finish(TerritoryChange::AnchorMoved {
            cell: coord,
            group,
            from,
            to: anchor,
        }))
    }

    /// Apply whatever an anchor-targeted claim resolves to.
    pub fn claim_with_anchor(
        &mut self,
        coord: CellCoord,
        group: GroupId,
        claimant: OccupantId,
        anchor: AnchorId,
    ) -> Result<TerritoryChange, ClaimError> {
        match self.plan_anchor_claim(coord, group, anchor)? {
            AnchorPlan::Claim => self.claim(coord, group, claimant, anchor),
            AnchorPlan::Capture { .. } => self.capture(coord, group, claimant, anchor),
            AnchorPlan::MoveAnchor => self.move_anchor(coord, group, anchor),
        }
    }

    /// Promote a claimed cell to headquarters, demoting the previous one.
    pub fn set_headquarters(
        &mut self,
        coord: CellCoord,
        group: GroupId,
    ) -> Result<TerritoryChange, ClaimError> {
        let cell = self.cell(coord)?;
        if !cell.is_owned_by(group) {
            return Err(ClaimError::NotOwner {
                cell: cell.id.clone(),
                group,
            });
        }
        if cell.kind != CellType::Claimed {
            return Err(ClaimError::WrongKind {
                cell: cell.id.clone(),
                kind: cell.kind,
                expected: "claimed",
            });
        }
        let previous = self.headquarters_of(group).map(|c| c.coord);
        if let Some(prev) = previous {
            let prev_slot = self.slot_unchecked(prev);
            self.cells[prev_slot].kind = CellType::Claimed;
        }
        let slot = self.slot_unchecked(coord);
        self.cells[slot].kind = CellType::Headquarters;

        Ok(self.finish(TerritoryChange::HeadquartersMoved {
            cell: coord,
            group,
            previous,
        }))
    }

    /// Return an owned cell to wilderness.
    pub fn unclaim(
        &mut self,
        coord: CellCoord,
        reason: UnclaimReason,
    ) -> Result<TerritoryChange, ClaimError> {
        let cell = self.cell(coord)?;
        let (Some(group), previous) = (cell.owner, cell.kind) else {
            return Err(ClaimError::WrongKind {
                cell: cell.id.clone(),
                kind: cell.kind,
                expected: "owned land",
            });
        };
        let slot = self.slot_unchecked(coord);
        if let Some(anchor) = self.cells[slot].anchor {
            self.by_anchor.remove(&anchor);
        }
        self.cells[slot].clear();
        tracing::info!("{group} lost {} ({reason:?})", self.cells[slot].id);

        Ok(self.finish(TerritoryChange::Unclaimed {
            cell: coord,
            group,
            previous,
            reason,
        }))
    }

    /// Give up one of the group's own cells.
    pub fn release(
        &mut self,
        coord: CellCoord,
        group: GroupId,
    ) -> Result<TerritoryChange, ClaimError> {
        let cell = self.cell(coord)?;
        if !cell.is_owned_by(group) {
            return Err(ClaimError::NotOwner {
                cell: cell.id.clone(),
                group,
            });
        }
        self.unclaim(coord, UnclaimReason::Released)
    }

    /// Return every cell of `group` to wilderness at once.
    pub fn unclaim_all(&mut self, group: GroupId, reason: UnclaimReason) -> Vec<TerritoryChange> {
        self.owned_coords(group)
            .into_iter()
            .filter_map(|coord| self.unclaim(coord, reason).ok())
            .collect()
    }

    /// Unclaim the cell represented by a destroyed anchor, if any.
    pub fn handle_anchor_destroyed(&mut self, anchor: AnchorId) -> Option<TerritoryChange> {
        let coord = self.get_by_anchor(anchor)?.coord;
        self.unclaim(coord, UnclaimReason::AnchorDestroyed).ok()
    }

    pub fn add_badlands(&mut self, coord: CellCoord) -> Result<TerritoryChange, ClaimError> {
        let cell = self.cell(coord)?;
        if !cell.kind.is_claimable() {
            return Err(ClaimError::WrongKind {
                cell: cell.id.clone(),
                kind: cell.kind,
                expected: "wilderness",
            });
        }
        let slot = self.slot_unchecked(coord);
        self.cells[slot].kind = CellType::Badlands;
        Ok(self.finish(TerritoryChange::BadlandsAdded { cell: coord }))
    }

    pub fn remove_badlands(&mut self, coord: CellCoord) -> Result<TerritoryChange, ClaimError> {
        let cell = self.cell(coord)?;
        if cell.kind != CellType::Badlands {
            return Err(ClaimError::WrongKind {
                cell: cell.id.clone(),
                kind: cell.kind,
                expected: "badlands",
            });
        }
        let slot = self.slot_unchecked(coord);
        self.cells[slot].clear();
        Ok(self.finish(TerritoryChange::BadlandsRemoved { cell: coord }))
    }

    /// Fold wilderness, or a claimed cell of the same group, into a town.
    pub fn add_to_town(
        &mut self,
        coord: CellCoord,
        group: GroupId,
    ) -> Result<TerritoryChange, ClaimError> {
        let cell = self.cell(coord)?;
        match (cell.kind, cell.owner) {
            (CellType::Wilderness, _) => {}
            (CellType::Claimed, Some(owner)) if owner == group => {}
            (CellType::Claimed, Some(_)) => {
                return Err(ClaimError::NotOwner {
                    cell: cell.id.clone(),
                    group,
                });
            }
            (kind, _) => {
                return Err(ClaimError::WrongKind {
                    cell: cell.id.clone(),
                    kind,
                    expected: "wilderness or claimed",
                });
            }
        }
        let slot = self.slot_unchecked(coord);
        if let Some(anchor) = self.cells[slot].anchor.take() {
            self.by_anchor.remove(&anchor);
        }
        let cell = &mut self.cells[slot];
        cell.kind = CellType::Town;
        cell.owner = Some(group);

        Ok(self.finish(TerritoryChange::TownFounded { cell: coord, group }))
    }

    /// Set or clear the display name of one of the group's cells.
    pub fn rename(
        &mut self,
        coord: CellCoord,
        group: GroupId,
        name: Option<String>,
    ) -> Result<TerritoryChange, ClaimError> {
        let cell = self.cell(coord)?;
        if !cell.is_owned_by(group) {
            return Err(ClaimError::NotOwner {
                cell: cell.id.clone(),
                group,
            });
        }
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let slot = self.slot_unchecked(coord);
        self.cells[slot].name = name.clone();
        Ok(self.finish(TerritoryChange::Renamed { cell: coord, name }))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn cell(&self, coord: CellCoord) -> Result<&TerritoryCell, GridError> {
        self.get_at(coord).ok_or_else(|| GridError::OutOfBounds {
            id: coord.to_string(),
            rows: self.grid.rows(),
            cols: self.grid.cols(),
        })
    }

    /// Slot of a coordinate already known to be in bounds.
    fn slot_unchecked(&self, coord: CellCoord) -> usize {
        coord.row * self.grid.cols() + coord.col
    }

    /// Refresh derived state and notify observers.
    fn finish(&mut self, change: TerritoryChange) -> TerritoryChange {
        if change.changes_ownership() {
            self.refresh_depth_through(change.cell());
        }
        let mut observers = std::mem::take(&mut self.observers);
        for observer in &mut observers {
            observer.on_change(&change, self);
        }
        self.observers = observers;
        change
    }

    /// A cell's depth depends only on its row and column, so an ownership
    /// change at `coord` can only affect cells sharing that row or column.
    fn refresh_depth_through(&mut self, coord: CellCoord) {
        for col in 0..self.grid.cols() {
            let c = CellCoord::new(coord.row, col);
            let slot = self.slot_unchecked(c);
            self.depth[slot] = scan_depth(&self.grid, &self.cells, c);
        }
        for row in 0..self.grid.rows() {
            let c = CellCoord::new(row, coord.col);
            let slot = self.slot_unchecked(c);
            self.depth[slot] = scan_depth(&self.grid, &self.cells, c);
        }
    }

    fn rebuild_depth(&mut self) {
        for slot in 0..self.cells.len() {
            let coord = self.grid.coord_of_slot(slot);
            self.depth[slot] = scan_depth(&self.grid, &self.cells, coord);
        }
    }
}
