//! Enter/exit detection by diffing polled occupant positions.

use std::collections::HashMap;

use bevy_ecs::resource::Resource;

use crate::model::{CellCoord, GridIndex, OccupantId, WorldPos};

/// An occupant crossed a cell border.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PresenceChange {
    pub occupant: OccupantId,
    pub left: Option<CellCoord>,
    pub entered: Option<CellCoord>,
}

/// Last known cell per occupant.
#[derive(Resource, Clone, Debug, Default)]
pub struct PresenceTracker {
    current: HashMap<OccupantId, CellCoord>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position. Reports a change only when the cell differs from
    /// the previous observation; the first observation reports an entry.
    pub fn observe(
        &mut self,
        grid: &GridIndex,
        occupant: OccupantId,
        position: WorldPos,
    ) -> Option<PresenceChange> {
        let cell = grid.position_to_cell(position);
        let previous = self.current.insert(occupant, cell);
        (previous != Some(cell)).then_some(PresenceChange {
            occupant,
            left: previous,
            entered: Some(cell),
        })
    }

    /// Drop an occupant that disconnected or died.
    pub fn forget(&mut self, occupant: OccupantId) -> Option<PresenceChange> {
        self.current
            .remove(&occupant)
            .map(|cell| PresenceChange {
                occupant,
                left: Some(cell),
                entered: None,
            })
    }

    pub fn cell_of(&self, occupant: OccupantId) -> Option<CellCoord> {
        self.current.get(&occupant).copied()
    }

    /// Occupants last seen in `cell`, sorted for deterministic output.
    pub fn occupants_in(&self, cell: CellCoord) -> Vec<OccupantId> {
        let mut found: Vec<OccupantId> = self
            .current
            .iter()
            .filter(|(_, c)| **c == cell)
            .map(|(o, _)| *o)
            .collect();
        found.sort();
        found
    }

    pub fn tracked(&self) -> Vec<OccupantId> {
        let mut all: Vec<OccupantId> = self.current.keys().copied().collect();
        all.sort();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: OccupantId = OccupantId(1);

    #[test]
    fn moves_within_a_cell_are_silent() {
        let grid = GridIndex::new(3000.0, 150.0);
        let mut tracker = PresenceTracker::new();
        let first = tracker.observe(&grid, ALICE, WorldPos::new(10.0, 10.0));
        assert_eq!(
            first,
            Some(PresenceChange { occupant: ALICE, left: None, entered: Some(CellCoord::new(0, 0)) })
        );
        assert_eq!(tracker.observe(&grid, ALICE, WorldPos::new(140.0, 20.0)), None);
    }

    #[test]
    fn crossing_reports_both_cells() {
        let grid = GridIndex::new(3000.0, 150.0);
        let mut tracker = PresenceTracker::new();
        tracker.observe(&grid, ALICE, WorldPos::new(10.0, 10.0));
        let change = tracker.observe(&grid, ALICE, WorldPos::new(160.0, 10.0)).unwrap();
        assert_eq!(change.left, Some(CellCoord::new(0, 0)));
        assert_eq!(change.entered, Some(CellCoord::new(0, 1)));
        assert_eq!(tracker.occupants_in(CellCoord::new(0, 1)), vec![ALICE]);
    }

    #[test]
    fn forget_reports_exit_once() {
        let grid = GridIndex::new(3000.0, 150.0);
        let mut tracker = PresenceTracker::new();
        tracker.observe(&grid, ALICE, WorldPos::new(10.0, 10.0));
        let exit = tracker.forget(ALICE).unwrap();
        assert_eq!(exit.entered, None);
        assert_eq!(exit.left, Some(CellCoord::new(0, 0)));
        assert!(tracker.forget(ALICE).is_none());
        assert!(tracker.tracked().is_empty());
    }

    #[test]
    fn off_map_positions_clamp() {
        let grid = GridIndex::new(3000.0, 150.0);
        let mut tracker = PresenceTracker::new();
        tracker.observe(&grid, ALICE, WorldPos::new(-500.0, 99_999.0));
        assert_eq!(tracker.cell_of(ALICE), Some(CellCoord::new(19, 0)));
    }
}
