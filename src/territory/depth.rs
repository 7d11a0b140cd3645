use crate::model::grid::CARDINALS;
use crate::model::{CellCoord, GridIndex, GroupId, TerritoryCell};

/// Depth of a cell inside its owner's territory.
///
/// Walks outward in each cardinal direction counting consecutive cells with
/// the same owner (the cell itself excluded) until a different owner or the
/// grid edge, then returns the smallest run minus one. Unowned cells and
/// border cells are depth 0. Cost is O(rows + cols).
pub fn scan_depth(grid: &GridIndex, cells: &[TerritoryCell], coord: CellCoord) -> u32 {
    let Some(owner) = grid
        .slot(coord)
        .and_then(|slot| cells.get(slot))
        .and_then(|c| c.owner)
    else {
        return 0;
    };

    let mut shortest = usize::MAX;
    for dir in CARDINALS {
        let run = run_length(grid, cells, coord, dir, owner);
        if run == 0 {
            return 0;
        }
        shortest = shortest.min(run);
    }
    (shortest - 1) as u32
}

fn run_length(
    grid: &GridIndex,
    cells: &[TerritoryCell],
    from: CellCoord,
    dir: (isize, isize),
    owner: GroupId,
) -> usize {
    let mut run = 0;
    let mut at = from;
    while let Some(next) = grid.step(at, dir) {
        let same_owner = grid
            .slot(next)
            .and_then(|slot| cells.get(slot))
            .is_some_and(|c| c.owner == Some(owner));
        if !same_owner {
            break;
        }
        run += 1;
        at = next;
    }
    run
}
