use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

pub const DEFAULT_CELL_SIZE: f64 = 150.0;

/// Upper bound on cells along one edge. The full grid is kept in memory, so
/// the side is capped to hold at most [`MAX_GRID_CELLS`].
pub const MAX_GRID_SIDE: usize = 2048;
pub const MAX_GRID_CELLS: usize = MAX_GRID_SIDE * MAX_GRID_SIDE;

/// A point on the world plane.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
}

impl WorldPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Discrete grid coordinate. Rows run along `y`, columns along `x`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.col), self.row)
    }
}

/// The four cardinal directions, as `(row delta, col delta)`.
pub const CARDINALS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// Square grid laid over the world. Built once, never resized.
#[derive(Clone, Debug, PartialEq)]
pub struct GridIndex {
    rows: usize,
    cols: usize,
    cell_size: f64,
    origin: WorldPos,
}

impl GridIndex {
    /// Grid covering `[0, world_size)` on both axes.
    pub fn new(world_size: f64, cell_size: f64) -> Self {
        Self::with_origin(world_size, cell_size, WorldPos::default())
    }

    /// Grid whose minimum corner sits at `origin`.
    pub fn with_origin(world_size: f64, cell_size: f64, origin: WorldPos) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        let span = if world_size.is_finite() { world_size.max(0.0) } else { 0.0 };
        let n = ((span / cell_size).ceil() as usize).clamp(1, MAX_GRID_SIDE);
        Self {
            rows: n,
            cols: n,
            cell_size,
            origin,
        }
    }

    /// Grid centred on the world origin, as maps with signed coordinates use.
    pub fn centered(world_size: f64, cell_size: f64) -> Self {
        let half = world_size / 2.0;
        Self::with_origin(world_size, cell_size, WorldPos::new(-half, -half))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Row-major slot of an in-bounds coordinate.
    pub fn slot(&self, coord: CellCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.row * self.cols + coord.col)
    }

    pub fn coord_of_slot(&self, slot: usize) -> CellCoord {
        CellCoord::new(slot / self.cols, slot % self.cols)
    }

    /// Resolve a world position to its cell. Off-map positions clamp to the
    /// nearest edge cell.
    pub fn position_to_cell(&self, pos: WorldPos) -> CellCoord {
        let col = clamp_axis((pos.x - self.origin.x) / self.cell_size, self.cols);
        let row = clamp_axis((pos.y - self.origin.y) / self.cell_size, self.rows);
        CellCoord::new(row, col)
    }

    /// Centre point of a cell.
    pub fn cell_to_position(&self, coord: CellCoord) -> WorldPos {
        WorldPos::new(
            self.origin.x + (coord.col as f64 + 0.5) * self.cell_size,
            self.origin.y + (coord.row as f64 + 0.5) * self.cell_size,
        )
    }

    pub fn cell_id(&self, coord: CellCoord) -> String {
        coord.to_string()
    }

    /// Parse an id such as `"AB12"` back into an in-bounds coordinate.
    pub fn parse_cell_id(&self, id: &str) -> Result<CellCoord, GridError> {
        let malformed = || GridError::MalformedId(id.to_string());
        let split = id
            .find(|c: char| !c.is_ascii_uppercase())
            .ok_or_else(malformed)?;
        let (letters, digits) = id.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }
        let col = parse_column_label(letters).ok_or_else(malformed)?;
        let row: usize = digits.parse().map_err(|_| malformed())?;
        let coord = CellCoord::new(row, col);
        if !self.contains(coord) {
            return Err(GridError::OutOfBounds {
                id: id.to_string(),
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(coord)
    }

    /// Step from `coord` by a cardinal delta, `None` past the edge.
    pub fn step(&self, coord: CellCoord, (dr, dc): (isize, isize)) -> Option<CellCoord> {
        let row = coord.row.checked_add_signed(dr)?;
        let col = coord.col.checked_add_signed(dc)?;
        let next = CellCoord::new(row, col);
        self.contains(next).then_some(next)
    }

    /// In-bounds cardinal neighbours (2 to 4 of them).
    pub fn neighbors(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        CARDINALS.iter().filter_map(move |&d| self.step(coord, d))
    }

    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.len()).map(|slot| self.coord_of_slot(slot))
    }
}

fn clamp_axis(scaled: f64, len: usize) -> usize {
    if !scaled.is_finite() {
        return if scaled == f64::INFINITY { len - 1 } else { 0 };
    }
    let idx = scaled.floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(len - 1)
    }
}

/// Bijective base-26 label: 0 → A, 25 → Z, 26 → AA, 27 → AB.
pub fn column_label(col: usize) -> String {
    let mut n = col + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn parse_column_label(letters: &str) -> Option<usize> {
    let mut n: usize = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return None;
        }
        n = n.checked_mul(26)?.checked_add((b - b'A') as usize + 1)?;
    }
    n.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_round_up() {
        assert_eq!(GridIndex::new(3000.0, 150.0).rows(), 20);
        assert_eq!(GridIndex::new(3001.0, 150.0).cols(), 21);
        assert_eq!(GridIndex::new(0.0, 150.0).len(), 1);
    }

    #[test]
    fn column_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn column_labels_parse_back() {
        for col in [0, 1, 25, 26, 51, 52, 701, 702, 1000] {
            assert_eq!(parse_column_label(&column_label(col)), Some(col));
        }
    }

    #[test]
    fn cell_ids() {
        let grid = GridIndex::new(3000.0, 150.0);
        assert_eq!(grid.cell_id(CellCoord::new(0, 0)), "A0");
        assert_eq!(grid.cell_id(CellCoord::new(12, 3)), "D12");
        assert_eq!(grid.parse_cell_id("D12"), Ok(CellCoord::new(12, 3)));
        assert_eq!(grid.parse_cell_id("T19"), Ok(CellCoord::new(19, 19)));
    }

    #[test]
    fn bad_cell_ids_are_rejected() {
        let grid = GridIndex::new(3000.0, 150.0);
        assert!(matches!(grid.parse_cell_id(""), Err(GridError::MalformedId(_))));
        assert!(matches!(grid.parse_cell_id("12"), Err(GridError::MalformedId(_))));
        assert!(matches!(grid.parse_cell_id("A"), Err(GridError::MalformedId(_))));
        assert!(matches!(grid.parse_cell_id("a1"), Err(GridError::MalformedId(_))));
        assert!(matches!(grid.parse_cell_id("A1x"), Err(GridError::MalformedId(_))));
        assert!(matches!(
            grid.parse_cell_id("U0"),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.parse_cell_id("A20"),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn positions_resolve_by_floor_division() {
        let grid = GridIndex::new(3000.0, 150.0);
        assert_eq!(grid.position_to_cell(WorldPos::new(0.0, 0.0)), CellCoord::new(0, 0));
        assert_eq!(grid.position_to_cell(WorldPos::new(149.9, 0.0)), CellCoord::new(0, 0));
        assert_eq!(grid.position_to_cell(WorldPos::new(150.0, 0.0)), CellCoord::new(0, 1));
        assert_eq!(grid.position_to_cell(WorldPos::new(10.0, 455.0)), CellCoord::new(3, 0));
    }

    #[test]
    fn off_map_positions_clamp_to_edge() {
        let grid = GridIndex::new(3000.0, 150.0);
        assert_eq!(
            grid.position_to_cell(WorldPos::new(-500.0, -1.0)),
            CellCoord::new(0, 0)
        );
        assert_eq!(
            grid.position_to_cell(WorldPos::new(99_999.0, 4000.0)),
            CellCoord::new(19, 19)
        );
        assert_eq!(
            grid.position_to_cell(WorldPos::new(f64::NAN, f64::INFINITY)),
            CellCoord::new(19, 0)
        );
    }

    #[test]
    fn centered_grid_resolves_signed_positions() {
        let grid = GridIndex::centered(3000.0, 150.0);
        assert_eq!(
            grid.position_to_cell(WorldPos::new(-1500.0, -1500.0)),
            CellCoord::new(0, 0)
        );
        assert_eq!(grid.position_to_cell(WorldPos::new(0.0, 0.0)), CellCoord::new(10, 10));
        assert_eq!(grid.cell_to_position(CellCoord::new(0, 0)), WorldPos::new(-1425.0, -1425.0));
    }

    #[test]
    fn centre_round_trips_every_cell() {
        let grid = GridIndex::new(3000.0, 150.0);
        for coord in grid.coords() {
            assert_eq!(grid.position_to_cell(grid.cell_to_position(coord)), coord);
        }
    }

    #[test]
    fn corner_cells_have_two_neighbors() {
        let grid = GridIndex::new(3000.0, 150.0);
        assert_eq!(grid.neighbors(CellCoord::new(0, 0)).count(), 2);
        assert_eq!(grid.neighbors(CellCoord::new(0, 5)).count(), 3);
        assert_eq!(grid.neighbors(CellCoord::new(5, 5)).count(), 4);
        assert_eq!(grid.neighbors(CellCoord::new(19, 19)).count(), 2);
    }

    #[test]
    fn oversized_worlds_are_capped() {
        let grid = GridIndex::new(1.0e12, 1.0);
        assert_eq!(grid.rows(), MAX_GRID_SIDE);
        assert_eq!(grid.len(), MAX_GRID_CELLS);
    }
}
