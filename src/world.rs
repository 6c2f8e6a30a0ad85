use std::fs;
use std::path::Path;

/// Cell tag: 0 is open floor, anything else is a wall material.
pub type Cell = u8;

pub const EMPTY: Cell = 0;

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("map has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {col}: '{ch}' is not a cell digit")]
    BadCell { row: usize, col: usize, ch: char },
    #[error("failed to read map: {0}")]
    Io(#[from] std::io::Error),
}

/// Rectangular tile map. Immutable once built.
#[derive(Clone, Debug)]
pub struct WorldGrid {
    cells: Vec<Cell>, // row-major, width * height
    width: usize,
    height: usize,
    tile_size: f32,
}

const DEFAULT_MAP: [[Cell; 15]; 10] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 1, 1, 1, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

impl WorldGrid {
    pub fn from_rows(rows: Vec<Vec<Cell>>, tile_size: f32) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            cells.extend(r);
        }
        Ok(Self {
            cells,
            width,
            height,
            tile_size,
        })
    }

    /// Parses a digit map: one row per non-blank line, whitespace ignored.
    pub fn parse(text: &str, tile_size: f32) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let row_idx = rows.len();
            let mut row = Vec::new();
            for (col, ch) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
                let tag = ch.to_digit(10).ok_or(GridError::BadCell {
                    row: row_idx,
                    col,
                    ch,
                })?;
                row.push(tag as Cell);
            }
            rows.push(row);
        }
        Self::from_rows(rows, tile_size)
    }

    pub fn load(path: impl AsRef<Path>, tile_size: f32) -> Result<Self, GridError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, tile_size)
    }

    /// The stock 15x10 layout.
    pub fn default_map(tile_size: f32) -> Self {
        Self {
            cells: DEFAULT_MAP.iter().flatten().copied().collect(),
            width: DEFAULT_MAP[0].len(),
            height: DEFAULT_MAP.len(),
            tile_size,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Cell indices containing a world point, or `None` outside the grid.
    pub fn cell_of(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let cx = (x / self.tile_size).floor() as usize;
        let cy = (y / self.tile_size).floor() as usize;
        (cx < self.width && cy < self.height).then_some((cx, cy))
    }

    /// True for any point outside the grid or inside a non-empty cell.
    pub fn wall_at(&self, x: f32, y: f32) -> bool {
        match self.cell_of(x, y) {
            Some((cx, cy)) => self.material_at(cx, cy) != EMPTY,
            None => true,
        }
    }

    /// Tag of an in-bounds cell. Out-of-range indices read as `EMPTY`;
    /// use `is_solid_cell` when the indices may leave the grid.
    #[inline]
    pub fn material_at(&self, cx: usize, cy: usize) -> Cell {
        if cx < self.width && cy < self.height {
            self.cells[cy * self.width + cx]
        } else {
            EMPTY
        }
    }

    /// Signed cell lookup used while stepping rays; outside is solid.
    #[inline]
    pub fn is_solid_cell(&self, cx: i64, cy: i64) -> bool {
        if cx < 0 || cy < 0 || cx as usize >= self.width || cy as usize >= self.height {
            return true;
        }
        self.material_at(cx as usize, cy as usize) != EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_matches_layout() {
        let g = WorldGrid::default_map(32.0);
        assert_eq!((g.width(), g.height()), (15, 10));
        assert_eq!(g.material_at(0, 0), 1);
        assert_eq!(g.material_at(1, 1), 0);
        assert_eq!(g.material_at(8, 2), 1);
    }

    #[test]
    fn wall_at_converts_by_tile_size() {
        let g = WorldGrid::default_map(32.0);
        assert!(!g.wall_at(40.0, 40.0));
        assert!(g.wall_at(31.9, 40.0));
        assert!(g.wall_at(100.0, 40.0)); // cell (3, 1)
    }

    #[test]
    fn outside_is_wall() {
        let g = WorldGrid::default_map(32.0);
        assert!(g.wall_at(-0.01, 40.0));
        assert!(g.wall_at(40.0, -5.0));
        assert!(g.wall_at(15.0 * 32.0, 40.0));
        assert!(g.wall_at(40.0, 10.0 * 32.0));
        assert!(g.wall_at(f32::NAN, 40.0));
        assert!(g.is_solid_cell(-1, 1));
        assert!(g.is_solid_cell(15, 1));
        assert!(!g.is_solid_cell(1, 1));
    }

    #[test]
    fn parse_reads_digits_and_skips_blank_lines() {
        let g = WorldGrid::parse("111\n\n1 0 1\n121\n", 16.0).unwrap();
        assert_eq!((g.width(), g.height()), (3, 3));
        assert_eq!(g.material_at(1, 1), 0);
        assert_eq!(g.material_at(1, 2), 2);
        assert_eq!(g.tile_size(), 16.0);
    }

    #[test]
    fn parse_rejects_ragged_and_garbage() {
        assert!(matches!(
            WorldGrid::parse("111\n10\n", 32.0),
            Err(GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            WorldGrid::parse("1x1\n", 32.0),
            Err(GridError::BadCell { row: 0, col: 1, ch: 'x' })
        ));
        assert!(matches!(WorldGrid::parse("\n \n", 32.0), Err(GridError::Empty)));
    }
}
