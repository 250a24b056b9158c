use std::path::Path;

use crate::error::MapError;

/// Passable cell
pub const EMPTY: u8 = 0;
/// Plain wall, also returned for every query outside the map
pub const WALL: u8 = 1;
/// Distinguished ("colored") wall
pub const COLORED_WALL: u8 = 2;

/// Ray probes sample one unit back from a crossing line, so a tile must be
/// wider than that for the probe to land in the adjacent cell.
pub const MIN_TILE_LEN: f32 = 1.0;

/// Tag carried by a wall hit for shading downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallKind {
    #[default]
    Plain,
    Colored,
}

impl WallKind {
    /// Any occupied code other than the distinguished one renders as plain.
    #[inline]
    pub fn from_code(code: u8) -> Self {
        if code == COLORED_WALL {
            WallKind::Colored
        } else {
            WallKind::Plain
        }
    }
}

/// Immutable tile map. Rows are stored row-major; every row has `cols` cells.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<u8>,
    rows: usize,
    cols: usize,
    tile_len: f32,
}

const DEFAULT_LAYOUT: [[u8; 15]; 11] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 2, 0, 0, 0, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

impl Grid {
    pub fn from_rows(rows: Vec<Vec<u8>>, tile_len: f32) -> Result<Self, MapError> {
        if !(tile_len > MIN_TILE_LEN) {
            return Err(MapError::TileTooSmall(tile_len));
        }
        let expected = match rows.first() {
            None => return Err(MapError::Empty),
            Some(first) if first.is_empty() => return Err(MapError::EmptyRow(0)),
            Some(first) => first.len(),
        };

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row, line) in rows.iter().enumerate() {
            if line.len() != expected {
                return Err(MapError::Ragged {
                    row,
                    expected,
                    found: line.len(),
                });
            }
            cells.extend_from_slice(line);
        }

        Ok(Self {
            cells,
            rows: rows.len(),
            cols: expected,
            tile_len,
        })
    }

    /// The built-in 11x15 layout with a single distinguished wall at (8, 5).
    pub fn default_layout(tile_len: f32) -> Self {
        Self {
            cells: DEFAULT_LAYOUT.iter().flatten().copied().collect(),
            rows: DEFAULT_LAYOUT.len(),
            cols: DEFAULT_LAYOUT[0].len(),
            tile_len,
        }
    }

    /// Parse the map text format: one row per line, one digit per cell.
    /// Spaces, tabs and commas separate cells; `#` starts a comment line.
    pub fn parse(text: &str, tile_len: f32) -> Result<Self, MapError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = rows.len();
            let mut cells = Vec::with_capacity(line.len());
            for ch in line.chars().filter(|c| !matches!(c, ' ' | '\t' | ',')) {
                let code = ch.to_digit(10).ok_or(MapError::InvalidCell {
                    row,
                    col: cells.len(),
                    found: ch,
                })?;
                cells.push(code as u8);
            }
            if cells.is_empty() {
                return Err(MapError::EmptyRow(row));
            }
            rows.push(cells);
        }
        Self::from_rows(rows, tile_len)
    }

    pub fn load(path: &Path, tile_len: f32) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, tile_len)
    }

    /// Cell code at world position `(x, y)`. Anything outside
    /// `[0, width) x [0, height)` reads as `WALL`, which bounds every search.
    #[inline]
    pub fn has_wall_at(&self, x: f32, y: f32) -> u8 {
        if !(x >= 0.0 && x < self.world_width() && y >= 0.0 && y < self.world_height()) {
            return WALL;
        }
        let row = (y / self.tile_len).floor() as usize;
        let col = (x / self.tile_len).floor() as usize;
        self.cell(row, col).unwrap_or(WALL)
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn tile_len(&self) -> f32 {
        self.tile_len
    }

    #[inline]
    pub fn world_width(&self) -> f32 {
        self.cols as f32 * self.tile_len
    }

    #[inline]
    pub fn world_height(&self) -> f32 {
        self.rows as f32 * self.tile_len
    }

    /// Centre of the map in world units
    pub fn center(&self) -> [f32; 2] {
        [self.world_width() * 0.5, self.world_height() * 0.5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_dimensions() {
        let grid = Grid::default_layout(64.0);
        assert_eq!(grid.rows(), 11);
        assert_eq!(grid.cols(), 15);
        assert_eq!(grid.world_width(), 960.0);
        assert_eq!(grid.world_height(), 704.0);
        assert_eq!(grid.cell(8, 5), Some(COLORED_WALL));
    }

    #[test]
    fn test_has_wall_at_maps_world_to_cell() {
        let grid = Grid::default_layout(64.0);
        // (row 1, col 1) is open
        assert_eq!(grid.has_wall_at(96.0, 96.0), EMPTY);
        // (row 8, col 5) is the distinguished wall
        assert_eq!(grid.has_wall_at(5.0 * 64.0 + 1.0, 8.0 * 64.0 + 1.0), COLORED_WALL);
        // (row 2, col 5) is plain
        assert_eq!(grid.has_wall_at(5.0 * 64.0, 2.0 * 64.0), WALL);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let grid = Grid::from_rows(vec![vec![0, 0], vec![0, 0]], 10.0).unwrap();
        assert_eq!(grid.has_wall_at(5.0, 5.0), EMPTY);
        assert_eq!(grid.has_wall_at(-0.01, 5.0), WALL);
        assert_eq!(grid.has_wall_at(5.0, -0.01), WALL);
        assert_eq!(grid.has_wall_at(20.0, 5.0), WALL);
        assert_eq!(grid.has_wall_at(5.0, 20.0), WALL);
        assert_eq!(grid.has_wall_at(f32::NAN, 5.0), WALL);
    }

    #[test]
    fn test_rejects_ragged_and_empty() {
        assert!(matches!(Grid::from_rows(vec![], 64.0), Err(MapError::Empty)));
        assert!(matches!(
            Grid::from_rows(vec![vec![]], 64.0),
            Err(MapError::EmptyRow(0))
        ));
        let err = Grid::from_rows(vec![vec![1, 1, 1], vec![1, 1]], 64.0).unwrap_err();
        assert!(matches!(
            err,
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_rejects_tile_within_probe_nudge() {
        for tile in [1.0, 0.5, 0.0, f32::NAN] {
            let err = Grid::parse("111\n101\n101\n111\n", tile).unwrap_err();
            assert!(matches!(err, MapError::TileTooSmall(_)), "tile {tile}");
        }
        assert!(Grid::parse("111\n101\n111\n", 1.5).is_ok());
    }

    #[test]
    fn test_parse_text_map() {
        let text = "# room\n1 1 1 1\n1,0,2,1\n\n1111\n";
        let grid = Grid::parse(text, 32.0).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.cell(1, 1), Some(EMPTY));
        assert_eq!(grid.cell(1, 2), Some(COLORED_WALL));
    }

    #[test]
    fn test_parse_reports_bad_cell() {
        let err = Grid::parse("111\n1x1\n111\n", 64.0).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidCell {
                row: 1,
                col: 1,
                found: 'x'
            }
        ));
    }

    #[test]
    fn test_wall_kind_from_code() {
        assert_eq!(WallKind::from_code(WALL), WallKind::Plain);
        assert_eq!(WallKind::from_code(COLORED_WALL), WallKind::Colored);
        assert_eq!(WallKind::from_code(7), WallKind::Plain);
    }
}
