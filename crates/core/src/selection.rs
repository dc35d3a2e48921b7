use serde::{Deserialize, Serialize};

use crate::coord::{Coord, Shape};

/// A rectangular block of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Block {
    /// Create a new block, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Check if this block contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }
}

/// One part of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Cell { row: usize, col: usize },
    Block(Block),
    /// Every column of the given rows.
    Rows(Vec<usize>),
    /// Every row of the given columns.
    Cols(Vec<usize>),
}

impl Region {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        match self {
            Region::Cell { row: r, col: c } => *r == row && *c == col,
            Region::Block(block) => block.contains(row, col),
            Region::Rows(rows) => rows.contains(&row),
            Region::Cols(cols) => cols.contains(&col),
        }
    }

    /// Cells of this region that fall inside a `rows` x `cols` grid (row-major).
    fn cells(&self, rows: usize, cols: usize) -> Vec<(usize, usize)> {
        match self {
            Region::Cell { row, col } => {
                if *row < rows && *col < cols { vec![(*row, *col)] } else { Vec::new() }
            }
            Region::Block(b) => {
                if b.start_row >= rows || b.start_col >= cols {
                    return Vec::new();
                }
                let (start_col, end_col) = (b.start_col, b.end_col.min(cols - 1));
                (b.start_row..=b.end_row.min(rows - 1))
                    .flat_map(|r| (start_col..=end_col).map(move |c| (r, c)))
                    .collect()
            }
            Region::Rows(selected) => selected
                .iter()
                .copied()
                .filter(|&r| r < rows)
                .flat_map(|r| (0..cols).map(move |c| (r, c)))
                .collect(),
            Region::Cols(selected) => {
                let in_bounds: Vec<usize> = selected.iter().copied().filter(|&c| c < cols).collect();
                (0..rows)
                    .flat_map(|r| in_bounds.iter().map(move |&c| (r, c)))
                    .collect()
            }
        }
    }
}

/// A set of cells on the row/column plane, built from cells, blocks, whole rows
/// and whole columns. Only the first two axes of a coordinate take part in
/// membership, so a selection covers the same cells on every table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    regions: Vec<Region>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection of a single cell.
    pub fn cell(row: usize, col: usize) -> Self {
        Self { regions: vec![Region::Cell { row, col }] }
    }

    /// Selection of a rectangular block.
    pub fn block(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self { regions: vec![Region::Block(Block::new(r1, c1, r2, c2))] }
    }

    /// Selection of entire rows.
    pub fn rows(rows: impl IntoIterator<Item = usize>) -> Self {
        Self { regions: vec![Region::Rows(rows.into_iter().collect())] }
    }

    /// Selection of entire columns.
    pub fn cols(cols: impl IntoIterator<Item = usize>) -> Self {
        Self { regions: vec![Region::Cols(cols.into_iter().collect())] }
    }

    /// Add another region (ctrl+click).
    pub fn with(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Check if a cell is selected.
    pub fn contains_cell(&self, row: usize, col: usize) -> bool {
        self.regions.iter().any(|r| r.contains(row, col))
    }

    /// Check if a coordinate is selected. Coordinates with fewer than two axes never are.
    pub fn contains(&self, coord: &Coord) -> bool {
        coord.row_col().is_some_and(|(row, col)| self.contains_cell(row, col))
    }

    /// Iterate over the selected cells that lie inside `shape`, in row-major
    /// order without duplicates. Rows and columns are bounded by the shape.
    pub fn cells(&self, shape: &Shape) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rows = shape.bound(0).unwrap_or(0);
        let cols = shape.bound(1).unwrap_or(0);

        let mut cells: Vec<(usize, usize)> =
            self.regions.iter().flat_map(|r| r.cells(rows, cols)).collect();
        cells.sort_unstable();
        cells.dedup();
        cells.into_iter()
    }
}

impl From<Block> for Selection {
    fn from(block: Block) -> Self {
        Self { regions: vec![Region::Block(block)] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_normalizes() {
        let b = Block::new(5, 5, 1, 1);
        assert_eq!(b.start_row, 1);
        assert_eq!(b.start_col, 1);
        assert_eq!(b.end_row, 5);
        assert_eq!(b.end_col, 5);
    }

    #[test]
    fn test_cell_selection() {
        let sel = Selection::cell(5, 3);
        assert!(sel.contains(&Coord::from([5, 3, 0])));
        assert!(sel.contains(&Coord::from([5, 3, 2]))); // any table
        assert!(!sel.contains(&Coord::from([5, 4, 0])));
    }

    #[test]
    fn test_block_selection() {
        let sel = Selection::block(1, 1, 3, 2);
        assert!(sel.contains_cell(1, 1));
        assert!(sel.contains_cell(2, 2));
        assert!(sel.contains_cell(3, 1));
        assert!(!sel.contains_cell(0, 0));
        assert!(!sel.contains_cell(3, 3));
    }

    #[test]
    fn test_row_and_column_selection() {
        let rows = Selection::rows([2, 4]);
        assert!(rows.contains_cell(2, 999));
        assert!(!rows.contains_cell(3, 0));

        let cols = Selection::cols([7]);
        assert!(cols.contains_cell(123, 7));
        assert!(!cols.contains_cell(0, 6));
    }

    #[test]
    fn test_short_coord_never_contained() {
        assert!(!Selection::rows([0]).contains(&Coord::from([0])));
    }

    #[test]
    fn test_combined_selection_iterates_once_per_cell() {
        let sel = Selection::block(0, 0, 1, 1).with(Region::Cell { row: 1, col: 1 });
        let cells: Vec<_> = sel.cells(&Shape::from([10, 10, 1])).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_cells_bounded_by_shape() {
        let shape = Shape::from([3, 2, 1]);
        let cols: Vec<_> = Selection::cols([1, 5]).cells(&shape).collect();
        assert_eq!(cols, vec![(0, 1), (1, 1), (2, 1)]);

        let block: Vec<_> = Selection::block(1, 1, 8, 8).cells(&shape).collect();
        assert_eq!(block, vec![(1, 1), (2, 1)]);
    }
}
