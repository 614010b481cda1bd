use super::types::{Cell, Position};

/// Row-major cell sequence with a fixed width. The last row may be short;
/// it is never padded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
}

impl Grid {
    pub fn new(cells: Vec<Cell>, width: usize) -> Self {
        debug_assert!(width > 0);
        Self { cells, width }
    }

    pub fn from_values(values: &[i8], width: usize) -> Self {
        Self::new(values.iter().map(|&v| Cell::from_raw(v)).collect(), width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn raw_values(&self) -> Vec<i8> {
        self.cells.iter().map(|c| c.raw()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.cells.len().div_ceil(self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Linear indices of column `col` (0-based), top to bottom. A short last
    /// row simply contributes nothing past its end.
    pub fn column_indices(&self, col: usize) -> impl Iterator<Item = usize> {
        let len = self.cells.len();
        let start = if col < self.width { col } else { len };
        (start..len).step_by(self.width)
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if pos.col == 0 || pos.row == 0 || pos.col > self.width {
            return None;
        }
        let index = (pos.row - 1)
            .checked_mul(self.width)?
            .checked_add(pos.col - 1)?;
        (index < self.cells.len()).then_some(index)
    }

    pub fn position_of(&self, index: usize) -> Position {
        Position::new(index % self.width + 1, index / self.width + 1)
    }

    pub fn active_values(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells
            .iter()
            .filter(|c| c.is_active())
            .map(|c| c.value())
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_active()).count()
    }

    pub(crate) fn consume(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.consume();
        }
    }

    /// Drops every row whose cells are all consumed and returns how many
    /// went.
    pub(crate) fn remove_consumed_rows(&mut self) -> usize {
        let before = self.row_count();
        let kept: Vec<Cell> = self
            .cells
            .chunks(self.width)
            .filter(|row| row.iter().any(|c| c.is_active()))
            .flatten()
            .copied()
            .collect();
        self.cells = kept;
        before - self.row_count()
    }

    /// Appends a copy of every active cell, in reading order. Returns the
    /// number of cells added.
    pub(crate) fn append_active_copies(&mut self) -> usize {
        let copies: Vec<Cell> = self.cells.iter().filter(|c| c.is_active()).copied().collect();
        let added = copies.len();
        self.cells.extend(copies);
        added
    }
}
