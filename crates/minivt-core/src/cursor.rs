//! Cursor position and clamped motion.
//!
//! Coordinates are zero-based with the origin at top-left. The column may
//! momentarily equal the grid width to represent "about to wrap": the next
//! printed character wraps to the start of the following line first. All
//! motion operations clamp back into the grid.

/// Cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Row (0-indexed), always `< rows`.
    pub row: u16,
    /// Column (0-indexed), `<= cols`; equal to `cols` when a wrap is pending.
    pub col: u16,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { row: 0, col: 0 }
    }

    /// CUU: move up, clamped at the top row.
    pub fn move_up(&mut self, count: u16) {
        self.row = self.row.saturating_sub(count);
    }

    /// CUD: move down, clamped at the bottom row.
    pub fn move_down(&mut self, count: u16, rows: u16) {
        self.row = self
            .row
            .saturating_add(count)
            .min(rows.saturating_sub(1));
    }

    /// CUF: move right, clamped at the last column.
    ///
    /// Also resolves a pending wrap: the cursor lands inside the row.
    pub fn move_right(&mut self, count: u16, cols: u16) {
        self.col = self
            .col
            .saturating_add(count)
            .min(cols.saturating_sub(1));
    }

    /// CUB: move left, clamped at column 0.
    pub fn move_left(&mut self, count: u16) {
        self.col = self.col.saturating_sub(count);
    }

    /// CUP: absolute move, both coordinates clamped into the grid.
    pub fn move_to(&mut self, row: u16, col: u16, rows: u16, cols: u16) {
        self.row = row.min(rows.saturating_sub(1));
        self.col = col.min(cols.saturating_sub(1));
    }

    /// CR: return to column 0.
    pub fn carriage_return(&mut self) {
        self.col = 0;
    }

    /// HT target: next multiple of 8, clamped to the last column.
    ///
    /// Tab stops are fixed every 8 columns; HTS/TBC are not supported.
    #[must_use]
    pub fn next_tab_stop(&self, cols: u16) -> u16 {
        ((self.col / 8) + 1)
            .saturating_mul(8)
            .min(cols.saturating_sub(1))
    }
}
