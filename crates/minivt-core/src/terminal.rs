//! The terminal engine: parser actions applied to grid state.
//!
//! [`Terminal`] ties the parser, grid, cursor, and dirty tracking together
//! behind the two data paths a host drives:
//!
//! - inbound: [`Terminal::process_input`] consumes PTY output bytes and
//!   returns the rows a renderer must redraw;
//! - outbound: [`Terminal::process_key`] turns a key event into the bytes
//!   to write back to the PTY master.
//!
//! The engine is single-threaded and runs each call to completion; it owns
//! no file descriptors, timers, or threads, so hosts are free to embed it
//! in whatever poll loop they already have.

use tracing::debug;

use crate::cell::{AnsiColor, Cell, CharAttr};
use crate::cursor::Cursor;
use crate::dirty::DirtyLines;
use crate::grid::Grid;
use crate::key::KeyEvent;
use crate::parser::{Action, CsiParams, Parser};

/// Terminal logic engine.
#[derive(Debug, Clone)]
pub struct Terminal {
    grid: Grid,
    cursor: Cursor,
    /// Attribute applied to newly printed cells.
    attr: CharAttr,
    parser: Parser,
    dirty: DirtyLines,
}

impl Terminal {
    /// Create an engine with a blank white-on-black screen.
    ///
    /// Dimensions below 1 are raised to 1.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        let grid = Grid::new(cols, rows);
        let rows = grid.rows();
        Self {
            grid,
            cursor: Cursor::new(),
            attr: CharAttr::default(),
            parser: Parser::new(),
            dirty: DirtyLines::new(rows),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    /// Read-only view of the cell matrix.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cells of one row, or `None` if out of bounds.
    #[must_use]
    pub fn row_cells(&self, row: u16) -> Option<&[Cell]> {
        self.grid.row_cells(row)
    }

    /// Current cursor position.
    ///
    /// The column may equal [`Self::cols`] when a wrap is pending.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Attribute that will be applied to the next printed cell.
    #[must_use]
    pub fn current_attr(&self) -> CharAttr {
        self.attr
    }

    /// Consume a batch of PTY output bytes.
    ///
    /// Returns the rows whose content changed, ascending and without
    /// duplicates, and clears the internal dirty set. Partial escape and
    /// UTF-8 sequences are carried over to the next call.
    pub fn process_input(&mut self, bytes: &[u8]) -> Vec<u16> {
        for action in self.parser.feed(bytes) {
            self.apply(action);
        }
        self.dirty.drain()
    }

    /// Translate a key event into the bytes to write to the PTY master.
    ///
    /// Pure with respect to screen state; combinations with no wire
    /// encoding yield an empty sequence.
    #[must_use]
    pub fn process_key(&self, event: KeyEvent) -> Vec<u8> {
        event.encode()
    }

    /// Resize the screen, preserving the overlapping region.
    ///
    /// The cursor is clamped into the new bounds and every row becomes
    /// dirty. A zero dimension is a host programming error; the call is
    /// ignored and the grid left untouched.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == 0 || rows == 0 {
            debug!(cols, rows, "ignoring resize to zero dimension");
            return;
        }
        self.grid.resize(cols, rows);
        self.cursor.row = self.cursor.row.min(rows - 1);
        self.cursor.col = self.cursor.col.min(cols - 1);
        self.dirty.resize(rows);
        self.dirty.mark_all();
    }

    // ── Action dispatch ─────────────────────────────────────────────

    fn apply(&mut self, action: Action) {
        match action {
            Action::Print(ch) => self.print(ch),
            Action::Bell => {}
            Action::Backspace => self.cursor.move_left(1),
            Action::Tab => self.cursor.col = self.cursor.next_tab_stop(self.cols()),
            Action::Newline | Action::Index => self.linefeed(),
            Action::CarriageReturn => self.cursor.carriage_return(),
            Action::CursorUp(n) => self.cursor.move_up(n),
            Action::CursorDown(n) => self.cursor.move_down(n, self.rows()),
            Action::CursorRight(n) => self.cursor.move_right(n, self.cols()),
            Action::CursorLeft(n) => self.cursor.move_left(n),
            Action::CursorPosition { row, col } => {
                self.cursor.move_to(row, col, self.rows(), self.cols());
            }
            Action::EraseInDisplay(mode) => self.erase_in_display(mode),
            Action::EraseInLine(mode) => self.erase_in_line(mode),
            Action::Sgr(params) => self.apply_sgr(&params),
            Action::ReverseIndex => self.reverse_index(),
            Action::NextLine => {
                self.cursor.carriage_return();
                self.linefeed();
            }
            Action::FullReset => self.full_reset(),
        }
    }

    /// Write one character at the cursor with the current attribute.
    ///
    /// Wrap is deferred: a character printed in the last column leaves the
    /// cursor just past the row edge, and the *next* print wraps first.
    fn print(&mut self, ch: char) {
        if self.cursor.col >= self.cols() {
            self.cursor.carriage_return();
            self.linefeed();
        }
        let (row, col) = (self.cursor.row, self.cursor.col);
        if let Some(cell) = self.grid.cell_mut(row, col) {
            *cell = Cell::with_attr(ch, self.attr);
        }
        self.dirty.mark(row);
        self.cursor.col += 1;
    }

    /// LF: advance one row, scrolling up on the last row.
    ///
    /// The vacated bottom row is filled with default cells (the current
    /// attribute does not bleed into scrolled-in blanks).
    fn linefeed(&mut self) {
        if self.cursor.row + 1 >= self.rows() {
            self.grid.scroll_up(1);
            self.dirty.mark_all();
        } else {
            self.cursor.row += 1;
        }
    }

    /// RI: move up one row, scrolling down on row 0.
    fn reverse_index(&mut self) {
        if self.cursor.row == 0 {
            self.grid.scroll_down(1);
            self.dirty.mark_all();
        } else {
            self.cursor.row -= 1;
        }
    }

    fn erase_in_display(&mut self, mode: u8) {
        match mode {
            0 => {
                self.grid.erase_below(self.cursor.row, self.cursor.col);
                self.dirty.mark_span(self.cursor.row, self.rows());
            }
            1 => {
                self.grid.erase_above(self.cursor.row, self.cursor.col);
                self.dirty.mark_span(0, self.cursor.row + 1);
            }
            2 => {
                self.grid.erase_all();
                self.cursor = Cursor::new();
                self.dirty.mark_all();
            }
            _ => {}
        }
    }

    fn erase_in_line(&mut self, mode: u8) {
        match mode {
            0 => self.grid.erase_line_right(self.cursor.row, self.cursor.col),
            1 => self.grid.erase_line_left(self.cursor.row, self.cursor.col),
            2 => self.grid.erase_line(self.cursor.row),
            _ => return,
        }
        self.dirty.mark(self.cursor.row);
    }

    /// Apply SGR parameters in order; an empty list behaves as reset.
    fn apply_sgr(&mut self, params: &CsiParams) {
        if params.is_empty() {
            self.attr.reset();
            return;
        }
        for &param in params.iter() {
            match param {
                0 => self.attr.reset(),
                30..=37 => {
                    if let Some(color) = AnsiColor::from_index(param - 30) {
                        self.attr.fg = color;
                    }
                }
                39 => self.attr.fg = AnsiColor::White,
                40..=47 => {
                    if let Some(color) = AnsiColor::from_index(param - 40) {
                        self.attr.bg = color;
                    }
                }
                49 => self.attr.bg = AnsiColor::Black,
                // Bold, underline, 256-color introducers, ... are outside
                // the supported repertoire.
                _ => {}
            }
        }
    }

    /// RIS: back to the state of a freshly constructed engine.
    fn full_reset(&mut self) {
        self.attr = CharAttr::default();
        self.cursor = Cursor::new();
        self.grid.erase_all();
        self.dirty.mark_all();
    }
}
