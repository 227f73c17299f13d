//! Grid-backed screen: the reference [`RenderBackend`] implementation.
//!
//! The screen owns the cell grid, the cursor, and the current rendition,
//! and implements the write-one-byte semantics of the terminal model:
//! control-byte handling (`\n`, `\r`, `\b`, `\t`), wrap normalization, and
//! the full-grid scroll. It also keeps the cursor-indicator bookkeeping
//! (visibility toggle plus a counter-driven blink phase) so that a pixel
//! host only has to redraw the cell under the cursor when told to.
//!
//! # Invariants
//!
//! - `cursor_x < cols` and `cursor_y < rows` after every operation; a write
//!   may push the column to `cols` transiently, but wrap normalization runs
//!   before the call returns.
//! - Untouched cells (glyph 0) are never produced by writes — only by
//!   construction and `clear_screen`. Scroll fills and erases produce real
//!   spaces in the current colors.

use crate::backend::RenderBackend;
use crate::cell::{Cell, DEFAULT_BG, DEFAULT_FG, StyleFlags};
use crate::grid::Grid;

/// Columns per tab stop.
pub const TAB_WIDTH: u16 = 8;

/// Poll cycles between cursor-indicator blink flips.
///
/// The tick is a counter, not wall-clock time; the host calls
/// [`Screen::tick`] once per poll cycle.
pub const DEFAULT_BLINK_INTERVAL: u32 = 400_000;

/// Grid, cursor, and rendition state behind the render-backend contract.
#[derive(Debug, Clone)]
pub struct Screen {
    grid: Grid,
    cursor_x: u16,
    cursor_y: u16,
    fg: u8,
    bg: u8,
    flags: StyleFlags,
    cursor_visible: bool,
    blink_interval: u32,
    blink_ticks: u32,
    blink_hidden: bool,
}

impl Screen {
    /// Create a screen with default rendition and a visible cursor.
    ///
    /// # Panics
    ///
    /// Panics if `cols == 0` or `rows == 0`.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        assert!(cols > 0, "cols must be > 0");
        assert!(rows > 0, "rows must be > 0");
        Self {
            grid: Grid::new(cols, rows),
            cursor_x: 0,
            cursor_y: 0,
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            flags: StyleFlags::empty(),
            cursor_visible: true,
            blink_interval: DEFAULT_BLINK_INTERVAL,
            blink_ticks: 0,
            blink_hidden: false,
        }
    }

    /// Create a screen with an explicit blink interval (poll cycles per flip).
    #[must_use]
    pub fn with_blink_interval(cols: u16, rows: u16, interval: u32) -> Self {
        let mut screen = Self::new(cols, rows);
        screen.blink_interval = interval.max(1);
        screen
    }

    /// Grid width in cells.
    #[must_use]
    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    /// Grid height in cells.
    #[must_use]
    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    /// The underlying grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.grid.cell(x, y)
    }

    /// Current rendition `(fg, bg)`.
    #[must_use]
    pub fn rendition(&self) -> (u8, u8) {
        (self.fg, self.bg)
    }

    /// Current style flags applied to written glyphs.
    #[must_use]
    pub fn style_flags(&self) -> StyleFlags {
        self.flags
    }

    /// Toggle the cursor indicator on or off entirely.
    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    /// Whether the cursor indicator is enabled.
    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Whether the cell under the cursor should currently be drawn inverted.
    #[must_use]
    pub fn cursor_indicator_on(&self) -> bool {
        self.cursor_visible && !self.blink_hidden
    }

    /// Advance the idle counter by one poll cycle.
    ///
    /// Returns `true` when the blink phase flipped, i.e. the host should
    /// redraw the cell under the cursor.
    pub fn tick(&mut self) -> bool {
        self.blink_ticks += 1;
        if self.blink_ticks >= self.blink_interval {
            self.blink_ticks = 0;
            self.blink_hidden = !self.blink_hidden;
            self.cursor_visible
        } else {
            false
        }
    }

    /// Writes force the indicator back to its steady (non-blinked) state so
    /// a stale inverted cell never survives a glyph update.
    fn reset_blink(&mut self) {
        self.blink_ticks = 0;
        self.blink_hidden = false;
    }

    fn put(&mut self, x: u16, y: u16, glyph: u8, flags: StyleFlags) {
        self.grid.set(x, y, Cell::new(glyph, self.fg, self.bg, flags));
    }

    /// Wrap the column and scroll when the cursor ran past an edge.
    fn normalize(&mut self) {
        if self.cursor_x >= self.cols() {
            self.cursor_x = 0;
            self.cursor_y += 1;
        }
        if self.cursor_y >= self.rows() {
            self.grid.scroll_up(Cell::blank(self.fg, self.bg));
            self.cursor_y = self.rows() - 1;
        }
    }
}

impl RenderBackend for Screen {
    fn write(&mut self, byte: u8) {
        self.reset_blink();
        match byte {
            b'\n' => {
                // Blank the remainder of the line in the current rendition
                // before moving on; a later scroll must not resurrect stale
                // glyphs to the right of the break.
                for x in self.cursor_x..self.cols() {
                    self.put(x, self.cursor_y, b' ', self.flags);
                }
                self.cursor_x = 0;
                self.cursor_y += 1;
            }
            b'\r' => {
                self.cursor_x = 0;
            }
            0x08 => {
                // Clamped at column 0: no wrap to the previous line.
                if self.cursor_x > 0 {
                    self.cursor_x -= 1;
                    self.put(self.cursor_x, self.cursor_y, b' ', self.flags);
                }
            }
            b'\t' => {
                self.cursor_x = (self.cursor_x + TAB_WIDTH) & !(TAB_WIDTH - 1);
            }
            _ => {
                self.put(self.cursor_x, self.cursor_y, byte, self.flags);
                self.cursor_x += 1;
            }
        }
        self.normalize();
    }

    fn set_rendition(&mut self, fg: u8, bg: u8, flags: StyleFlags) {
        self.fg = fg;
        self.bg = bg;
        self.flags = flags;
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor_x = x.min(self.cols() - 1);
        self.cursor_y = y.min(self.rows() - 1);
    }

    fn cursor_x(&self) -> u16 {
        self.cursor_x
    }

    fn cursor_y(&self) -> u16 {
        self.cursor_y
    }

    fn set_cell(&mut self, x: u16, y: u16, glyph: u8) {
        self.grid
            .set(x, y, Cell::new(glyph, self.fg, self.bg, StyleFlags::empty()));
    }

    fn clear_screen(&mut self) {
        self.grid.clear();
        self.cursor_x = 0;
        self.cursor_y = 0;
    }
}
