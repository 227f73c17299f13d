//! Terminal cell: the fundamental unit of the grid.
//!
//! Each cell stores one glyph byte plus the rendition it was written with.
//! A glyph of zero marks a cell that has never been written; such cells
//! always render as a space in the default colors, regardless of whatever
//! stale color bytes they still carry from earlier reuse.

use bitflags::bitflags;

/// Default foreground color index (light grey in the standard palette).
pub const DEFAULT_FG: u8 = 7;
/// Default background color index (the 256-color palette's black, not the
/// dimmer named black at index 0).
pub const DEFAULT_BG: u8 = 16;

bitflags! {
    /// Style attribute flags carried by a cell and by the current rendition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD             = 1 << 0;
        const UNDERLINE        = 1 << 1;
        const ITALIC           = 1 << 2;
        /// Glyph should be drawn with the alternate (CJK) font face.
        const ALT_FONT         = 1 << 3;
        const DOUBLE_UNDERLINE = 1 << 4;
        const OVERLINE         = 1 << 5;
        /// Glyph occupies two columns.
        const WIDE             = 1 << 6;
        const STRIKETHROUGH    = 1 << 7;
    }
}

/// A single cell in the terminal grid.
///
/// `glyph == 0` means "untouched": the cell has never been written (or the
/// screen was cleared) and renders as a space on default colors. All other
/// fields of an untouched cell are meaningless and must not influence
/// rendering — use the `resolved_*` accessors instead of the raw fields
/// when producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// Raw glyph byte. Zero marks an untouched cell.
    pub glyph: u8,
    /// Foreground color index the glyph was written with.
    pub fg: u8,
    /// Background color index the glyph was written with.
    pub bg: u8,
    /// Style flags the glyph was written with.
    pub flags: StyleFlags,
}

impl Cell {
    /// Create a cell with explicit glyph and rendition.
    #[must_use]
    pub fn new(glyph: u8, fg: u8, bg: u8, flags: StyleFlags) -> Self {
        Self {
            glyph,
            fg,
            bg,
            flags,
        }
    }

    /// A blank (space) cell in the given colors with no style flags.
    ///
    /// Used by scroll fills and erase operations, which produce real space
    /// glyphs — unlike [`Cell::default`], which produces an untouched cell.
    #[must_use]
    pub fn blank(fg: u8, bg: u8) -> Self {
        Self::new(b' ', fg, bg, StyleFlags::empty())
    }

    /// Whether this cell has never been written.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.glyph == 0
    }

    /// Glyph as rendered: untouched cells read as a space.
    #[must_use]
    pub fn resolved_glyph(&self) -> u8 {
        if self.is_untouched() { b' ' } else { self.glyph }
    }

    /// Foreground as rendered: untouched cells read as the default.
    #[must_use]
    pub fn resolved_fg(&self) -> u8 {
        if self.is_untouched() {
            DEFAULT_FG
        } else {
            self.fg
        }
    }

    /// Background as rendered: untouched cells read as the default.
    #[must_use]
    pub fn resolved_bg(&self) -> u8 {
        if self.is_untouched() {
            DEFAULT_BG
        } else {
            self.bg
        }
    }

    /// Style flags as rendered: untouched cells have none.
    #[must_use]
    pub fn resolved_flags(&self) -> StyleFlags {
        if self.is_untouched() {
            StyleFlags::empty()
        } else {
            self.flags
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_untouched() {
        let cell = Cell::default();
        assert!(cell.is_untouched());
        assert_eq!(cell.glyph, 0);
        assert_eq!(cell.flags, StyleFlags::empty());
    }

    #[test]
    fn untouched_cell_resolves_to_space_on_defaults() {
        // Stale color bytes must not leak through for an untouched cell.
        let cell = Cell::new(0, 3, 9, StyleFlags::BOLD);
        assert_eq!(cell.resolved_glyph(), b' ');
        assert_eq!(cell.resolved_fg(), DEFAULT_FG);
        assert_eq!(cell.resolved_bg(), DEFAULT_BG);
        assert_eq!(cell.resolved_flags(), StyleFlags::empty());
    }

    #[test]
    fn written_cell_resolves_to_its_own_rendition() {
        let cell = Cell::new(b'A', 1, 4, StyleFlags::UNDERLINE);
        assert!(!cell.is_untouched());
        assert_eq!(cell.resolved_glyph(), b'A');
        assert_eq!(cell.resolved_fg(), 1);
        assert_eq!(cell.resolved_bg(), 4);
        assert_eq!(cell.resolved_flags(), StyleFlags::UNDERLINE);
    }

    #[test]
    fn blank_cell_is_a_real_space() {
        let cell = Cell::blank(2, 5);
        assert!(!cell.is_untouched());
        assert_eq!(cell.resolved_glyph(), b' ');
        assert_eq!(cell.resolved_fg(), 2);
        assert_eq!(cell.resolved_bg(), 5);
    }

    #[test]
    fn flag_bits_are_distinct() {
        let all = StyleFlags::all();
        assert_eq!(all.bits(), 0xFF);
        assert!(all.contains(StyleFlags::BOLD | StyleFlags::STRIKETHROUGH));
    }
}
