//! ANSI escape-sequence interpreter.
//!
//! A deterministic three-state machine that consumes an output byte stream
//! one byte at a time and drives a [`RenderBackend`]: printable bytes pass
//! straight through to the backend's writer, while `ESC [` sequences are
//! buffered, tokenized, and dispatched as commands that move the cursor,
//! erase spans, or change the graphic rendition.
//!
//! The interpreter is deliberately permissive: unknown command letters,
//! missing parameters, and non-numeric parameters are recovered silently,
//! and no input — however adversarial — can raise an error, desynchronize
//! the machine, or grow the pending buffer past its fixed capacity.

use crate::backend::RenderBackend;
use crate::cell::{DEFAULT_BG, DEFAULT_FG, StyleFlags};

/// Upper bound on a buffered escape sequence, `ESC [` prefix included.
///
/// A sequence that overruns this bound is aborted: the buffer is discarded
/// and the machine returns to ground without dispatching.
pub const ESCAPE_BUFFER_CAPACITY: usize = 100;

const ESC: u8 = 0x1B;
/// Command letters terminating a sequence span this inclusive ASCII range.
const COMMAND_LOW: u8 = b'A';
const COMMAND_HIGH: u8 = b'z';

/// Escape-parsing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeState {
    /// Pass-through: bytes go straight to the backend writer.
    #[default]
    Ground,
    /// An `ESC` arrived; waiting for `[` to confirm a control sequence.
    SawEscape,
    /// Inside `ESC [`, accumulating parameters until a command letter.
    InCommand,
}

/// Stateful ANSI interpreter for a fixed-size grid.
#[derive(Debug, Clone)]
pub struct Interpreter {
    cols: u16,
    rows: u16,
    fg: u8,
    bg: u8,
    flags: StyleFlags,
    state: EscapeState,
    pending: Vec<u8>,
    saved: (u16, u16),
    local_echo: bool,
}

impl Interpreter {
    /// Create an interpreter for a `cols × rows` grid with default
    /// rendition and local echo enabled.
    ///
    /// A fresh [`Screen`](crate::Screen) starts with the same rendition, so
    /// no initial `set_rendition` call is needed to keep the two in sync.
    ///
    /// # Panics
    ///
    /// Panics if `cols == 0` or `rows == 0`.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        assert!(cols > 0, "cols must be > 0");
        assert!(rows > 0, "rows must be > 0");
        Self {
            cols,
            rows,
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            flags: StyleFlags::empty(),
            state: EscapeState::Ground,
            pending: Vec::new(),
            saved: (0, 0),
            local_echo: true,
        }
    }

    /// Current escape-parsing state.
    #[must_use]
    pub fn escape_state(&self) -> EscapeState {
        self.state
    }

    /// Bytes currently buffered for an in-flight escape sequence.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Current rendition `(fg, bg)` as tracked by the interpreter.
    #[must_use]
    pub fn rendition(&self) -> (u8, u8) {
        (self.fg, self.bg)
    }

    /// Current style flags.
    #[must_use]
    pub fn style_flags(&self) -> StyleFlags {
        self.flags
    }

    /// Whether keystrokes should be echoed locally into the grid.
    ///
    /// Toggled by the vendor opcode `ESC [ 1001 z` (off) / `ESC [ 1002 z`
    /// (on); a cooperating shell uses it to suppress double echo while it
    /// does its own line editing.
    #[must_use]
    pub fn local_echo(&self) -> bool {
        self.local_echo
    }

    /// Feed a chunk of bytes.
    pub fn feed<B: RenderBackend>(&mut self, bytes: &[u8], backend: &mut B) {
        for &b in bytes {
            self.advance(b, backend);
        }
    }

    /// Advance the machine by one byte.
    pub fn advance<B: RenderBackend>(&mut self, byte: u8, backend: &mut B) {
        match self.state {
            EscapeState::Ground => {
                if byte == ESC {
                    self.pending.clear();
                    self.pending.push(byte);
                    self.state = EscapeState::SawEscape;
                } else {
                    backend.write(byte);
                }
            }
            EscapeState::SawEscape => {
                if byte == b'[' {
                    self.pending.push(byte);
                    self.state = EscapeState::InCommand;
                } else {
                    // Not actually a control sequence: the consumer must
                    // still see the ESC we swallowed, then this byte.
                    for &swallowed in &self.pending {
                        backend.write(swallowed);
                    }
                    backend.write(byte);
                    self.pending.clear();
                    self.state = EscapeState::Ground;
                }
            }
            EscapeState::InCommand => {
                if (COMMAND_LOW..=COMMAND_HIGH).contains(&byte) {
                    let raw = core::mem::take(&mut self.pending);
                    self.state = EscapeState::Ground;
                    self.dispatch(byte, &raw, backend);
                } else if self.pending.len() >= ESCAPE_BUFFER_CAPACITY {
                    // Oversized sequence: abort and resynchronize.
                    self.pending.clear();
                    self.state = EscapeState::Ground;
                } else {
                    self.pending.push(byte);
                }
            }
        }
    }

    fn dispatch<B: RenderBackend>(&mut self, command: u8, raw: &[u8], backend: &mut B) {
        // Parameters sit between the `ESC [` prefix and the command letter.
        let params = raw.get(2..).unwrap_or(&[]);
        let params = core::str::from_utf8(params).unwrap_or("");
        let args: Vec<&str> = if params.is_empty() {
            Vec::new()
        } else {
            params.split(';').collect()
        };

        match command {
            b'A' => {
                let n = int_arg(&args, 0, 1);
                let y = i32::from(backend.cursor_y()) - n;
                backend.set_cursor(backend.cursor_x(), self.clamp_row(y));
            }
            b'B' => {
                let n = int_arg(&args, 0, 1);
                let y = i32::from(backend.cursor_y()) + n;
                backend.set_cursor(backend.cursor_x(), self.clamp_row(y));
            }
            b'C' => {
                let n = int_arg(&args, 0, 1);
                let x = i32::from(backend.cursor_x()) + n;
                backend.set_cursor(self.clamp_col(x), backend.cursor_y());
            }
            b'D' => {
                let n = int_arg(&args, 0, 1);
                let x = i32::from(backend.cursor_x()) - n;
                backend.set_cursor(self.clamp_col(x), backend.cursor_y());
            }
            b'H' | b'f' => {
                if args.len() < 2 {
                    backend.set_cursor(0, 0);
                } else {
                    let row = int_arg(&args, 0, 1).clamp(1, i32::from(self.rows));
                    let col = int_arg(&args, 1, 1).clamp(1, i32::from(self.cols));
                    backend.set_cursor((col - 1) as u16, (row - 1) as u16);
                }
            }
            b'J' => backend.clear_screen(),
            b'K' => {
                let y = backend.cursor_y();
                let (start, end) = match int_arg(&args, 0, 0) {
                    0 => (backend.cursor_x(), self.cols),
                    1 => (0, backend.cursor_x()),
                    2 => (0, self.cols),
                    _ => (0, 0),
                };
                for x in start..end {
                    backend.set_cell(x, y, b' ');
                }
            }
            b'X' => {
                let n = int_arg(&args, 0, 1);
                for _ in 0..n.max(0) {
                    backend.write(b' ');
                }
            }
            b'd' => {
                let y = if args.is_empty() {
                    0
                } else {
                    self.clamp_row(int_arg(&args, 0, 1) - 1)
                };
                backend.set_cursor(backend.cursor_x(), y);
            }
            b'm' => self.apply_sgr(&args, backend),
            b's' => self.saved = (backend.cursor_x(), backend.cursor_y()),
            b'u' => backend.set_cursor(self.saved.0, self.saved.1),
            b'h' | b'l' => {
                // Only the alternate-screen toggle is recognized, and it is
                // emulated by clearing: there is no second buffer.
                if args.first() == Some(&"?1049") {
                    backend.clear_screen();
                }
            }
            b'z' => match int_arg(&args, 0, 0) {
                1001 => self.local_echo = false,
                1002 => self.local_echo = true,
                _ => {}
            },
            _ => {}
        }
    }

    fn apply_sgr<B: RenderBackend>(&mut self, args: &[&str], backend: &mut B) {
        // No arguments means reset.
        let values: Vec<i32> = if args.is_empty() {
            vec![0]
        } else {
            args.iter().map(|tok| tok.parse().unwrap_or(0)).collect()
        };

        let mut i = 0;
        while i < values.len() {
            match values[i] {
                0 => {
                    self.fg = DEFAULT_FG;
                    self.bg = DEFAULT_BG;
                    self.flags = StyleFlags::empty();
                }
                1 => self.flags |= StyleFlags::BOLD,
                3 => self.flags |= StyleFlags::ITALIC,
                4 => self.flags |= StyleFlags::UNDERLINE,
                5 => {
                    // Not blink: the xterm 256-color extension. `5` only has
                    // meaning sandwiched between a 38/48 selector and the
                    // palette index, and both neighbors must actually exist.
                    if i >= 1 && i + 1 < values.len() {
                        let index = values[i + 1].clamp(0, 255) as u8;
                        match values[i - 1] {
                            38 => self.fg = index,
                            48 => self.bg = index,
                            _ => {}
                        }
                        i += 1;
                    }
                }
                7 => core::mem::swap(&mut self.fg, &mut self.bg),
                9 => self.flags |= StyleFlags::STRIKETHROUGH,
                n @ 30..=37 => self.fg = (n - 30) as u8,
                39 => self.fg = DEFAULT_FG,
                n @ 40..=48 => self.bg = (n - 40) as u8,
                49 => self.bg = DEFAULT_BG,
                n @ 90..=97 => self.fg = 8 + (n - 90) as u8,
                n @ 100..=109 => self.bg = 8 + (n - 100) as u8,
                _ => {}
            }
            i += 1;
        }

        // Bold promotes the base colors to their bright variants at the
        // backend boundary; the stored index stays unchanged so that a later
        // reset of the bold flag demotes correctly.
        let effective_fg = if self.flags.contains(StyleFlags::BOLD) && self.fg < 9 {
            self.fg % 8 + 8
        } else {
            self.fg
        };
        backend.set_rendition(effective_fg, self.bg, self.flags);
    }

    fn clamp_row(&self, y: i32) -> u16 {
        y.clamp(0, i32::from(self.rows) - 1) as u16
    }

    fn clamp_col(&self, x: i32) -> u16 {
        x.clamp(0, i32::from(self.cols) - 1) as u16
    }
}

/// Best-effort integer argument: missing tokens take `default`, present but
/// empty or non-numeric tokens parse as 0.
fn int_arg(args: &[&str], idx: usize, default: i32) -> i32 {
    args.get(idx)
        .map_or(default, |tok| tok.parse().unwrap_or(0))
}
