//! Cooperative poll-driven terminal session.
//!
//! One logical loop repeatedly checks three independent byte sources —
//! keyboard, child-process output, and the pointer device — and feeds
//! whatever is available into the interpreter or the pointer overlay. No
//! check blocks: each is a size probe followed by a bounded read. The
//! session owns the interpreter and screen exclusively, so the multi-byte
//! escape dispatch is never re-entered mid-sequence.

use std::io;

use cellterm_core::{Interpreter, Screen};
use tracing::{debug, warn};

use crate::line_input::{LineInput, PushOutcome};
use crate::pointer::{DecodeEvent, OverlayMove, PacketDecoder, PointerOverlay};

/// A non-blocking byte source: a size probe plus a bounded read.
pub trait ByteSource {
    /// Number of bytes that can be read right now without blocking.
    fn available(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes; never blocks when `available` said
    /// data was ready.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Session tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Largest single read per source per poll.
    pub read_chunk: usize,
    /// Poll cycles between cursor blink flips.
    pub blink_interval: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_chunk: 1024,
            blink_interval: cellterm_core::DEFAULT_BLINK_INTERVAL,
        }
    }
}

/// Everything one poll cycle produced for the host to act on.
#[derive(Debug, Default)]
pub struct PollEvents {
    /// Complete input lines to deliver to the child's stdin.
    pub lines: Vec<Vec<u8>>,
    /// The interrupt key was pressed; signal the child.
    pub interrupted: bool,
    /// Pointer overlay cell changes (redraw `from` plain, `to` inverted).
    pub overlay_moves: Vec<OverlayMove>,
    /// The cursor blink phase flipped; redraw the cell under the cursor.
    pub blink_flipped: bool,
}

/// Single-owner aggregate tying sources, interpreter, screen, line input,
/// and pointer overlay together.
#[derive(Debug)]
pub struct Session {
    interp: Interpreter,
    screen: Screen,
    line_input: LineInput,
    decoder: PacketDecoder,
    overlay: PointerOverlay,
    config: SessionConfig,
}

impl Session {
    /// Create a session for a `cols × rows` terminal with default tuning.
    ///
    /// # Panics
    ///
    /// Panics if `cols == 0` or `rows == 0`.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::with_config(cols, rows, SessionConfig::default())
    }

    /// Create a session with explicit tuning.
    #[must_use]
    pub fn with_config(cols: u16, rows: u16, config: SessionConfig) -> Self {
        Self {
            interp: Interpreter::new(cols, rows),
            screen: Screen::with_blink_interval(cols, rows, config.blink_interval),
            line_input: LineInput::new(),
            decoder: PacketDecoder::new(),
            overlay: PointerOverlay::new(cols, rows),
            config,
        }
    }

    /// The terminal screen (grid, cursor, rendition).
    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The escape interpreter.
    #[must_use]
    pub fn interpreter(&self) -> &Interpreter {
        &self.interp
    }

    /// The pointer overlay cell.
    #[must_use]
    pub fn overlay_cell(&self) -> (u16, u16) {
        self.overlay.cell()
    }

    /// Run one cooperative poll cycle over the three sources.
    pub fn poll_once<K, C, P>(
        &mut self,
        keyboard: &mut K,
        child_out: &mut C,
        pointer: &mut P,
    ) -> io::Result<PollEvents>
    where
        K: ByteSource,
        C: ByteSource,
        P: ByteSource,
    {
        let mut events = PollEvents {
            blink_flipped: self.screen.tick(),
            ..PollEvents::default()
        };

        self.drain_pointer(pointer, &mut events)?;
        self.drain_keyboard(keyboard, &mut events)?;
        self.drain_child_output(child_out)?;

        Ok(events)
    }

    fn drain_pointer<P: ByteSource>(
        &mut self,
        pointer: &mut P,
        events: &mut PollEvents,
    ) -> io::Result<()> {
        let mut buf = vec![0u8; self.config.read_chunk];
        while pointer.available()? > 0 {
            let n = pointer.read(&mut buf)?;
            if n == 0 {
                break;
            }
            self.decoder.extend(&buf[..n]);
        }
        while let Some(event) = self.decoder.next_event() {
            match event {
                DecodeEvent::Desync => {
                    warn!("pointer stream desynchronized; dropped one byte");
                }
                DecodeEvent::Packet(packet) => {
                    if let Some(moved) = self.overlay.apply(&packet) {
                        events.overlay_moves.push(moved);
                    }
                }
            }
        }
        Ok(())
    }

    fn drain_keyboard<K: ByteSource>(
        &mut self,
        keyboard: &mut K,
        events: &mut PollEvents,
    ) -> io::Result<()> {
        let mut buf = vec![0u8; self.config.read_chunk];
        while keyboard.available()? > 0 {
            let n = keyboard.read(&mut buf)?;
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                match self.line_input.push(byte) {
                    PushOutcome::Ignored => {}
                    PushOutcome::Interrupt => {
                        debug!("interrupt key");
                        events.interrupted = true;
                    }
                    outcome => {
                        if self.interp.local_echo() {
                            self.interp.advance(byte, &mut self.screen);
                        }
                        if outcome == PushOutcome::Flush {
                            events.lines.push(self.line_input.take_line());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn drain_child_output<C: ByteSource>(&mut self, child_out: &mut C) -> io::Result<()> {
        let mut buf = vec![0u8; self.config.read_chunk];
        while child_out.available()? > 0 {
            let n = child_out.read(&mut buf)?;
            if n == 0 {
                break;
            }
            self.interp.feed(&buf[..n], &mut self.screen);
        }
        Ok(())
    }
}
