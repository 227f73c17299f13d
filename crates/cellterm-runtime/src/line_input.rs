//! Local-echo line buffering for keyboard input.
//!
//! Keystrokes destined for the child process are collected into a line
//! buffer and flushed as a whole — on newline or when the buffer fills.
//! The bridge itself never touches the grid; the caller decides whether to
//! loop an accepted byte back through the interpreter based on its
//! local-echo flag (a cooperating shell turns echo off with the vendor
//! opcode while it does its own line editing).

/// Flush threshold for a pending input line, in bytes.
pub const INPUT_CAPACITY: usize = 1024;

/// What a pushed keystroke did to the pending line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Byte was dropped: unsupported control byte, or backspace on an
    /// empty line.
    Ignored,
    /// Byte was applied to the pending line (added, or removed one for
    /// backspace). Echo it locally if echo is on.
    Buffered,
    /// The pending line is complete and should be flushed to the child
    /// (echo the byte first if echo is on).
    Flush,
    /// The interrupt key (Ctrl-C): the host should signal the child; the
    /// pending line is untouched.
    Interrupt,
}

/// Line-input bridge between raw keystrokes and the child's stdin.
#[derive(Debug, Default)]
pub struct LineInput {
    buf: Vec<u8>,
}

impl LineInput {
    /// Create an empty bridge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no bytes are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Apply one keystroke to the pending line.
    pub fn push(&mut self, byte: u8) -> PushOutcome {
        match byte {
            0x08 => {
                if self.buf.pop().is_some() {
                    PushOutcome::Buffered
                } else {
                    PushOutcome::Ignored
                }
            }
            0x03 => PushOutcome::Interrupt,
            b'\n' | 0x20..=0x7E => {
                self.buf.push(byte);
                if byte == b'\n' || self.buf.len() >= INPUT_CAPACITY {
                    PushOutcome::Flush
                } else {
                    PushOutcome::Buffered
                }
            }
            _ => PushOutcome::Ignored,
        }
    }

    /// Drain the pending line (newline included when one ended it).
    #[must_use]
    pub fn take_line(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.buf)
    }
}
