#![forbid(unsafe_code)]

//! Host-agnostic ANSI terminal model.
//!
//! `cellterm-core` is the platform-independent heart of a character-cell
//! terminal emulator: it consumes the byte stream a child process writes,
//! interprets the recognized ANSI escape subset, and maintains a dense grid
//! of glyph cells plus a cursor — all without any host I/O dependencies.
//!
//! # Primary responsibilities
//!
//! - **Cell**: one glyph byte + the rendition it was written with.
//! - **Grid**: dense `cols × rows` cell matrix with the full-grid scroll.
//! - **Screen**: grid-backed reference implementation of the render-backend
//!   contract — cursor, wrap/scroll normalization, line-editing control
//!   bytes, and cursor-blink bookkeeping.
//! - **RenderBackend**: the capability set a concrete renderer (bitmap
//!   font, outline font, headless test double) must provide.
//! - **Interpreter**: the three-state escape-sequence machine and command
//!   dispatcher.
//!
//! # Design principles
//!
//! - **No I/O**: all types are pure data + logic; the host supplies bytes.
//! - **Deterministic**: identical byte sequences always produce identical
//!   state.
//! - **Unkillable**: malformed or adversarial input is recovered silently;
//!   nothing here returns an error or panics on untrusted bytes.
//! - **`#![forbid(unsafe_code)]`**: safety enforced at compile time.

pub mod backend;
pub mod cell;
pub mod grid;
pub mod interp;
pub mod screen;

pub use backend::RenderBackend;
pub use cell::{Cell, DEFAULT_BG, DEFAULT_FG, StyleFlags};
pub use grid::Grid;
pub use interp::{ESCAPE_BUFFER_CAPACITY, EscapeState, Interpreter};
pub use screen::{DEFAULT_BLINK_INTERVAL, Screen, TAB_WIDTH};
