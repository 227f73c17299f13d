#![forbid(unsafe_code)]

//! Cooperative poll-driven session glue for cellterm.
//!
//! `cellterm-runtime` wires the host-agnostic terminal model from
//! [`cellterm-core`](cellterm_core) to a host's byte sources: it owns the
//! single-threaded poll loop over keyboard, child output, and pointer
//! device, the local-echo line-input bridge, and the pointer-packet
//! decoder with its sub-cell overlay position.
//!
//! The crate stays I/O-shape-agnostic: hosts implement [`ByteSource`]
//! (a non-blocking size probe plus a bounded read) over whatever file
//! descriptors, pipes, or queues they have. Nothing here spawns processes
//! or touches pixels.

pub mod line_input;
pub mod pointer;
pub mod session;

pub use line_input::{INPUT_CAPACITY, LineInput, PushOutcome};
pub use pointer::{
    DecodeEvent, OverlayMove, PACKET_MAGIC, PACKET_SIZE, PacketDecoder, PointerOverlay,
    PointerPacket, SUBCELL,
};
pub use session::{ByteSource, PollEvents, Session, SessionConfig};
