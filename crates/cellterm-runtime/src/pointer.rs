//! Pointer-device packet decoding and overlay-position tracking.
//!
//! The pointer device emits fixed-size little-endian records. A record is
//! only trusted when its magic matches; anything else means the stream lost
//! framing, and exactly one byte is discarded per attempt until a valid
//! header lines up again.
//!
//! Movement deltas are scaled logarithmically (a delta is multiplied by the
//! bit position of its highest set bit, so slow movements stay precise and
//! fast flicks cover ground) and accumulated into a sub-cell-resolution
//! position that is divided down to grid coordinates for the overlay cell.

use std::collections::VecDeque;

/// Header every valid pointer packet starts with.
pub const PACKET_MAGIC: u32 = 0xFEED_1234;

/// Wire size of one packet: magic, dx, dy, buttons — four 32-bit words.
pub const PACKET_SIZE: usize = 16;

/// Sub-cell position units per grid cell.
pub const SUBCELL: i32 = 48;

/// One decoded pointer movement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPacket {
    /// Horizontal movement delta (right is positive).
    pub dx: i32,
    /// Vertical movement delta (device up is positive; the overlay
    /// subtracts it, since grid rows grow downward).
    pub dy: i32,
    /// Button state bitmask.
    pub buttons: u32,
}

/// Result of one decode attempt against the buffered stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A complete, validated packet.
    Packet(PointerPacket),
    /// The stream was desynchronized; one byte was discarded.
    Desync,
}

/// Streaming decoder for pointer packets.
#[derive(Debug, Default)]
pub struct PacketDecoder {
    buf: VecDeque<u8>,
}

impl PacketDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw device bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes);
    }

    /// Bytes currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Try to decode the next event; `None` means more bytes are needed.
    pub fn next_event(&mut self) -> Option<DecodeEvent> {
        if self.buf.len() < PACKET_SIZE {
            return None;
        }
        if self.peek_word(0) != PACKET_MAGIC {
            self.buf.pop_front();
            return Some(DecodeEvent::Desync);
        }
        let dx = self.peek_word(4) as i32;
        let dy = self.peek_word(8) as i32;
        let buttons = self.peek_word(12);
        self.buf.drain(..PACKET_SIZE);
        Some(DecodeEvent::Packet(PointerPacket { dx, dy, buttons }))
    }

    fn peek_word(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.buf[offset],
            self.buf[offset + 1],
            self.buf[offset + 2],
            self.buf[offset + 3],
        ])
    }
}

/// Logarithmic acceleration: `delta * ilog2(|delta|)`.
///
/// Deltas of magnitude 0 or 1 contribute nothing, matching the shift-count
/// scaling of the device protocol.
fn scaled(delta: i32) -> i32 {
    let magnitude = delta.unsigned_abs();
    if magnitude < 2 {
        0
    } else {
        delta.saturating_mul(magnitude.ilog2() as i32)
    }
}

/// Overlay cursor position at sub-cell resolution.
#[derive(Debug, Clone)]
pub struct PointerOverlay {
    pos_x: i32,
    pos_y: i32,
    cols: u16,
    rows: u16,
}

/// An overlay cell change: the vacated cell should be redrawn normally and
/// the newly covered cell inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayMove {
    pub from: (u16, u16),
    pub to: (u16, u16),
}

impl PointerOverlay {
    /// Create an overlay centered on a `cols × rows` grid.
    ///
    /// # Panics
    ///
    /// Panics if `cols == 0` or `rows == 0`.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        assert!(cols > 0, "cols must be > 0");
        assert!(rows > 0, "rows must be > 0");
        Self {
            pos_x: i32::from(cols) * SUBCELL / 2,
            pos_y: i32::from(rows) * SUBCELL / 2,
            cols,
            rows,
        }
    }

    /// Grid cell currently under the pointer.
    #[must_use]
    pub fn cell(&self) -> (u16, u16) {
        ((self.pos_x / SUBCELL) as u16, (self.pos_y / SUBCELL) as u16)
    }

    /// Apply a movement packet; reports the cell change, if any.
    pub fn apply(&mut self, packet: &PointerPacket) -> Option<OverlayMove> {
        let from = self.cell();
        self.pos_x += scaled(packet.dx);
        self.pos_y -= scaled(packet.dy);
        self.pos_x = self.pos_x.clamp(0, i32::from(self.cols) * SUBCELL - 1);
        self.pos_y = self.pos_y.clamp(0, i32::from(self.rows) * SUBCELL - 1);
        let to = self.cell();
        (to != from).then_some(OverlayMove { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet_bytes(magic: u32, dx: i32, dy: i32, buttons: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(PACKET_SIZE);
        out.extend_from_slice(&magic.to_le_bytes());
        out.extend_from_slice(&(dx as u32).to_le_bytes());
        out.extend_from_slice(&(dy as u32).to_le_bytes());
        out.extend_from_slice(&buttons.to_le_bytes());
        out
    }

    #[test]
    fn decodes_a_valid_packet() {
        let mut decoder = PacketDecoder::new();
        decoder.extend(&packet_bytes(PACKET_MAGIC, 5, -3, 1));
        assert_eq!(
            decoder.next_event(),
            Some(DecodeEvent::Packet(PointerPacket {
                dx: 5,
                dy: -3,
                buttons: 1
            }))
        );
        assert_eq!(decoder.next_event(), None);
    }

    #[test]
    fn partial_packet_waits_for_more_bytes() {
        let mut decoder = PacketDecoder::new();
        let bytes = packet_bytes(PACKET_MAGIC, 1, 1, 0);
        decoder.extend(&bytes[..10]);
        assert_eq!(decoder.next_event(), None);
        decoder.extend(&bytes[10..]);
        assert!(matches!(decoder.next_event(), Some(DecodeEvent::Packet(_))));
    }

    #[test]
    fn bad_magic_discards_exactly_one_byte() {
        let mut decoder = PacketDecoder::new();
        decoder.extend(&packet_bytes(0xDEAD_BEEF, 9, 9, 9));
        let before = decoder.buffered();
        assert_eq!(decoder.next_event(), Some(DecodeEvent::Desync));
        assert_eq!(decoder.buffered(), before - 1);
    }

    #[test]
    fn resynchronizes_after_garbage() {
        let mut decoder = PacketDecoder::new();
        decoder.extend(&[0xAA, 0xBB, 0xCC]);
        decoder.extend(&packet_bytes(PACKET_MAGIC, 2, 0, 0));
        let mut desyncs = 0;
        loop {
            match decoder.next_event() {
                Some(DecodeEvent::Desync) => desyncs += 1,
                Some(DecodeEvent::Packet(p)) => {
                    assert_eq!(p.dx, 2);
                    break;
                }
                None => panic!("packet never resynchronized"),
            }
        }
        assert_eq!(desyncs, 3);
    }

    #[test]
    fn scaling_kills_unit_deltas_and_accelerates_large_ones() {
        assert_eq!(scaled(0), 0);
        assert_eq!(scaled(1), 0);
        assert_eq!(scaled(-1), 0);
        assert_eq!(scaled(2), 2);
        assert_eq!(scaled(-2), -2);
        assert_eq!(scaled(8), 24);
        assert_eq!(scaled(-100), -600);
    }

    #[test]
    fn overlay_moves_and_clamps_to_grid() {
        let mut overlay = PointerOverlay::new(10, 4);
        assert_eq!(overlay.cell(), (5, 2));

        // A huge flick right clamps at the last column.
        let moved = overlay.apply(&PointerPacket {
            dx: 1_000_000,
            dy: 0,
            buttons: 0,
        });
        assert!(moved.is_some());
        assert_eq!(overlay.cell(), (9, 2));

        // Device-up means grid-up (row decreases).
        overlay.apply(&PointerPacket {
            dx: 0,
            dy: 1_000_000,
            buttons: 0,
        });
        assert_eq!(overlay.cell(), (9, 0));
    }

    #[test]
    fn sub_cell_motion_does_not_report_a_move() {
        let mut overlay = PointerOverlay::new(10, 4);
        let moved = overlay.apply(&PointerPacket {
            dx: 2,
            dy: 0,
            buttons: 0,
        });
        assert_eq!(moved, None);
    }

    #[test]
    fn crossing_a_cell_boundary_reports_old_and_new() {
        let mut overlay = PointerOverlay::new(10, 4);
        let from = overlay.cell();
        let moved = overlay
            .apply(&PointerPacket {
                dx: SUBCELL * 2,
                dy: 0,
                buttons: 0,
            })
            .expect("large delta must cross a boundary");
        assert_eq!(moved.from, from);
        assert!(moved.to.0 > from.0);
    }
}
