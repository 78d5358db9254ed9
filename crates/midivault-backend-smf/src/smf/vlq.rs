//! Variable-length quantity (VLQ) encoding used for SMF delta-times.
//!
//! Seven bits per byte, most significant group first. Every byte except the
//! last has bit 7 set. SMF limits a VLQ to four bytes.

use std::io::{self, Write};

/// Largest value representable in a four-byte VLQ.
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

/// Encodes `value` as a VLQ.
///
/// Values above [`VLQ_MAX`] are clamped to it.
pub fn encode_vlq(value: u32) -> Vec<u8> {
    let mut value = value.min(VLQ_MAX);
    let mut groups = [0u8; 4];
    let mut len = 0;

    loop {
        groups[len] = (value & 0x7F) as u8;
        len += 1;
        value >>= 7;
        if value == 0 {
            break;
        }
    }

    let mut out = Vec::with_capacity(len);
    for i in (0..len).rev() {
        if i == 0 {
            out.push(groups[i]);
        } else {
            out.push(groups[i] | 0x80);
        }
    }
    out
}

/// Writes `value` as a VLQ.
pub fn write_vlq<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&encode_vlq(value))
}

/// Reads a VLQ starting at `*pos`, advancing `pos` past it.
///
/// Returns `None` if the data ends mid-quantity or the quantity is longer
/// than four bytes.
pub fn read_vlq(data: &[u8], pos: &mut usize) -> Option<u32> {
    let mut value: u32 = 0;
    for _ in 0..4 {
        let byte = *data.get(*pos)?;
        *pos += 1;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}
