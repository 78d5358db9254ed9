//! SMF header chunk structures and constants.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Header chunk identifier.
pub const SMF_HEADER_MAGIC: &[u8; 4] = b"MThd";

/// Track chunk identifier.
pub const SMF_TRACK_MAGIC: &[u8; 4] = b"MTrk";

/// Header chunk payload length (format + track count + division).
pub const SMF_HEADER_LENGTH: u32 = 6;

/// Size of the complete header chunk including the 8-byte chunk prefix.
pub const SMF_HEADER_CHUNK_SIZE: usize = 14;

/// Largest metrical division (bit 15 selects SMPTE timing).
pub const SMF_MAX_PPQ: u16 = 0x7FFF;

/// SMF file format word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmfFormat {
    /// Format 0: one multi-channel track.
    SingleTrack,
    /// Format 1: simultaneous tracks.
    MultiTrack,
    /// Format 2: independent sequential tracks.
    Sequential,
}

impl SmfFormat {
    pub fn as_u16(self) -> u16 {
        match self {
            SmfFormat::SingleTrack => 0,
            SmfFormat::MultiTrack => 1,
            SmfFormat::Sequential => 2,
        }
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(SmfFormat::SingleTrack),
            1 => Some(SmfFormat::MultiTrack),
            2 => Some(SmfFormat::Sequential),
            _ => None,
        }
    }
}

/// SMF header data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeader {
    /// File format.
    pub format: SmfFormat,
    /// Number of track chunks that follow.
    pub num_tracks: u16,
    /// Pulses per quarter note.
    pub ppq: u16,
}

impl SmfHeader {
    /// Create a header for a single-track file.
    pub fn single_track(ppq: u16) -> Self {
        Self {
            format: SmfFormat::SingleTrack,
            num_tracks: 1,
            ppq,
        }
    }

    /// Write the header chunk to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(SMF_HEADER_MAGIC)?;
        writer.write_u32::<BigEndian>(SMF_HEADER_LENGTH)?;
        writer.write_u16::<BigEndian>(self.format.as_u16())?;
        writer.write_u16::<BigEndian>(self.num_tracks)?;
        // Bit 15 clear: metrical timing.
        writer.write_u16::<BigEndian>(self.ppq & SMF_MAX_PPQ)?;
        Ok(())
    }
}
