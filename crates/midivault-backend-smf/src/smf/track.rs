//! SMF track chunk: delta-timed events and their byte layout.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

use super::header::SMF_TRACK_MAGIC;
use super::vlq::write_vlq;

/// Channel voice status nibbles.
pub mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const META: u8 = 0xFF;
}

/// Meta event types.
pub mod meta {
    pub const TEMPO: u8 = 0x51;
    pub const END_OF_TRACK: u8 = 0x2F;
}

/// Largest tempo value (24-bit microseconds per quarter note).
pub const MAX_TEMPO_MPQN: u32 = 0x00FF_FFFF;

/// The payload of a track event.
///
/// Channel numbers are written as the low nibble of the status byte and data
/// bytes are written with bit 7 cleared, so any field value produces a
/// well-formed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEventKind {
    /// Set tempo meta event, microseconds per quarter note.
    Tempo { mpqn: u32 },
    ProgramChange { channel: u8, program: u8 },
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    EndOfTrack,
}

/// A track event preceded by its delta-time in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEvent {
    pub delta: u32,
    pub kind: TrackEventKind,
}

impl TrackEvent {
    pub fn new(delta: u32, kind: TrackEventKind) -> Self {
        Self { delta, kind }
    }

    /// Write the event (delta-time first) to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_vlq(writer, self.delta)?;

        match self.kind {
            TrackEventKind::Tempo { mpqn } => {
                let mpqn = mpqn.min(MAX_TEMPO_MPQN);
                writer.write_all(&[status::META, meta::TEMPO, 0x03])?;
                writer.write_u24::<BigEndian>(mpqn)?;
            }
            TrackEventKind::ProgramChange { channel, program } => {
                writer.write_all(&[status::PROGRAM_CHANGE | (channel & 0x0F), program & 0x7F])?;
            }
            TrackEventKind::NoteOn {
                channel,
                key,
                velocity,
            } => {
                writer.write_all(&[status::NOTE_ON | (channel & 0x0F), key & 0x7F, velocity & 0x7F])?;
            }
            TrackEventKind::NoteOff {
                channel,
                key,
                velocity,
            } => {
                writer.write_all(&[status::NOTE_OFF | (channel & 0x0F), key & 0x7F, velocity & 0x7F])?;
            }
            TrackEventKind::EndOfTrack => {
                writer.write_all(&[status::META, meta::END_OF_TRACK, 0x00])?;
            }
        }

        Ok(())
    }
}

/// An SMF track.
///
/// The end-of-track event is appended when the track is written and must not
/// be pushed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmfTrack {
    pub events: Vec<TrackEvent>,
}

impl SmfTrack {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, delta: u32, kind: TrackEventKind) {
        self.events.push(TrackEvent::new(delta, kind));
    }

    /// Sum of all delta-times in the track.
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta as u64).sum()
    }

    /// Serialize the event data (without the chunk prefix), end-of-track included.
    pub fn event_bytes(&self) -> io::Result<Vec<u8>> {
        let mut data = Vec::new();
        for event in &self.events {
            event.write(&mut data)?;
        }
        TrackEvent::new(0, TrackEventKind::EndOfTrack).write(&mut data)?;
        Ok(data)
    }

    /// Write the complete track chunk to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let data = self.event_bytes()?;
        let len = u32::try_from(data.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "track chunk too large"))?;

        writer.write_all(SMF_TRACK_MAGIC)?;
        writer.write_u32::<BigEndian>(len)?;
        writer.write_all(&data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bytes_of(event: TrackEvent) -> Vec<u8> {
        let mut buf = Vec::new();
        event.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_tempo_event_bytes() {
        let bytes = bytes_of(TrackEvent::new(0, TrackEventKind::Tempo { mpqn: 500_000 }));
        assert_eq!(bytes, vec![0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    }

    #[test]
    fn test_program_change_bytes() {
        let bytes = bytes_of(TrackEvent::new(
            0,
            TrackEventKind::ProgramChange {
                channel: 9,
                program: 40,
            },
        ));
        assert_eq!(bytes, vec![0x00, 0xC9, 40]);
    }

    #[test]
    fn test_note_events_with_delta() {
        let on = bytes_of(TrackEvent::new(
            0,
            TrackEventKind::NoteOn {
                channel: 0,
                key: 60,
                velocity: 90,
            },
        ));
        assert_eq!(on, vec![0x00, 0x90, 60, 90]);

        let off = bytes_of(TrackEvent::new(
            200,
            TrackEventKind::NoteOff {
                channel: 3,
                key: 60,
                velocity: 90,
            },
        ));
        assert_eq!(off, vec![0x81, 0x48, 0x83, 60, 90]);
    }

    #[test]
    fn test_out_of_range_fields_are_masked() {
        let bytes = bytes_of(TrackEvent::new(
            0,
            TrackEventKind::NoteOn {
                channel: 0x13,
                key: 0xBC,
                velocity: 0xFF,
            },
        ));
        assert_eq!(bytes, vec![0x00, 0x93, 0x3C, 0x7F]);
    }

    #[test]
    fn test_empty_track_chunk() {
        let mut buf = Vec::new();
        SmfTrack::new().write(&mut buf).unwrap();
        assert_eq!(buf, b"MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00".to_vec());
    }

    #[test]
    fn test_track_length_covers_end_of_track() {
        let mut track = SmfTrack::new();
        track.push(0, TrackEventKind::Tempo { mpqn: 500_000 });
        track.push(
            10,
            TrackEventKind::NoteOn {
                channel: 0,
                key: 60,
                velocity: 64,
            },
        );

        let mut buf = Vec::new();
        track.write(&mut buf).unwrap();

        let len = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;
        assert_eq!(len, 7 + 4 + 4);
        assert_eq!(buf.len(), 8 + len);
        assert_eq!(&buf[buf.len() - 4..], &[0x00, 0xFF, 0x2F, 0x00]);
        assert_eq!(track.total_ticks(), 10);
    }
}
