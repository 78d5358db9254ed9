//! Standard MIDI File validator.
//!
//! Parses SMF bytes back into a structured [`SmfReport`]: the header fields
//! and, for every track chunk, the decoded events with their delta-times and
//! absolute tick positions. Alien chunks are skipped as SMF 1.0
//! requires. Running status is accepted when reading even though the writer
//! never produces it.
//!
//! ```rust,ignore
//! use midivault_backend_smf::smf::SmfValidator;
//!
//! let data = std::fs::read("files/0.mid")?;
//! let report = SmfValidator::validate(&data)?;
//! println!("{} tracks at {} ppq", report.tracks.len(), report.header.division);
//! ```

use byteorder::{BigEndian, ByteOrder};
use std::fmt;

use super::header::{SmfFormat, SMF_HEADER_CHUNK_SIZE, SMF_HEADER_MAGIC, SMF_TRACK_MAGIC};
use super::track::{meta, status};
use super::vlq::read_vlq;

/// SMF format error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmfFormatError {
    /// File is too small to hold a header chunk.
    FileTooSmall { size: usize, minimum: usize },
    /// First chunk is not `MThd`.
    InvalidHeaderMagic { found: Vec<u8> },
    /// Header chunk declares fewer than six bytes.
    InvalidHeaderLength { length: u32 },
    /// Format word is not 0, 1 or 2.
    UnknownFormat { format: u16 },
    /// A chunk extends past the end of the file.
    TruncatedChunk {
        offset: usize,
        declared: u32,
        available: usize,
    },
    /// A delta-time or length VLQ is truncated or longer than four bytes.
    InvalidVlq { track: usize, offset: usize },
    /// An event is cut off by the end of its track chunk.
    UnexpectedEndOfTrack { track: usize, offset: usize },
    /// A data byte appears with no running status in effect.
    MissingRunningStatus { track: usize, offset: usize },
    /// A track chunk has no end-of-track meta event.
    MissingEndOfTrack { track: usize },
    /// Bytes follow the end-of-track meta event.
    TrailingTrackData { track: usize, offset: usize },
}

impl fmt::Display for SmfFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmfFormatError::FileTooSmall { size, minimum } => {
                write!(f, "File too small: {} bytes (minimum {})", size, minimum)
            }
            SmfFormatError::InvalidHeaderMagic { found } => {
                write!(f, "Invalid header chunk id: {:02X?}", found)
            }
            SmfFormatError::InvalidHeaderLength { length } => {
                write!(f, "Invalid header chunk length: {}", length)
            }
            SmfFormatError::UnknownFormat { format } => {
                write!(f, "Unknown SMF format: {}", format)
            }
            SmfFormatError::TruncatedChunk {
                offset,
                declared,
                available,
            } => write!(
                f,
                "Chunk at offset {} declares {} bytes but only {} remain",
                offset, declared, available
            ),
            SmfFormatError::InvalidVlq { track, offset } => {
                write!(f, "Track {}: invalid variable-length quantity at offset {}", track, offset)
            }
            SmfFormatError::UnexpectedEndOfTrack { track, offset } => {
                write!(f, "Track {}: event truncated at offset {}", track, offset)
            }
            SmfFormatError::MissingRunningStatus { track, offset } => {
                write!(f, "Track {}: data byte without running status at offset {}", track, offset)
            }
            SmfFormatError::MissingEndOfTrack { track } => {
                write!(f, "Track {}: missing end-of-track event", track)
            }
            SmfFormatError::TrailingTrackData { track, offset } => {
                write!(f, "Track {}: data after end-of-track at offset {}", track, offset)
            }
        }
    }
}

impl std::error::Error for SmfFormatError {}

/// Header fields as read from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeaderInfo {
    pub format: SmfFormat,
    pub num_tracks: u16,
    /// Raw division word.
    pub division: u16,
}

impl SmfHeaderInfo {
    /// Pulses per quarter note, or `None` for SMPTE timing.
    pub fn ppq(&self) -> Option<u16> {
        if self.division & 0x8000 == 0 {
            Some(self.division)
        } else {
            None
        }
    }
}

/// A decoded track event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEventKind {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ProgramChange { channel: u8, program: u8 },
    Tempo { mpqn: u32 },
    EndOfTrack,
    /// Any other channel message.
    Channel { status: u8, data: Vec<u8> },
    /// Any other meta event.
    Meta { meta_type: u8, data: Vec<u8> },
    SysEx { data: Vec<u8> },
}

/// A decoded event with its timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    /// Delta-time from the previous event.
    pub delta: u32,
    /// Absolute position in ticks from the start of the track.
    pub tick: u64,
    pub kind: ParsedEventKind,
}

/// All events of one track chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmfTrackInfo {
    pub events: Vec<ParsedEvent>,
}

impl SmfTrackInfo {
    /// Absolute tick of the last event.
    pub fn total_ticks(&self) -> u64 {
        self.events.last().map(|e| e.tick).unwrap_or(0)
    }

    /// First tempo in the track, microseconds per quarter note.
    pub fn tempo(&self) -> Option<u32> {
        self.events.iter().find_map(|e| match e.kind {
            ParsedEventKind::Tempo { mpqn } => Some(mpqn),
            _ => None,
        })
    }

    /// Program changes in track order as `(channel, program)`.
    pub fn program_changes(&self) -> Vec<(u8, u8)> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                ParsedEventKind::ProgramChange { channel, program } => Some((channel, program)),
                _ => None,
            })
            .collect()
    }

    /// The program a channel ends up with (last program change wins).
    pub fn final_program(&self, channel: u8) -> Option<u8> {
        self.program_changes()
            .into_iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, p)| p)
            .last()
    }

    pub fn note_on_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, ParsedEventKind::NoteOn { .. }))
            .count()
    }

    pub fn note_off_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, ParsedEventKind::NoteOff { .. }))
            .count()
    }

    /// Note events only, in track order.
    pub fn notes(&self) -> Vec<&ParsedEvent> {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    ParsedEventKind::NoteOn { .. } | ParsedEventKind::NoteOff { .. }
                )
            })
            .collect()
    }
}

/// Result of validating an SMF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmfReport {
    /// Total file size in bytes.
    pub file_size: usize,
    pub header: SmfHeaderInfo,
    pub tracks: Vec<SmfTrackInfo>,
    /// Number of skipped non-`MTrk` chunks.
    pub alien_chunks: usize,
}

impl SmfReport {
    /// Tempo in BPM from the first tempo event of the first track.
    pub fn tempo_bpm(&self) -> Option<f64> {
        self.tracks
            .first()
            .and_then(|t| t.tempo())
            .filter(|mpqn| *mpqn > 0)
            .map(|mpqn| 60_000_000.0 / mpqn as f64)
    }
}

/// SMF validator.
pub struct SmfValidator;

impl SmfValidator {
    /// Validate an SMF from raw bytes and decode every track.
    pub fn validate(data: &[u8]) -> Result<SmfReport, SmfFormatError> {
        if data.len() < SMF_HEADER_CHUNK_SIZE {
            return Err(SmfFormatError::FileTooSmall {
                size: data.len(),
                minimum: SMF_HEADER_CHUNK_SIZE,
            });
        }
        if &data[0..4] != SMF_HEADER_MAGIC {
            return Err(SmfFormatError::InvalidHeaderMagic {
                found: data[0..4].to_vec(),
            });
        }

        let header_len = BigEndian::read_u32(&data[4..8]);
        if header_len < 6 {
            return Err(SmfFormatError::InvalidHeaderLength { length: header_len });
        }
        let header_end = chunk_end(data, 0, header_len)?;

        let raw_format = BigEndian::read_u16(&data[8..10]);
        let format = SmfFormat::from_u16(raw_format)
            .ok_or(SmfFormatError::UnknownFormat { format: raw_format })?;
        let header = SmfHeaderInfo {
            format,
            num_tracks: BigEndian::read_u16(&data[10..12]),
            division: BigEndian::read_u16(&data[12..14]),
        };

        let mut tracks = Vec::new();
        let mut alien_chunks = 0;
        let mut offset = header_end;

        while offset < data.len() {
            if data.len() - offset < 8 {
                return Err(SmfFormatError::TruncatedChunk {
                    offset,
                    declared: 8,
                    available: data.len() - offset,
                });
            }
            let len = BigEndian::read_u32(&data[offset + 4..offset + 8]);
            let end = chunk_end(data, offset, len)?;

            if &data[offset..offset + 4] == SMF_TRACK_MAGIC {
                let track = parse_track(&data[offset + 8..end], tracks.len())?;
                tracks.push(track);
            } else {
                alien_chunks += 1;
            }
            offset = end;
        }

        Ok(SmfReport {
            file_size: data.len(),
            header,
            tracks,
            alien_chunks,
        })
    }

    /// Check if data starts with an SMF header chunk (quick check).
    pub fn is_smf(data: &[u8]) -> bool {
        data.len() >= SMF_HEADER_CHUNK_SIZE && &data[0..4] == SMF_HEADER_MAGIC
    }
}

/// End offset of the chunk starting at `offset`, checked against the data.
fn chunk_end(data: &[u8], offset: usize, declared: u32) -> Result<usize, SmfFormatError> {
    let available = data.len() - offset - 8;
    if declared as usize > available {
        return Err(SmfFormatError::TruncatedChunk {
            offset,
            declared,
            available,
        });
    }
    Ok(offset + 8 + declared as usize)
}

fn parse_track(data: &[u8], track: usize) -> Result<SmfTrackInfo, SmfFormatError> {
    let mut events = Vec::new();
    let mut pos = 0;
    let mut tick: u64 = 0;
    let mut running_status: Option<u8> = None;

    while pos < data.len() {
        let delta =
            read_vlq(data, &mut pos).ok_or(SmfFormatError::InvalidVlq { track, offset: pos })?;
        tick += delta as u64;

        let event_offset = pos;
        let first = *data
            .get(pos)
            .ok_or(SmfFormatError::UnexpectedEndOfTrack { track, offset: pos })?;

        let status_byte = if first & 0x80 != 0 {
            pos += 1;
            first
        } else {
            running_status.ok_or(SmfFormatError::MissingRunningStatus {
                track,
                offset: event_offset,
            })?
        };

        let kind = match status_byte {
            status::META => {
                running_status = None;
                let meta_type = take(data, &mut pos, 1, track)?[0];
                let len = read_vlq(data, &mut pos)
                    .ok_or(SmfFormatError::InvalidVlq { track, offset: pos })?;
                let payload = take(data, &mut pos, len as usize, track)?;

                match meta_type {
                    meta::END_OF_TRACK => ParsedEventKind::EndOfTrack,
                    meta::TEMPO if payload.len() == 3 => ParsedEventKind::Tempo {
                        mpqn: BigEndian::read_u24(payload),
                    },
                    _ => ParsedEventKind::Meta {
                        meta_type,
                        data: payload.to_vec(),
                    },
                }
            }
            0xF0 | 0xF7 => {
                running_status = None;
                let len = read_vlq(data, &mut pos)
                    .ok_or(SmfFormatError::InvalidVlq { track, offset: pos })?;
                ParsedEventKind::SysEx {
                    data: take(data, &mut pos, len as usize, track)?.to_vec(),
                }
            }
            _ => {
                running_status = Some(status_byte);
                let channel = status_byte & 0x0F;
                let data_len = match status_byte & 0xF0 {
                    0xC0 | 0xD0 => 1,
                    _ => 2,
                };
                let bytes = take(data, &mut pos, data_len, track)?;

                match status_byte & 0xF0 {
                    status::NOTE_ON => ParsedEventKind::NoteOn {
                        channel,
                        key: bytes[0],
                        velocity: bytes[1],
                    },
                    status::NOTE_OFF => ParsedEventKind::NoteOff {
                        channel,
                        key: bytes[0],
                        velocity: bytes[1],
                    },
                    status::PROGRAM_CHANGE => ParsedEventKind::ProgramChange {
                        channel,
                        program: bytes[0],
                    },
                    _ => ParsedEventKind::Channel {
                        status: status_byte,
                        data: bytes.to_vec(),
                    },
                }
            }
        };

        let is_end = kind == ParsedEventKind::EndOfTrack;
        events.push(ParsedEvent { delta, tick, kind });

        if is_end {
            if pos != data.len() {
                return Err(SmfFormatError::TrailingTrackData { track, offset: pos });
            }
            return Ok(SmfTrackInfo { events });
        }
    }

    Err(SmfFormatError::MissingEndOfTrack { track })
}

fn take<'a>(
    data: &'a [u8],
    pos: &mut usize,
    len: usize,
    track: usize,
) -> Result<&'a [u8], SmfFormatError> {
    let end = pos
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or(SmfFormatError::UnexpectedEndOfTrack { track, offset: *pos })?;
    let slice = &data[*pos..end];
    *pos = end;
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smf::{SmfFile, TrackEventKind};
    use pretty_assertions::assert_eq;

    fn sample_file() -> Vec<u8> {
        let mut file = SmfFile::new(128);
        file.track.push(0, TrackEventKind::Tempo { mpqn: 500_000 });
        file.track.push(
            0,
            TrackEventKind::ProgramChange {
                channel: 1,
                program: 40,
            },
        );
        file.track.push(
            0,
            TrackEventKind::NoteOn {
                channel: 1,
                key: 60,
                velocity: 90,
            },
        );
        file.track.push(
            122,
            TrackEventKind::NoteOff {
                channel: 1,
                key: 60,
                velocity: 90,
            },
        );
        file.to_bytes().unwrap()
    }

    #[test]
    fn test_validates_writer_output() {
        let report = SmfValidator::validate(&sample_file()).unwrap();

        assert_eq!(report.header.format, SmfFormat::SingleTrack);
        assert_eq!(report.header.num_tracks, 1);
        assert_eq!(report.header.ppq(), Some(128));
        assert_eq!(report.tracks.len(), 1);
        assert_eq!(report.alien_chunks, 0);
        assert_eq!(report.tempo_bpm(), Some(120.0));

        let track = &report.tracks[0];
        assert_eq!(track.events.len(), 5);
        assert_eq!(track.program_changes(), vec![(1, 40)]);
        assert_eq!(track.note_on_count(), 1);
        assert_eq!(track.note_off_count(), 1);
        assert_eq!(track.total_ticks(), 122);
        assert_eq!(track.events.last().unwrap().kind, ParsedEventKind::EndOfTrack);
    }

    #[test]
    fn test_rejects_too_small_files() {
        let err = SmfValidator::validate(&[]).unwrap_err();
        assert!(matches!(err, SmfFormatError::FileTooSmall { .. }));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut data = sample_file();
        data[0] = b'X';
        let err = SmfValidator::validate(&data).unwrap_err();
        assert!(matches!(err, SmfFormatError::InvalidHeaderMagic { .. }));
        assert!(!SmfValidator::is_smf(&data));
    }

    #[test]
    fn test_rejects_truncated_track() {
        let data = sample_file();
        let err = SmfValidator::validate(&data[..data.len() - 2]).unwrap_err();
        assert!(matches!(err, SmfFormatError::TruncatedChunk { .. }));
    }

    #[test]
    fn test_rejects_missing_end_of_track() {
        let mut data = Vec::new();
        data.extend_from_slice(b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x80");
        data.extend_from_slice(b"MTrk\x00\x00\x00\x04\x00\x90\x3C\x40");
        let err = SmfValidator::validate(&data).unwrap_err();
        assert_eq!(err, SmfFormatError::MissingEndOfTrack { track: 0 });
    }

    #[test]
    fn test_running_status_and_alien_chunks() {
        let mut data = Vec::new();
        data.extend_from_slice(b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60");
        data.extend_from_slice(b"XFIH\x00\x00\x00\x02\xAB\xCD");
        // note on, running-status note on (velocity 0), end of track
        data.extend_from_slice(b"MTrk\x00\x00\x00\x0B\x00\x90\x3C\x40\x10\x3C\x00\x00\xFF\x2F\x00");

        let report = SmfValidator::validate(&data).unwrap();
        assert_eq!(report.alien_chunks, 1);

        let track = &report.tracks[0];
        assert_eq!(track.note_on_count(), 2);
        assert_eq!(track.events[1].tick, 16);
        assert_eq!(
            track.events[1].kind,
            ParsedEventKind::NoteOn {
                channel: 0,
                key: 0x3C,
                velocity: 0
            }
        );
    }

    #[test]
    fn test_rejects_data_byte_without_status() {
        let mut data = Vec::new();
        data.extend_from_slice(b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60");
        data.extend_from_slice(b"MTrk\x00\x00\x00\x03\x00\x3C\x40");
        let err = SmfValidator::validate(&data).unwrap_err();
        assert_eq!(
            err,
            SmfFormatError::MissingRunningStatus {
                track: 0,
                offset: 1
            }
        );
    }

    #[test]
    fn test_final_program_last_write_wins() {
        let mut file = SmfFile::new(128);
        for program in [40, 41] {
            file.track.push(
                0,
                TrackEventKind::ProgramChange {
                    channel: 1,
                    program,
                },
            );
        }
        let report = SmfValidator::validate(&file.to_bytes().unwrap()).unwrap();
        assert_eq!(report.tracks[0].final_program(1), Some(41));
        assert_eq!(report.tracks[0].final_program(2), None);
    }
}
