//! SMF file writer - assembles the header and track into a complete file.

use std::io::{self, Write};

use super::header::SmfHeader;
use super::track::SmfTrack;

/// A single-track Standard MIDI File.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmfFile {
    /// File header.
    pub header: SmfHeader,
    /// The one track of the file.
    pub track: SmfTrack,
}

impl SmfFile {
    /// Create an empty single-track file with the given resolution.
    pub fn new(ppq: u16) -> Self {
        Self {
            header: SmfHeader::single_track(ppq),
            track: SmfTrack::new(),
        }
    }

    /// Create a file around an already-built track.
    pub fn with_track(ppq: u16, track: SmfTrack) -> Self {
        Self {
            header: SmfHeader::single_track(ppq),
            track,
        }
    }

    /// Write the complete file to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.header.write(writer)?;
        self.track.write(writer)?;
        Ok(())
    }

    /// Write the file to a byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smf::track::TrackEventKind;
    use crate::smf::SMF_HEADER_CHUNK_SIZE;

    #[test]
    fn test_empty_file_layout() {
        let bytes = SmfFile::new(128).to_bytes().unwrap();
        assert_eq!(bytes.len(), SMF_HEADER_CHUNK_SIZE + 8 + 4);
        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(&bytes[14..18], b"MTrk");
    }

    #[test]
    fn test_bytes_determinism() {
        let mut file1 = SmfFile::new(128);
        file1.track.push(0, TrackEventKind::Tempo { mpqn: 500_000 });
        let mut file2 = SmfFile::new(128);
        file2.track.push(0, TrackEventKind::Tempo { mpqn: 500_000 });

        assert_eq!(file1.to_bytes().unwrap(), file2.to_bytes().unwrap());

        file2.track.push(
            5,
            TrackEventKind::NoteOn {
                channel: 0,
                key: 60,
                velocity: 90,
            },
        );
        assert_ne!(file1.to_bytes().unwrap(), file2.to_bytes().unwrap());
    }
}
