//! Standard MIDI File (SMF) writer and validator.
//!
//! # SMF Overview
//!
//! An SMF is a sequence of chunks, each an ASCII id followed by a 32-bit
//! big-endian length:
//! - `MThd`: format, track count and time division (pulses per quarter note)
//! - `MTrk`: a stream of events, each preceded by a variable-length delta-time
//!
//! The writer here produces format 0 files (one track). The validator reads
//! any format so that stored artifacts can be inspected and checked.

mod header;
mod track;
mod validator;
mod vlq;
mod writer;

pub use header::*;
pub use track::*;
pub use validator::*;
pub use vlq::*;
pub use writer::*;
