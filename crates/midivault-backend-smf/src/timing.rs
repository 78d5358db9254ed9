//! Tempo, resolution, and millisecond-to-tick conversion.

use crate::encode::EncodeError;
use crate::smf::{MAX_TEMPO_MPQN, SMF_MAX_PPQ, VLQ_MAX};

/// Default tempo in beats per minute.
pub const DEFAULT_BPM: f64 = 120.0;

/// Default resolution in pulses per quarter note.
pub const DEFAULT_PPQ: u16 = 128;

/// Tempo and resolution of an encoded track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub bpm: f64,
    pub ppq: u16,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            ppq: DEFAULT_PPQ,
        }
    }
}

impl Timing {
    /// Create a timing, rejecting values that cannot be encoded.
    pub fn new(bpm: f64, ppq: u16) -> Result<Self, EncodeError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(EncodeError::InvalidParameter(format!(
                "bpm must be a positive number, got {}",
                bpm
            )));
        }
        if ppq == 0 || ppq > SMF_MAX_PPQ {
            return Err(EncodeError::InvalidParameter(format!(
                "ppq must be between 1 and {}, got {}",
                SMF_MAX_PPQ, ppq
            )));
        }
        Ok(Self { bpm, ppq })
    }

    /// Milliseconds per tick: `60000 / (bpm * ppq)`.
    pub fn ms_per_tick(&self) -> f64 {
        60_000.0 / (self.bpm * self.ppq as f64)
    }

    /// Tempo meta value: microseconds per quarter note, floored.
    pub fn tempo_mpqn(&self) -> u32 {
        let mpqn = (60_000_000.0 / self.bpm).floor();
        if mpqn.is_finite() {
            (mpqn as u32).min(MAX_TEMPO_MPQN)
        } else {
            MAX_TEMPO_MPQN
        }
    }
}

/// Converts an absolute time in milliseconds to a tick position.
///
/// Rounding rule: truncation toward zero. Non-finite results map to 0.
pub fn ms_to_ticks(time: f64, ms_per_tick: f64) -> i64 {
    let ticks = (time / ms_per_tick).trunc();
    if ticks.is_finite() {
        ticks as i64
    } else {
        0
    }
}

/// Delta between two tick positions, saturated to `0..=VLQ_MAX`.
pub fn delta_ticks(from: i64, to: i64) -> u32 {
    to.saturating_sub(from).clamp(0, VLQ_MAX as i64) as u32
}
