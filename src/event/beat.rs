//! Musical time representation using integer ticks.
//!
//! The playback clock counts in 960 PPQN ticks so that chord and rest
//! durations add up exactly. Conversion to MIDI file ticks happens only at
//! the export boundary.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// Ticks per quarter note (beat). 960 divides cleanly by 2, 3, 4, 5, 6, 8,
/// 10, 12, 15, 16, 20, 24, 32, etc.
pub const TICKS_PER_BEAT: u64 = 960;

/// Musical time measured in integer ticks at [`TICKS_PER_BEAT`] resolution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Beat {
    ticks: u64,
}

impl Beat {
    /// Zero time: the very start of the score.
    pub const ZERO: Beat = Beat { ticks: 0 };

    /// Create a `Beat` from a raw tick count.
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Create a `Beat` from whole beats (quarter notes).
    pub const fn from_beats(beats: u32) -> Self {
        Self {
            ticks: beats as u64 * TICKS_PER_BEAT,
        }
    }

    /// Create a `Beat` from a fractional beat value (e.g. 1.5 = one and a half beats).
    pub fn from_beats_f64(beats: f64) -> Self {
        Self {
            ticks: (beats * TICKS_PER_BEAT as f64).round() as u64,
        }
    }

    /// Return the raw tick count.
    pub fn ticks(self) -> u64 {
        self.ticks
    }

    /// Convert to a floating-point beat value.
    pub fn as_beats_f64(self) -> f64 {
        self.ticks as f64 / TICKS_PER_BEAT as f64
    }

    /// Rescale this position to another PPQN resolution, rounding to the
    /// nearest tick.
    pub fn to_resolution(self, ticks_per_beat: u16) -> u64 {
        let scaled = self.ticks as u128 * ticks_per_beat as u128;
        let half = TICKS_PER_BEAT as u128 / 2;
        ((scaled + half) / TICKS_PER_BEAT as u128) as u64
    }
}

impl Ord for Beat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ticks.cmp(&other.ticks)
    }
}

impl PartialOrd for Beat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Beat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks + rhs.ticks,
        }
    }
}

impl Sub for Beat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks.saturating_sub(rhs.ticks),
        }
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_beats_f64())
    }
}
