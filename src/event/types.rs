//! Event data model: what the interpreter hands to its sink.
//!
//! A [`SinkEvent`] is either a tempo change or a single [`NoteEvent`] at a
//! specific point in musical time.

use std::fmt;

use super::beat::Beat;

/// Identifies a track in the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TrackId(pub u32);

impl TrackId {
    /// The single track every run writes to.
    pub const MAIN: TrackId = TrackId(0);
}

/// Channel every note is written on.
pub const MAIN_CHANNEL: u8 = 0;

/// Velocity every note is written with.
pub const DEFAULT_VELOCITY: u8 = 100;

/// A single sounding note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub track: TrackId,
    pub channel: u8,
    /// MIDI note number (0–127).
    pub pitch: u8,
    /// When the note starts, in musical time.
    pub start: Beat,
    /// How long the note sounds.
    pub duration: Beat,
    pub velocity: u8,
}

impl NoteEvent {
    /// Create a note on the main track and channel with the default velocity.
    pub fn new(pitch: u8, start: Beat, duration: Beat) -> Self {
        Self {
            track: TrackId::MAIN,
            channel: MAIN_CHANNEL,
            pitch,
            start,
            duration,
            velocity: DEFAULT_VELOCITY,
        }
    }

    /// Time at which the note is released.
    pub fn end(&self) -> Beat {
        self.start + self.duration
    }
}

/// One operation received by a sink, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Tempo { track: TrackId, time: Beat, bpm: i64 },
    Note(NoteEvent),
}

impl SinkEvent {
    /// Position of the event on the timeline.
    pub fn time(&self) -> Beat {
        match self {
            SinkEvent::Tempo { time, .. } => *time,
            SinkEvent::Note(note) => note.start,
        }
    }
}

impl fmt::Display for SinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkEvent::Tempo { track, time, bpm } => {
                write!(f, "tempo track={} time={time} bpm={bpm}", track.0)
            }
            SinkEvent::Note(n) => write!(
                f,
                "note  track={} ch={} pitch={} start={} dur={} vel={}",
                n.track.0, n.channel, n.pitch, n.start, n.duration, n.velocity
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_constructor_uses_defaults() {
        let n = NoteEvent::new(60, Beat::from_beats(2), Beat::from_beats(1));
        assert_eq!(n.track, TrackId::MAIN);
        assert_eq!(n.channel, 0);
        assert_eq!(n.velocity, 100);
        assert_eq!(n.end(), Beat::from_beats(3));
    }

    #[test]
    fn event_time() {
        let tempo = SinkEvent::Tempo {
            track: TrackId::MAIN,
            time: Beat::from_beats(4),
            bpm: 90,
        };
        assert_eq!(tempo.time(), Beat::from_beats(4));

        let note = SinkEvent::Note(NoteEvent::new(64, Beat::from_beats(1), Beat::from_beats(1)));
        assert_eq!(note.time(), Beat::from_beats(1));
    }

    #[test]
    fn display_lists_fields() {
        let note = SinkEvent::Note(NoteEvent::new(61, Beat::ZERO, Beat::from_beats_f64(0.5)));
        assert_eq!(
            note.to_string(),
            "note  track=0 ch=0 pitch=61 start=0 dur=0.5 vel=100"
        );

        let tempo = SinkEvent::Tempo {
            track: TrackId::MAIN,
            time: Beat::from_beats(4),
            bpm: 90,
        };
        assert_eq!(tempo.to_string(), "tempo track=0 time=4 bpm=90");
    }
}
