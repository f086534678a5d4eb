//! Event sinks: where the interpreter sends tempo changes and notes.
//!
//! The interpreter never encodes anything itself. It calls [`EventSink`]
//! methods in timeline order, and the sink decides what to do with them.
//! [`EventLog`] records every call so the run can be inspected or exported
//! afterwards.

use super::beat::Beat;
use super::types::{NoteEvent, SinkEvent, TrackId};

/// Receiver of the ordered event stream produced by a run.
pub trait EventSink {
    /// Record a tempo change at `time`.
    fn add_tempo(&mut self, track: TrackId, time: Beat, bpm: i64);

    /// Record a sounding note.
    fn add_note(&mut self, note: NoteEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn add_tempo(&mut self, track: TrackId, time: Beat, bpm: i64) {
        (**self).add_tempo(track, time, bpm);
    }

    fn add_note(&mut self, note: NoteEvent) {
        (**self).add_note(note);
    }
}

/// An in-memory sink that keeps every event in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<SinkEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in call order.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Only the recorded notes, in call order.
    pub fn notes(&self) -> impl Iterator<Item = &NoteEvent> {
        self.events.iter().filter_map(|e| match e {
            SinkEvent::Note(n) => Some(n),
            SinkEvent::Tempo { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<SinkEvent> {
        self.events
    }
}

impl EventSink for EventLog {
    fn add_tempo(&mut self, track: TrackId, time: Beat, bpm: i64) {
        self.events.push(SinkEvent::Tempo { track, time, bpm });
    }

    fn add_note(&mut self, note: NoteEvent) {
        self.events.push(SinkEvent::Note(note));
    }
}
