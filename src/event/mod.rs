//! Event stream: musical time, note events and the sinks that receive them.
//!
//! The interpreter produces events in timeline order through the
//! [`EventSink`] trait. Nothing here knows about MIDI files; the
//! [`crate::midi`] module turns a recorded [`EventLog`] into bytes.

pub mod beat;
pub mod sink;
pub mod types;

pub use beat::{Beat, TICKS_PER_BEAT};
pub use sink::{EventLog, EventSink};
pub use types::{NoteEvent, SinkEvent, TrackId, DEFAULT_VELOCITY, MAIN_CHANNEL};
