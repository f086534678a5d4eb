//! notelang: a small music-notation language rendered to MIDI.

pub mod dsl;
pub mod eval;
pub mod event;
pub mod midi;
