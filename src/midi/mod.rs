//! MIDI file output: configuration and Standard MIDI File encoding.

pub mod config;
pub mod writer;

pub use config::MidiOutputConfig;
pub use writer::{encode_smf, write_midi_file, ExportError};
