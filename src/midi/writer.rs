//! Standard MIDI File export.
//!
//! Turns a recorded event stream into a single-track (format 0) SMF. Each
//! note becomes a note-on/note-off pair; tempo changes become tempo meta
//! events at their positions.

use std::path::{Path, PathBuf};

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use thiserror::Error;

use crate::event::{Beat, SinkEvent};

/// Largest delta time a variable-length quantity can hold.
const MAX_DELTA: u64 = (1 << 28) - 1;

/// Metrical timing is a 15-bit field.
pub const MAX_TICKS_PER_BEAT: u16 = 0x7FFF;

/// Largest value of a 24-bit tempo meta event.
const MAX_TEMPO_MICROS: u64 = (1 << 24) - 1;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid tempo {bpm} bpm at beat {time}")]
    InvalidTempo { bpm: i64, time: Beat },

    #[error("resolution must be 1-32767 ticks per beat, got {0}")]
    InvalidResolution(u16),

    #[error("event at beat {0} is too far from the previous event to encode")]
    DeltaTooLarge(Beat),

    #[error("failed to encode MIDI data: {0}")]
    Encode(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A MIDI message pinned to an absolute tick.
struct TimedMessage {
    ticks: u64,
    /// Tie-break at equal ticks: tempo, then note-off, then note-on.
    rank: u8,
    at: Beat,
    kind: TrackEventKind<'static>,
}

/// Microseconds per quarter note for a tempo, if it fits a tempo meta event.
fn tempo_micros(bpm: i64) -> Option<u32> {
    if bpm <= 0 {
        return None;
    }
    let micros = 60_000_000 / bpm as u64;
    if micros == 0 || micros > MAX_TEMPO_MICROS {
        return None;
    }
    Some(micros as u32)
}

fn collect_messages(
    events: &[SinkEvent],
    ticks_per_beat: u16,
) -> Result<Vec<TimedMessage>, ExportError> {
    let mut messages = Vec::with_capacity(events.len() * 2);

    for event in events {
        match event {
            SinkEvent::Tempo { bpm, .. } => {
                let at = event.time();
                let micros =
                    tempo_micros(*bpm).ok_or(ExportError::InvalidTempo { bpm: *bpm, time: at })?;
                messages.push(TimedMessage {
                    ticks: at.to_resolution(ticks_per_beat),
                    rank: 0,
                    at,
                    kind: TrackEventKind::Meta(MetaMessage::Tempo(micros.into())),
                });
            }
            SinkEvent::Note(note) => {
                let channel = note.channel.into();
                let start_ticks = note.start.to_resolution(ticks_per_beat);
                // A note shorter than one output tick still sounds for one tick.
                let end_ticks = note.end().to_resolution(ticks_per_beat).max(start_ticks + 1);
                messages.push(TimedMessage {
                    ticks: end_ticks,
                    rank: 1,
                    at: note.end(),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOff {
                            key: note.pitch.into(),
                            vel: 0u8.into(),
                        },
                    },
                });
                messages.push(TimedMessage {
                    ticks: start_ticks,
                    rank: 2,
                    at: note.start,
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOn {
                            key: note.pitch.into(),
                            vel: note.velocity.into(),
                        },
                    },
                });
            }
        }
    }

    // Stable: simultaneous messages of one rank keep emission order.
    messages.sort_by_key(|m| (m.ticks, m.rank));
    Ok(messages)
}

/// Encode events as SMF bytes at `ticks_per_beat` resolution.
pub fn encode_smf(events: &[SinkEvent], ticks_per_beat: u16) -> Result<Vec<u8>, ExportError> {
    if ticks_per_beat == 0 || ticks_per_beat > MAX_TICKS_PER_BEAT {
        return Err(ExportError::InvalidResolution(ticks_per_beat));
    }
    let header = Header::new(Format::SingleTrack, Timing::Metrical(ticks_per_beat.into()));

    let mut track = Vec::new();
    let mut last_ticks = 0u64;
    for msg in collect_messages(events, ticks_per_beat)? {
        let delta = msg.ticks - last_ticks;
        if delta > MAX_DELTA {
            return Err(ExportError::DeltaTooLarge(msg.at));
        }
        track.push(TrackEvent {
            delta: (delta as u32).into(),
            kind: msg.kind,
        });
        last_ticks = msg.ticks;
    }
    track.push(TrackEvent {
        delta: 0u32.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(header);
    smf.tracks.push(track);

    let mut buffer = Vec::new();
    smf.write(&mut buffer)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode events and write them to `path`, replacing any existing file.
pub fn write_midi_file(
    path: &Path,
    events: &[SinkEvent],
    ticks_per_beat: u16,
) -> Result<(), ExportError> {
    let bytes = encode_smf(events, ticks_per_beat)?;
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        std::fs::remove_file(path).map_err(io_err)?;
    }
    std::fs::write(path, &bytes).map_err(io_err)?;

    log::info!(
        "wrote {} ({} events, {} bytes)",
        path.display(),
        events.len(),
        bytes.len()
    );
    Ok(())
}
