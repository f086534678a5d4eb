//! Note-line timing.
//!
//! All entries of a line start together at the current clock. Each note keeps
//! its own length, and the clock moves on by the longest entry.

use super::error::EvalError;
use super::values::ValueStore;
use crate::dsl::note::{resolve_pitch, to_midi_note, DEFAULT_OCTAVE};
use crate::dsl::{Note, NoteOrRest, OctaveSource, Value};
use crate::event::{Beat, EventSink, NoteEvent};

/// Length of a line: its longest entry, or zero when empty.
pub fn line_duration(entries: &[NoteOrRest]) -> Beat {
    entries
        .iter()
        .map(|entry| entry.duration().beats())
        .max()
        .unwrap_or(Beat::ZERO)
}

/// Octave for a note. An unset variable falls through to the default.
pub fn resolve_octave(octave: &OctaveSource, values: &ValueStore) -> Value {
    match octave {
        OctaveSource::Variable(name) => values.get(name).unwrap_or(DEFAULT_OCTAVE),
        OctaveSource::Literal(octave) => *octave,
        OctaveSource::Default => DEFAULT_OCTAVE,
    }
}

/// MIDI note number for a note in the current environment.
pub fn note_pitch(note: &Note, values: &ValueStore) -> Result<u8, EvalError> {
    let octave = resolve_octave(&note.octave, values);
    let pitch = resolve_pitch(note.letter, octave, note.accidental);
    log::debug!(
        "note {:?}{:?} octave {:?} -> {octave}, pitch {pitch}",
        note.letter,
        note.accidental,
        note.octave
    );
    to_midi_note(pitch).ok_or(EvalError::PitchOutOfRange { pitch })
}

/// Play one note line: emit every note at `clock`, then advance `clock`.
///
/// A pitch error aborts the line midway; notes already emitted stay emitted
/// and the clock is left where the line started.
pub fn play_line<S: EventSink + ?Sized>(
    entries: &[NoteOrRest],
    values: &ValueStore,
    clock: &mut Beat,
    sink: &mut S,
) -> Result<(), EvalError> {
    let line_start = *clock;
    let max_duration = line_duration(entries);

    for entry in entries {
        match entry {
            NoteOrRest::Note(note) => {
                let pitch = note_pitch(note, values)?;
                sink.add_note(NoteEvent::new(pitch, line_start, note.duration.beats()));
            }
            NoteOrRest::Rest(duration) => {
                log::debug!("rest for {} beats", duration.beats());
            }
        }
    }

    *clock = line_start + max_duration;
    Ok(())
}
