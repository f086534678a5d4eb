//! Pitch resolution: converts letter, octave and accidental to MIDI note numbers.

use super::ast::{Accidental, Letter, Value};

/// Octave used when a note names none, or names a variable that is unset.
pub const DEFAULT_OCTAVE: Value = 4;

/// MIDI number of each natural in [`DEFAULT_OCTAVE`]. C4 = middle C = 60.
fn base_pitch(letter: Letter) -> Value {
    match letter {
        Letter::C => 60,
        Letter::D => 62,
        Letter::E => 64,
        Letter::F => 65,
        Letter::G => 67,
        Letter::A => 69,
        Letter::B => 71,
    }
}

/// Absolute pitch number for a note.
///
/// `base + (octave - 4) * 12`, then one semitone up for a sharp or down for a
/// flat. The result is not range-checked; see [`to_midi_note`]. Arithmetic
/// saturates, so absurd octaves still land far outside the MIDI range.
pub fn resolve_pitch(letter: Letter, octave: Value, accidental: Accidental) -> Value {
    let shift = octave.saturating_sub(DEFAULT_OCTAVE).saturating_mul(12);
    let pitch = base_pitch(letter).saturating_add(shift);
    match accidental {
        Accidental::Natural => pitch,
        Accidental::Sharp => pitch.saturating_add(1),
        Accidental::Flat => pitch.saturating_sub(1),
    }
}

/// Narrow a pitch number to a MIDI note (0–127).
pub fn to_midi_note(pitch: Value) -> Option<u8> {
    u8::try_from(pitch).ok().filter(|p| *p <= 127)
}
