//! Abstract Syntax Tree for the notelang score language.
//!
//! The parser builds these types once; the interpreter only reads them.

use crate::event::Beat;

/// Every variable holds a signed integer.
pub type Value = i64;

/// A complete score: top-level commands in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub commands: Vec<Command>,
}

/// One executable command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `name = value`
    Assignment { name: String, value: Value },
    /// `name += operand` and friends.
    Modify {
        name: String,
        op: ModifyOp,
        operand: Value,
    },
    /// `while cond { ... }`
    While {
        condition: Condition,
        body: Vec<Command>,
    },
    /// `[C:4 E:4 G:1]`: entries that sound together.
    NoteLine(Vec<NoteOrRest>),
    /// `block name { ... }`
    BlockDefinition { name: String, commands: Vec<Command> },
    /// `play name`
    PlayBlock(String),
}

impl Command {
    /// The entries of a note line, or `None` for every other command.
    pub fn as_note_line(&self) -> Option<&[NoteOrRest]> {
        match self {
            Command::NoteLine(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Compound assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOp {
    Add,
    Sub,
    Mul,
    /// Floor division.
    Div,
}

impl ModifyOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ModifyOp::Add => "+=",
            ModifyOp::Sub => "-=",
            ModifyOp::Mul => "*=",
            ModifyOp::Div => "/=",
        }
    }
}

/// `left comparator right`, where `left` names a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: String,
    pub comparator: Comparator,
    pub right: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    pub fn compare(self, left: Value, right: Value) -> bool {
        match self {
            Comparator::Eq => left == right,
            Comparator::Ne => left != right,
            Comparator::Lt => left < right,
            Comparator::Le => left <= right,
            Comparator::Gt => left > right,
            Comparator::Ge => left >= right,
        }
    }
}

/// One member of a note line.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteOrRest {
    Note(Note),
    Rest(DurationCode),
}

impl NoteOrRest {
    pub fn duration(&self) -> DurationCode {
        match self {
            NoteOrRest::Note(note) => note.duration,
            NoteOrRest::Rest(duration) => *duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub letter: Letter,
    pub octave: OctaveSource,
    pub accidental: Accidental,
    pub duration: DurationCode,
}

/// Where a note takes its octave from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OctaveSource {
    Literal(Value),
    Variable(String),
    /// No octave written; resolves to the default.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

/// Note-length token: `1` whole, `2` half, `4` quarter, `8` eighth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationCode {
    Whole,
    Half,
    Quarter,
    Eighth,
}

impl DurationCode {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(DurationCode::Whole),
            "2" => Some(DurationCode::Half),
            "4" => Some(DurationCode::Quarter),
            "8" => Some(DurationCode::Eighth),
            _ => None,
        }
    }

    /// Length in beats: 4.0, 2.0, 1.0 and 0.5.
    pub fn beats(self) -> Beat {
        match self {
            DurationCode::Whole => Beat::from_beats(4),
            DurationCode::Half => Beat::from_beats(2),
            DurationCode::Quarter => Beat::from_beats(1),
            DurationCode::Eighth => Beat::from_ticks(crate::event::TICKS_PER_BEAT / 2),
        }
    }
}
