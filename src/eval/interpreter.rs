//! Command evaluator and program driver.

use super::blocks::BlockRegistry;
use super::error::EvalError;
use super::timing::play_line;
use super::values::ValueStore;
use crate::dsl::{Command, Condition, Program, Value};
use crate::event::{Beat, EventSink, TrackId};

/// Tempo written at time zero of every run, and the default `tempo` variable.
pub const DEFAULT_TEMPO: Value = 120;

/// The variable whose assignment also emits a tempo change.
pub const TEMPO_VAR: &str = "tempo";

/// Everything a run mutates. Blocks execute against this same state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpreterState {
    pub values: ValueStore,
    pub blocks: BlockRegistry,
    pub clock: Beat,
}

/// Evaluates programs, sending tempo changes and notes to a sink.
pub struct Interpreter<S: EventSink> {
    state: InterpreterState,
    sink: S,
}

impl<S: EventSink> Interpreter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_state(InterpreterState::default(), sink)
    }

    /// Start from pre-populated state, e.g. variables set by the caller.
    pub fn with_state(state: InterpreterState, sink: S) -> Self {
        Self { state, sink }
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run a whole program from time zero.
    ///
    /// The first error stops the run. Nothing emitted before it is retracted.
    pub fn run(&mut self, program: &Program) -> Result<(), EvalError> {
        log::info!("running {} top-level commands", program.commands.len());

        self.sink.add_tempo(TrackId::MAIN, Beat::ZERO, DEFAULT_TEMPO);
        self.state.values.set_default(TEMPO_VAR, DEFAULT_TEMPO);
        self.state.clock = Beat::ZERO;

        for command in &program.commands {
            self.eval_command(command)?;
        }

        log::info!("run finished at beat {}", self.state.clock);
        Ok(())
    }

    /// Evaluate a single command against the current state.
    pub fn eval_command(&mut self, command: &Command) -> Result<(), EvalError> {
        log::trace!("eval at beat {}: {command:?}", self.state.clock);

        match command {
            Command::Assignment { name, value } => {
                self.state.values.set(name, *value);
                if name == TEMPO_VAR {
                    self.sink.add_tempo(TrackId::MAIN, self.state.clock, *value);
                }
            }
            Command::Modify { name, op, operand } => {
                let value = self.state.values.update(name, *op, *operand)?;
                log::debug!("{name} {} {operand} -> {value}", op.symbol());
            }
            Command::While { condition, body } => {
                while self.condition_holds(condition) {
                    for command in body {
                        self.eval_command(command)?;
                    }
                }
            }
            Command::NoteLine(entries) => {
                play_line(
                    entries,
                    &self.state.values,
                    &mut self.state.clock,
                    &mut self.sink,
                )?;
            }
            Command::BlockDefinition { name, commands } => {
                log::debug!("defining block '{name}' ({} commands)", commands.len());
                self.state.blocks.define(name, commands.clone());
            }
            Command::PlayBlock(name) => self.play_block(name)?,
        }

        Ok(())
    }

    /// False when the left-hand variable is unset; never an error.
    pub fn condition_holds(&self, condition: &Condition) -> bool {
        self.state
            .values
            .get(&condition.left)
            .is_some_and(|left| condition.comparator.compare(left, condition.right))
    }

    /// Replay a stored block. Only its note lines are played; assignments,
    /// loops and nested definitions inside a block body are skipped.
    fn play_block(&mut self, name: &str) -> Result<(), EvalError> {
        let InterpreterState {
            values,
            blocks,
            clock,
        } = &mut self.state;

        let commands = blocks
            .lookup(name)
            .ok_or_else(|| EvalError::UndefinedBlock(name.to_string()))?;
        log::debug!("playing block '{name}' at beat {clock}");

        for entries in commands.iter().filter_map(Command::as_note_line) {
            play_line(entries, values, clock, &mut self.sink)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{
        Accidental, Comparator, DurationCode, Letter, ModifyOp, Note, NoteOrRest, OctaveSource,
    };
    use crate::event::{EventLog, NoteEvent, SinkEvent};

    fn c_line(duration: DurationCode) -> Command {
        Command::NoteLine(vec![NoteOrRest::Note(Note {
            letter: Letter::C,
            octave: OctaveSource::Default,
            accidental: Accidental::Natural,
            duration,
        })])
    }

    fn assign(name: &str, value: Value) -> Command {
        Command::Assignment {
            name: name.into(),
            value,
        }
    }

    fn run(commands: Vec<Command>) -> (Result<(), EvalError>, Interpreter<EventLog>) {
        let mut interp = Interpreter::new(EventLog::new());
        let result = interp.run(&Program { commands });
        (result, interp)
    }

    #[test]
    fn run_emits_initial_tempo_and_default_variable() {
        let (result, interp) = run(vec![]);
        result.unwrap();
        assert_eq!(
            interp.sink().events(),
            &[SinkEvent::Tempo {
                track: TrackId::MAIN,
                time: Beat::ZERO,
                bpm: 120
            }]
        );
        assert_eq!(interp.state().values.get("tempo"), Some(120));
        assert_eq!(interp.state().clock, Beat::ZERO);
    }

    #[test]
    fn preset_tempo_variable_is_kept() {
        let mut state = InterpreterState::default();
        state.values.set("tempo", 80);
        let mut interp = Interpreter::with_state(state, EventLog::new());
        interp.run(&Program::default()).unwrap();
        assert_eq!(interp.state().values.get("tempo"), Some(80));
    }

    #[test]
    fn tempo_assignment_is_positional() {
        let (result, interp) = run(vec![c_line(DurationCode::Whole), assign("tempo", 90)]);
        result.unwrap();
        assert_eq!(
            interp.sink().events().last(),
            Some(&SinkEvent::Tempo {
                track: TrackId::MAIN,
                time: Beat::from_beats(4),
                bpm: 90
            })
        );
    }

    #[test]
    fn other_assignments_emit_nothing() {
        let (result, interp) = run(vec![assign("x", 3)]);
        result.unwrap();
        assert_eq!(interp.sink().len(), 1);
        assert_eq!(interp.state().values.get("x"), Some(3));
    }

    #[test]
    fn while_loop_counts() {
        let (result, interp) = run(vec![
            assign("i", 0),
            Command::While {
                condition: Condition {
                    left: "i".into(),
                    comparator: Comparator::Lt,
                    right: 3,
                },
                body: vec![
                    c_line(DurationCode::Quarter),
                    Command::Modify {
                        name: "i".into(),
                        op: ModifyOp::Add,
                        operand: 1,
                    },
                ],
            },
        ]);
        result.unwrap();
        let starts: Vec<Beat> = interp.sink().notes().map(|n| n.start).collect();
        assert_eq!(
            starts,
            vec![Beat::ZERO, Beat::from_beats(1), Beat::from_beats(2)]
        );
        assert_eq!(interp.state().values.get("i"), Some(3));
        assert_eq!(interp.state().clock, Beat::from_beats(3));
    }

    #[test]
    fn while_on_undefined_variable_never_runs() {
        let (result, interp) = run(vec![Command::While {
            condition: Condition {
                left: "y".into(),
                comparator: Comparator::Ne,
                right: 0,
            },
            body: vec![c_line(DurationCode::Quarter)],
        }]);
        result.unwrap();
        assert_eq!(interp.sink().notes().count(), 0);
        assert_eq!(interp.state().clock, Beat::ZERO);
    }

    #[test]
    fn modify_undefined_aborts_run() {
        let (result, interp) = run(vec![
            c_line(DurationCode::Quarter),
            Command::Modify {
                name: "ghost".into(),
                op: ModifyOp::Sub,
                operand: 1,
            },
            c_line(DurationCode::Quarter),
        ]);
        assert_eq!(result, Err(EvalError::UndefinedVariable("ghost".into())));
        assert_eq!(interp.sink().notes().count(), 1);
    }

    #[test]
    fn block_definition_does_not_execute() {
        let (result, interp) = run(vec![Command::BlockDefinition {
            name: "riff".into(),
            commands: vec![assign("x", 1), c_line(DurationCode::Quarter)],
        }]);
        result.unwrap();
        assert_eq!(interp.sink().notes().count(), 0);
        assert_eq!(interp.state().values.get("x"), None);
        assert!(interp.state().blocks.lookup("riff").is_some());
    }

    #[test]
    fn block_playback_only_plays_note_lines() {
        let (result, interp) = run(vec![
            assign("x", 5),
            Command::BlockDefinition {
                name: "riff".into(),
                commands: vec![
                    assign("x", 1),
                    c_line(DurationCode::Half),
                    Command::PlayBlock("missing".into()),
                    c_line(DurationCode::Quarter),
                ],
            },
            Command::PlayBlock("riff".into()),
        ]);
        result.unwrap();
        let notes: Vec<NoteEvent> = interp.sink().notes().copied().collect();
        assert_eq!(
            notes,
            vec![
                NoteEvent::new(60, Beat::ZERO, Beat::from_beats(2)),
                NoteEvent::new(60, Beat::from_beats(2), Beat::from_beats(1)),
            ]
        );
        assert_eq!(interp.state().values.get("x"), Some(5));
        assert_eq!(interp.state().clock, Beat::from_beats(3));
    }

    #[test]
    fn block_playback_uses_live_octave() {
        let line = Command::NoteLine(vec![NoteOrRest::Note(Note {
            letter: Letter::C,
            octave: OctaveSource::Variable("oct".into()),
            accidental: Accidental::Natural,
            duration: DurationCode::Quarter,
        })]);
        let (result, interp) = run(vec![
            Command::BlockDefinition {
                name: "b".into(),
                commands: vec![line],
            },
            assign("oct", 3),
            Command::PlayBlock("b".into()),
            assign("oct", 5),
            Command::PlayBlock("b".into()),
        ]);
        result.unwrap();
        let pitches: Vec<u8> = interp.sink().notes().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![48, 72]);
    }

    #[test]
    fn redefined_block_plays_latest_body() {
        let (result, interp) = run(vec![
            Command::BlockDefinition {
                name: "b".into(),
                commands: vec![c_line(DurationCode::Whole)],
            },
            Command::BlockDefinition {
                name: "b".into(),
                commands: vec![c_line(DurationCode::Eighth)],
            },
            Command::PlayBlock("b".into()),
        ]);
        result.unwrap();
        assert_eq!(interp.state().clock, Beat::from_beats_f64(0.5));
    }

    #[test]
    fn play_undefined_block_aborts_run() {
        let (result, interp) = run(vec![
            Command::PlayBlock("nope".into()),
            c_line(DurationCode::Quarter),
        ]);
        assert_eq!(result, Err(EvalError::UndefinedBlock("nope".into())));
        assert_eq!(interp.sink().notes().count(), 0);
    }

    #[test]
    fn condition_evaluation() {
        let mut state = InterpreterState::default();
        state.values.set("n", 2);
        let interp = Interpreter::with_state(state, EventLog::new());

        let cond = |comparator, right| Condition {
            left: "n".into(),
            comparator,
            right,
        };
        assert!(interp.condition_holds(&cond(Comparator::Eq, 2)));
        assert!(interp.condition_holds(&cond(Comparator::Ge, 2)));
        assert!(!interp.condition_holds(&cond(Comparator::Gt, 2)));
        assert!(!interp.condition_holds(&Condition {
            left: "unset".into(),
            comparator: Comparator::Ne,
            right: 0,
        }));
    }
}
