//! Runtime errors raised while evaluating a score.
//!
//! Every variant aborts the run. Events already sent to the sink stay there.

use thiserror::Error;

use crate::dsl::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("variable '{0}' not defined")]
    UndefinedVariable(String),

    #[error("undefined block: {0}")]
    UndefinedBlock(String),

    #[error("division by zero while modifying '{name}'")]
    DivisionByZero { name: String },

    #[error("arithmetic overflow while modifying '{name}'")]
    ArithmeticOverflow { name: String },

    #[error("pitch {pitch} is outside the MIDI range 0-127")]
    PitchOutOfRange { pitch: Value },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            EvalError::UndefinedVariable("x".into()).to_string(),
            "variable 'x' not defined"
        );
        assert_eq!(
            EvalError::UndefinedBlock("intro".into()).to_string(),
            "undefined block: intro"
        );
        assert_eq!(
            EvalError::PitchOutOfRange { pitch: 132 }.to_string(),
            "pitch 132 is outside the MIDI range 0-127"
        );
    }
}
