//! Score evaluator: walks a [`Program`](crate::dsl::Program) and emits timed events.
//!
//! One [`Interpreter`] owns one run's state: the variable store, the block
//! registry and the playback clock. Execution is synchronous; a `while`
//! whose condition never turns false runs forever.

pub mod blocks;
pub mod error;
pub mod interpreter;
pub mod timing;
pub mod values;

pub use blocks::BlockRegistry;
pub use error::EvalError;
pub use interpreter::{Interpreter, InterpreterState, DEFAULT_TEMPO, TEMPO_VAR};
pub use values::ValueStore;
