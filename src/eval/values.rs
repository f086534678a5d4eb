//! Variable environment for one run.

use std::collections::HashMap;

use super::error::EvalError;
use crate::dsl::{ModifyOp, Value};

/// Name → value mapping. Assignment creates, modification requires existence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    vars: HashMap<String, Value>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.vars.get(name).copied()
    }

    /// Create or overwrite a variable.
    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    /// Set a variable only if it has no value yet.
    pub fn set_default(&mut self, name: &str, value: Value) {
        self.vars.entry(name.to_string()).or_insert(value);
    }

    /// Apply a compound operator to an existing variable and return the new value.
    ///
    /// `/=` is floor division: `7 / 2 == 3`, `-7 / 2 == -4`.
    pub fn update(&mut self, name: &str, op: ModifyOp, operand: Value) -> Result<Value, EvalError> {
        let slot = self
            .vars
            .get_mut(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))?;

        let current = *slot;
        let next = match op {
            ModifyOp::Add => current.checked_add(operand),
            ModifyOp::Sub => current.checked_sub(operand),
            ModifyOp::Mul => current.checked_mul(operand),
            ModifyOp::Div => {
                if operand == 0 {
                    return Err(EvalError::DivisionByZero {
                        name: name.to_string(),
                    });
                }
                floor_div(current, operand)
            }
        }
        .ok_or_else(|| EvalError::ArithmeticOverflow {
            name: name.to_string(),
        })?;

        *slot = next;
        Ok(next)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(lhs: Value, rhs: Value) -> Option<Value> {
    let quotient = lhs.checked_div(rhs)?;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}
