//! Named command blocks.

use std::collections::HashMap;

use crate::dsl::Command;

/// Block name → stored commands. Redefinition replaces the previous body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockRegistry {
    blocks: HashMap<String, Vec<Command>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `commands` under `name`, returning the body it replaced.
    pub fn define(&mut self, name: &str, commands: Vec<Command>) -> Option<Vec<Command>> {
        self.blocks.insert(name.to_string(), commands)
    }

    pub fn lookup(&self, name: &str) -> Option<&[Command]> {
        self.blocks.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
