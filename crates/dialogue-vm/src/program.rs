//! Compiled program artifact
//!
//! A mapping of block name to instruction sequence plus the template of
//! initial global-variable values. Built once by the compiler and read-only
//! for the life of a run.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::value::Value;

/// Default entry (and terminal) block name
pub const ENTRY_BLOCK: &str = "start";

/// Name of a block, the unit of `goto` transfer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub String);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A named, ordered sequence of instructions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Append an instruction
    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Append every instruction of another block
    pub fn extend(&mut self, other: Block) {
        self.instructions.extend(other.instructions);
    }
}

/// The compiled artifact the engine executes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    blocks: IndexMap<BlockId, Block>,
    /// Initial global-variable values, copied into each run's store
    globals: IndexMap<String, Value>,
    /// Entry block; also the terminal block for normal fallthrough halt
    entry: BlockId,
}

impl Program {
    pub fn new(blocks: IndexMap<BlockId, Block>, globals: IndexMap<String, Value>) -> Self {
        Self {
            blocks,
            globals,
            entry: BlockId::from(ENTRY_BLOCK),
        }
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn contains_block(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn entry(&self) -> &BlockId {
        &self.entry
    }

    pub fn global_template(&self) -> &IndexMap<String, Value> {
        &self.globals
    }
}
