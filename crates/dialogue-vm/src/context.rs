//! Execution context
//!
//! The engine's mutable run state: alive flag, current block, instruction
//! pointer, operand stack, and the variable store. Constructed once per run
//! and discarded when the run ends.

use crate::error::{Error, Result};
use crate::program::BlockId;
use crate::store::VariableStore;
use crate::value::Value;

/// Mutable state of a single run
#[derive(Debug)]
pub struct Context {
    pub alive: bool,
    pub block: BlockId,
    /// May momentarily point past the end of the block; the loop checks
    /// bounds before each fetch.
    pub ip: usize,
    stack: Vec<Value>,
    store: VariableStore,
}

impl Context {
    pub fn new(entry: BlockId) -> Self {
        Self {
            alive: true,
            block: entry,
            ip: 0,
            stack: Vec::new(),
            store: VariableStore::new(),
        }
    }

    /// Push a value onto the operand stack.
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop the most recent operand.
    pub fn pop(&mut self) -> Result<Value> {
        self.stack.pop().ok_or(Error::StackUnderflow {
            needed: 1,
            depth: 0,
        })
    }

    /// Discard the top `count` operands.
    pub fn pop_multi(&mut self, count: usize) -> Result<()> {
        let depth = self.stack.len();
        if depth < count {
            return Err(Error::StackUnderflow {
                needed: count,
                depth,
            });
        }
        self.stack.truncate(depth - count);
        Ok(())
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut VariableStore {
        &mut self.store
    }
}
