//! Bytecode instruction set
//!
//! The closed set of operations a compiled dialogue block is made of.
//! Instructions never reference each other by identity, only by integer
//! offset within the current block, so a block is just an ordered
//! `Vec<Instruction>`. Dispatch is a single `match` in the engine.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::program::BlockId;
use crate::value::Value;

/// One player-facing choice as presented by an `Options` instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogOption {
    /// 1-based ordinal shown to the player
    pub ordinal: u32,
    pub text: String,
}

impl DialogOption {
    pub fn new(ordinal: u32, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }
}

/// Binary connective applied by `Instruction::BinaryOp`
///
/// `And`/`Or` are non-short-circuiting and operand-returning: they yield
/// one of the two original values, never a coerced boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Structural value equality, pushes a boolean
    Equals,
    /// Left operand if falsy, else right operand
    And,
    /// Left operand if truthy, else right operand
    Or,
}

impl BinaryOp {
    /// Apply the connective to `left` and `right` (right was the most
    /// recently pushed operand).
    pub fn apply(self, left: Value, right: Value) -> Value {
        match self {
            BinaryOp::Equals => Value::Boolean(left == right),
            BinaryOp::And => {
                if left.is_truthy() {
                    right
                } else {
                    left
                }
            }
            BinaryOp::Or => {
                if left.is_truthy() {
                    left
                } else {
                    right
                }
            }
        }
    }
}

/// A single bytecode operation
///
/// Unless an instruction says otherwise, the instruction pointer advances
/// by one, applied by the loop before dispatch; jump instructions overwrite
/// that pre-advanced value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Emit a character line; `text` is template-expanded at execution time
    Says { character: String, text: String },

    /// End the run
    Exit,

    /// Transfer to another block, ip reset to 0
    GotoBlock(BlockId),

    /// Set the ip to a literal position within the current block
    GotoAbsolute(usize),

    /// Add a signed delta to the (pre-advanced) ip
    GotoOffset(isize),

    /// No effect
    Nop,

    /// Push a literal onto the operand stack
    PushLiteral(Value),

    /// Push the value of a variable
    LoadVar(String),

    /// Pop one value and write it to a variable
    WriteVar(String),

    /// Pop and discard one value
    Pop,

    /// Pop and discard `count` values; `count > 0` by construction
    PopMulti(usize),

    /// Pop right then left, apply the connective, push the result
    BinaryOp(BinaryOp),

    /// Suspend for a player choice; selection `k` adds `k - 1` to the ip
    Options(Vec<DialogOption>),
}

impl Instruction {
    /// Checked constructor for `PopMulti`: the count must be positive.
    pub fn pop_multi(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidOperand(
                "pop count must be positive".to_string(),
            ));
        }
        Ok(Instruction::PopMulti(count))
    }
}
