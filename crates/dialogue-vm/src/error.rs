//! Runtime errors

use thiserror::Error;

use crate::program::BlockId;

/// Runtime result type
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime errors
///
/// Every variant is fatal for the run: the engine never catches or retries
/// internally. Invalid player input is handled by the host driver and never
/// surfaces here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unbound variable(s): {names:?}")]
    UnboundVariable { names: Vec<String> },

    #[error("unknown block: {0}")]
    UnknownBlock(BlockId),

    #[error("operand stack underflow: needed {needed}, had {depth}")]
    StackUnderflow { needed: usize, depth: usize },

    #[error("block {0} exhausted without exit or transfer")]
    UnhandledFallthrough(BlockId),

    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("no choice is pending")]
    NoPendingChoice,

    #[error("choice {selection} out of range 1..={count}")]
    ChoiceOutOfRange { selection: usize, count: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Unbound-variable error for a single name.
    pub fn unbound(name: impl Into<String>) -> Self {
        Error::UnboundVariable {
            names: vec![name.into()],
        }
    }
}
