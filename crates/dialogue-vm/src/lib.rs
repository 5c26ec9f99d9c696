//! Dialogue VM
//!
//! Executes compiled dialogue programs: a fetch-execute loop over flat
//! instruction sequences, with scoped variables and an operand stack.

pub mod console;
pub mod context;
pub mod error;
pub mod instruction;
pub mod program;
pub mod store;
pub mod template;
pub mod value;
pub mod vm;

pub use error::{Error, Result};
pub use instruction::{BinaryOp, DialogOption, Instruction};
pub use program::{Block, BlockId, Program};
pub use value::Value;
pub use vm::{Event, Vm};
