//! Dialogue compiler
//!
//! Walks a syntax tree and emits flat bytecode blocks. The one nontrivial
//! piece is lowering an n-way options statement into a relative-jump
//! dispatch table; everything else is a direct statement-to-instruction
//! mapping.

pub mod error;
pub mod lower;

pub use error::{CompileError, Result};
pub use lower::compile;
