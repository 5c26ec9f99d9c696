//! Compile-time errors

use thiserror::Error;

/// Compiler result type
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors that abort compilation; no partial program is ever produced.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("global variable declared twice: {0}")]
    DuplicateDeclaration(String),

    #[error("options statement in block {0:?} has no arms")]
    EmptyOptions(String),
}
