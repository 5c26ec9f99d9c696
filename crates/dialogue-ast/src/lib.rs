//! Abstract syntax tree for dialogue scripts
//!
//! These types are the compiler's input boundary: how the tree is produced
//! (grammar, lexer, parser) is out of scope. The node set is closed and
//! known upfront, so lowering is plain pattern matching, no visitor
//! hierarchy.

pub mod ast;
pub mod literal;

pub use ast::{BinaryOp, BlockDef, Expr, Item, OptionArm, Script, Statement, VarDecl};
pub use literal::{parse_literal, unquote, Literal};
