//! Syntax-tree node types

use crate::literal::Literal;

/// A complete parsed script: top-level declarations in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub items: Vec<Item>,
}

impl Script {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `let name;` or `let name = literal;`
    GlobalVar(VarDecl),
    /// `name { ... }`
    Block(BlockDef),
}

/// A global-variable declaration with optional initialiser
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    /// `None` means declared but uninitialised
    pub init: Option<Literal>,
}

/// A named block of statements
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDef {
    pub name: String,
    pub statements: Vec<Statement>,
}

/// Statements a block is made of
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `character says "text"`
    Say { character: String, text: String },
    /// `goto block`
    Goto(String),
    /// A player-facing multi-way choice
    Options(Vec<OptionArm>),
    /// `name = expr`
    Assign { name: String, value: Expr },
    /// Explicit no-op
    Nop,
    /// End the dialogue
    Exit,
}

/// One arm of an options statement
///
/// An empty body makes the arm inert: it still occupies a slot in the
/// compiled dispatch table.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionArm {
    /// 1-based ordinal as written in source
    pub ordinal: u32,
    /// Player-facing text
    pub text: String,
    pub body: Vec<Statement>,
}

impl OptionArm {
    pub fn inert(ordinal: u32, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
            body: Vec::new(),
        }
    }

    pub fn new(ordinal: u32, text: impl Into<String>, body: Vec<Statement>) -> Self {
        Self {
            ordinal,
            text: text.into(),
            body,
        }
    }
}

/// Expressions on the right-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A variable read
    Ident(String),
    /// Parenthesised sub-expression
    Paren(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn paren(inner: Expr) -> Self {
        Expr::Paren(Box::new(inner))
    }
}

/// Binary operators of the surface language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `==`
    Equals,
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
}
