//! AST-to-bytecode lowering

use indexmap::IndexMap;
use tracing::debug;

use dialogue_ast::{BinaryOp, Expr, Item, Literal, OptionArm, Script, Statement};
use dialogue_vm::{
    Block, BlockId, DialogOption, Instruction, Program, Value,
    BinaryOp as ByteOp,
};

use crate::error::{CompileError, Result};

/// Compile a script into an executable program.
///
/// Global declarations accumulate into the program's initial-value
/// template; each block lowers independently to a flat instruction list.
pub fn compile(script: &Script) -> Result<Program> {
    let mut globals: IndexMap<String, Value> = IndexMap::new();
    let mut blocks: IndexMap<BlockId, Block> = IndexMap::new();

    for item in &script.items {
        match item {
            Item::GlobalVar(decl) => {
                if globals.contains_key(&decl.name) {
                    return Err(CompileError::DuplicateDeclaration(decl.name.clone()));
                }
                let init = decl
                    .init
                    .as_ref()
                    .map(lower_literal)
                    .unwrap_or(Value::Absent);
                globals.insert(decl.name.clone(), init);
            }
            Item::Block(def) => {
                blocks.insert(
                    BlockId::from(def.name.as_str()),
                    lower_block(&def.name, &def.statements)?,
                );
            }
        }
    }

    debug!(blocks = blocks.len(), globals = globals.len(), "script lowered");
    Ok(Program::new(blocks, globals))
}

fn lower_block(name: &str, statements: &[Statement]) -> Result<Block> {
    let mut block = Block::default();
    for statement in statements {
        lower_statement(&mut block, name, statement)?;
    }
    Ok(block)
}

fn lower_statement(block: &mut Block, block_name: &str, statement: &Statement) -> Result<()> {
    match statement {
        Statement::Say { character, text } => {
            block.emit(Instruction::Says {
                character: character.clone(),
                text: text.clone(),
            });
        }
        Statement::Goto(target) => {
            block.emit(Instruction::GotoBlock(BlockId::from(target.as_str())));
        }
        Statement::Nop => block.emit(Instruction::Nop),
        Statement::Exit => block.emit(Instruction::Exit),
        Statement::Assign { name, value } => {
            lower_expr(block, value);
            block.emit(Instruction::WriteVar(name.clone()));
        }
        Statement::Options(arms) => lower_options(block, block_name, arms)?,
    }
    Ok(())
}

/// Lower an expression to instructions that leave its value on the stack.
///
/// Operators are post-fix stack operations, so both operands of a
/// connective are always evaluated; short-circuiting happens in the
/// operator's value semantics, not in control flow.
fn lower_expr(block: &mut Block, expr: &Expr) {
    match expr {
        Expr::Literal(literal) => {
            block.emit(Instruction::PushLiteral(lower_literal(literal)));
        }
        Expr::Ident(name) => block.emit(Instruction::LoadVar(name.clone())),
        Expr::Paren(inner) => lower_expr(block, inner),
        Expr::Binary { op, left, right } => {
            lower_expr(block, left);
            lower_expr(block, right);
            block.emit(Instruction::BinaryOp(lower_op(*op)));
        }
    }
}

fn lower_op(op: BinaryOp) -> ByteOp {
    match op {
        BinaryOp::Equals => ByteOp::Equals,
        BinaryOp::And => ByteOp::And,
        BinaryOp::Or => ByteOp::Or,
    }
}

fn lower_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Integer(i) => Value::Integer(*i),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Str(s) => Value::String(s.clone()),
    }
}

/// Lower an n-way options statement into a dispatch table of relative
/// jumps followed by the arm bodies.
///
/// Layout:
///
/// ```text
/// Options([...])      selecting k adds (k - 1) to the ip
/// GotoOffset(d1)      dispatch entry 1
/// ...
/// GotoOffset(dn)      dispatch entry n
/// B1  GotoOffset(e1)  body 1, then skip the remaining bodies
/// ...
/// Bn  GotoOffset(0)   last body falls through to the end point
/// ```
///
/// When entry k executes, the ip already points at entry k+1 (the loop
/// pre-advances before dispatch), so d1 starts at n-1 and each later entry
/// additionally clears the bodies interposed since the previous one.
fn lower_options(block: &mut Block, block_name: &str, arms: &[OptionArm]) -> Result<()> {
    // A menu with nothing to pick is unanswerable at runtime; the surface
    // grammar requires at least one arm, so this is malformed input.
    if arms.is_empty() {
        return Err(CompileError::EmptyOptions(block_name.to_string()));
    }

    let mut descriptors = Vec::with_capacity(arms.len());
    let mut bodies = Vec::with_capacity(arms.len());
    for arm in arms {
        descriptors.push(DialogOption::new(arm.ordinal, arm.text.clone()));
        bodies.push(lower_arm_body(block_name, &arm.body)?);
    }
    block.emit(Instruction::Options(descriptors));

    let mut gap = bodies.len() as isize - 1;
    for body in &bodies {
        block.emit(Instruction::GotoOffset(gap));
        // each body carries one trailing end-jump, already counted in the
        // -1 consumed from gap per entry
        gap += body.len() as isize;
    }

    // end_offset counts every remaining body plus its trailing jump.
    let mut end_offset: isize = bodies.iter().map(|body| body.len() as isize + 1).sum();
    for body in bodies {
        end_offset -= body.len() as isize + 1;
        block.extend(body);
        block.emit(Instruction::GotoOffset(end_offset));
    }
    Ok(())
}

/// An inert arm still occupies one instruction so the offset arithmetic
/// stays uniform across arms.
fn lower_arm_body(block_name: &str, body: &[Statement]) -> Result<Block> {
    if body.is_empty() {
        return Ok(Block::new(vec![Instruction::Nop]));
    }
    let mut block = Block::default();
    for statement in body {
        lower_statement(&mut block, block_name, statement)?;
    }
    Ok(block)
}
