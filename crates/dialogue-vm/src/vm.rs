//! Execution engine
//!
//! Fetch-decode-execute loop over a compiled program. The engine never
//! blocks: `next_event` drives the loop until it has something for the
//! host (a line of dialogue, a pending choice, or the end of the run), and
//! a pending choice is resumed with `choose`. This keeps the core
//! embeddable in event-driven hosts without dedicating a thread to input.

use tracing::{debug, info, trace};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::instruction::{DialogOption, Instruction};
use crate::program::{BlockId, Program};
use crate::template;
use crate::value::Value;

/// What the engine hands the host between resumptions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A character line, text already template-expanded
    Line { character: String, text: String },
    /// The run is suspended until `Vm::choose` is called
    Choice(Vec<DialogOption>),
    /// The run has ended (explicit exit or terminal-block fallthrough)
    Ended,
}

/// A single-run virtual machine over an immutable program
#[derive(Debug)]
pub struct Vm {
    program: Program,
    context: Context,
    /// Exhausting this block is normal termination; exhausting any other
    /// block is a fatal fallthrough (module chaining is unimplemented).
    terminal: BlockId,
    pending: Option<Vec<DialogOption>>,
}

impl Vm {
    /// Create a run over `program`, globals seeded from its template.
    pub fn new(program: Program) -> Self {
        let entry = program.entry().clone();
        let mut context = Context::new(entry.clone());
        context.store_mut().seed_globals(program.global_template());
        info!(entry = %entry, "vm created");
        Self {
            program,
            context,
            terminal: entry,
            pending: None,
        }
    }

    /// Drive the loop until the next host-visible event.
    ///
    /// While a choice is pending this re-yields the same `Event::Choice`;
    /// after the run ends it keeps returning `Event::Ended`.
    pub fn next_event(&mut self) -> Result<Event> {
        if let Some(options) = &self.pending {
            return Ok(Event::Choice(options.clone()));
        }
        while self.context.alive {
            match self.step() {
                Ok(Some(event)) => return Ok(event),
                Ok(None) => {}
                Err(err) => {
                    // A runtime error ends the run; the context may hold a
                    // half-evaluated stack, so it must not resume.
                    self.context.alive = false;
                    return Err(err);
                }
            }
        }
        Ok(Event::Ended)
    }

    /// Resume a pending choice with a 1-based selection.
    ///
    /// The selection offset lands on the matching dispatch-table entry:
    /// the ip was already advanced past the `Options` instruction, so
    /// adding `selection - 1` reaches entry `selection`.
    pub fn choose(&mut self, selection: usize) -> Result<()> {
        let count = self
            .pending
            .as_ref()
            .map(|options| options.len())
            .ok_or(Error::NoPendingChoice)?;
        if selection < 1 || selection > count {
            return Err(Error::ChoiceOutOfRange { selection, count });
        }
        debug!(selection, "choice applied");
        self.pending = None;
        self.context.ip += selection - 1;
        Ok(())
    }

    /// Whether the run can still make progress.
    pub fn is_alive(&self) -> bool {
        self.context.alive
    }

    /// Current value of a variable, if bound.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.context.store().load(name).ok()
    }

    /// Current block and instruction pointer.
    pub fn position(&self) -> (&BlockId, usize) {
        (&self.context.block, self.context.ip)
    }

    /// Depth of the operand stack.
    pub fn stack_depth(&self) -> usize {
        self.context.stack_depth()
    }

    fn step(&mut self) -> Result<Option<Event>> {
        let block = self
            .program
            .block(&self.context.block)
            .ok_or_else(|| Error::UnknownBlock(self.context.block.clone()))?;

        if self.context.ip >= block.len() {
            if self.context.block == self.terminal {
                debug!(block = %self.context.block, "terminal block exhausted, halting");
                self.context.alive = false;
                return Ok(None);
            }
            return Err(Error::UnhandledFallthrough(self.context.block.clone()));
        }

        let instruction = block.instructions()[self.context.ip].clone();
        trace!(block = %self.context.block, ip = self.context.ip, ?instruction, "execute");
        // Pre-advance: jump instructions overwrite this.
        self.context.ip += 1;
        self.execute(instruction)
    }

    fn execute(&mut self, instruction: Instruction) -> Result<Option<Event>> {
        match instruction {
            Instruction::Says { character, text } => {
                let text = template::expand(&text, self.context.store())?;
                Ok(Some(Event::Line { character, text }))
            }

            Instruction::Exit => {
                self.context.alive = false;
                Ok(None)
            }

            Instruction::GotoBlock(target) => {
                if !self.program.contains_block(&target) {
                    return Err(Error::UnknownBlock(target));
                }
                debug!(block = %target, "block transfer");
                self.context.block = target;
                self.context.ip = 0;
                Ok(None)
            }

            Instruction::GotoAbsolute(ptr) => {
                self.context.ip = ptr;
                Ok(None)
            }

            Instruction::GotoOffset(delta) => {
                self.context.ip = self.context.ip.checked_add_signed(delta).ok_or_else(|| {
                    Error::InvalidOperand(format!("jump offset {delta} lands before block start"))
                })?;
                Ok(None)
            }

            Instruction::Nop => Ok(None),

            Instruction::PushLiteral(value) => {
                self.context.push(value);
                Ok(None)
            }

            Instruction::LoadVar(name) => {
                let value = self.context.store().load(&name)?.clone();
                self.context.push(value);
                Ok(None)
            }

            Instruction::WriteVar(name) => {
                let value = self.context.pop()?;
                self.context.store_mut().save(&name, value);
                Ok(None)
            }

            Instruction::Pop => {
                self.context.pop()?;
                Ok(None)
            }

            Instruction::PopMulti(count) => {
                self.context.pop_multi(count)?;
                Ok(None)
            }

            Instruction::BinaryOp(op) => {
                let right = self.context.pop()?;
                let left = self.context.pop()?;
                self.context.push(op.apply(left, right));
                Ok(None)
            }

            Instruction::Options(options) => {
                self.pending = Some(options.clone());
                Ok(Some(Event::Choice(options)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::BinaryOp;
    use indexmap::IndexMap;

    fn program_with(blocks: Vec<(&str, Vec<Instruction>)>) -> Program {
        let blocks: IndexMap<BlockId, crate::program::Block> = blocks
            .into_iter()
            .map(|(name, instructions)| {
                (BlockId::from(name), crate::program::Block::new(instructions))
            })
            .collect();
        Program::new(blocks, IndexMap::new())
    }

    fn run_to_end(vm: &mut Vm) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            let event = vm.next_event().unwrap();
            let ended = event == Event::Ended;
            events.push(event);
            if ended {
                return events;
            }
        }
    }

    #[test]
    fn test_empty_entry_block_halts_normally() {
        let mut vm = Vm::new(program_with(vec![("start", vec![])]));
        assert_eq!(vm.next_event().unwrap(), Event::Ended);
        assert!(!vm.is_alive());
    }

    #[test]
    fn test_exit_halts() {
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![Instruction::Exit, Instruction::Says {
                character: "sarah".into(),
                text: "unreachable".into(),
            }],
        )]));
        assert_eq!(vm.next_event().unwrap(), Event::Ended);
    }

    #[test]
    fn test_goto_block_resets_pointer() {
        let mut vm = Vm::new(program_with(vec![
            (
                "start",
                vec![
                    Instruction::Nop,
                    Instruction::GotoBlock(BlockId::from("farewell")),
                ],
            ),
            (
                "farewell",
                vec![
                    Instruction::Says {
                        character: "sarah".into(),
                        text: "goodbye".into(),
                    },
                    Instruction::Exit,
                ],
            ),
        ]));
        let event = vm.next_event().unwrap();
        assert_eq!(
            event,
            Event::Line {
                character: "sarah".into(),
                text: "goodbye".into(),
            }
        );
        // Line came from ip 0 of the target block, pre-advanced to 1.
        assert_eq!(vm.position(), (&BlockId::from("farewell"), 1));
    }

    #[test]
    fn test_goto_unknown_block_is_fatal() {
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![Instruction::GotoBlock(BlockId::from("nowhere"))],
        )]));
        let err = vm.next_event().unwrap_err();
        assert!(matches!(err, Error::UnknownBlock(id) if id == BlockId::from("nowhere")));
    }

    #[test]
    fn test_non_terminal_fallthrough_is_fatal() {
        let mut vm = Vm::new(program_with(vec![
            (
                "start",
                vec![Instruction::GotoBlock(BlockId::from("middle"))],
            ),
            ("middle", vec![Instruction::Nop]),
        ]));
        let err = vm.next_event().unwrap_err();
        assert!(matches!(err, Error::UnhandledFallthrough(id) if id == BlockId::from("middle")));
    }

    #[test]
    fn test_binary_op_pops_right_then_left() {
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![
                Instruction::PushLiteral(Value::Boolean(true)),
                Instruction::PushLiteral(Value::Integer(25)),
                Instruction::BinaryOp(BinaryOp::And),
                Instruction::WriteVar("result".into()),
                Instruction::Exit,
            ],
        )]));
        run_to_end(&mut vm);
        assert_eq!(vm.variable("result"), Some(&Value::Integer(25)));
    }

    #[test]
    fn test_pop_on_empty_stack_is_fatal() {
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![
                Instruction::Says {
                    character: "sarah".into(),
                    text: "before the crash".into(),
                },
                Instruction::Pop,
            ],
        )]));
        // The committed side effect is still delivered first.
        assert!(matches!(vm.next_event().unwrap(), Event::Line { .. }));
        assert!(matches!(
            vm.next_event().unwrap_err(),
            Error::StackUnderflow { needed: 1, depth: 0 }
        ));
    }

    #[test]
    fn test_runtime_error_ends_the_run() {
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![
                Instruction::Pop,
                Instruction::Says {
                    character: "sarah".into(),
                    text: "unreachable after the underflow".into(),
                },
            ],
        )]));
        assert!(matches!(
            vm.next_event().unwrap_err(),
            Error::StackUnderflow { .. }
        ));
        assert!(!vm.is_alive());
        // The run is over; polling again must not execute the next
        // instruction.
        assert_eq!(vm.next_event().unwrap(), Event::Ended);
    }

    #[test]
    fn test_says_expands_template() {
        let blocks: IndexMap<BlockId, crate::program::Block> = [(
            BlockId::from("start"),
            crate::program::Block::new(vec![
                Instruction::Says {
                    character: "sarah".into(),
                    text: "you have $coins coins".into(),
                },
                Instruction::Exit,
            ]),
        )]
        .into_iter()
        .collect();
        let globals: IndexMap<String, Value> =
            [("coins".to_string(), Value::Integer(5))].into_iter().collect();
        let mut vm = Vm::new(Program::new(blocks, globals));
        assert_eq!(
            vm.next_event().unwrap(),
            Event::Line {
                character: "sarah".into(),
                text: "you have 5 coins".into(),
            }
        );
    }

    #[test]
    fn test_choice_suspends_until_chosen() {
        let options = vec![
            DialogOption::new(1, "hello sarah"),
            DialogOption::new(2, "i'll be going"),
        ];
        // Layout mirrors compiled options: dispatch entries then bodies.
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![
                Instruction::Options(options.clone()),
                Instruction::GotoOffset(1),
                Instruction::GotoOffset(1),
                Instruction::WriteVar("chosen".into()), // body 1 tail
                Instruction::Exit,
            ],
        )]));

        assert_eq!(vm.next_event().unwrap(), Event::Choice(options.clone()));
        // Re-polling without choosing yields the same suspension.
        assert_eq!(vm.next_event().unwrap(), Event::Choice(options));

        assert!(matches!(
            vm.choose(3),
            Err(Error::ChoiceOutOfRange { selection: 3, count: 2 })
        ));
        vm.choose(2).unwrap();
        assert!(matches!(vm.choose(1), Err(Error::NoPendingChoice)));
        assert_eq!(vm.next_event().unwrap(), Event::Ended);
    }

    #[test]
    fn test_goto_offset_before_block_start_is_fatal() {
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![Instruction::GotoOffset(-5)],
        )]));
        assert!(matches!(
            vm.next_event().unwrap_err(),
            Error::InvalidOperand(_)
        ));
    }

    #[test]
    fn test_goto_absolute_sets_pointer() {
        let mut vm = Vm::new(program_with(vec![(
            "start",
            vec![
                Instruction::GotoAbsolute(2),
                Instruction::Pop, // skipped
                Instruction::Exit,
            ],
        )]));
        assert_eq!(vm.next_event().unwrap(), Event::Ended);
    }
}
