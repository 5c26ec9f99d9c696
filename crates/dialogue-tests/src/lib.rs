//! Integration test harness
//!
//! Utilities for end-to-end testing of the full pipeline:
//! Syntax tree → Compile → Execute → Verify.

use dialogue_ast::Script;
use dialogue_compiler::compile;
use dialogue_vm::{Event, Value, Vm};

/// Test harness running a compiled script with pre-scripted choices.
pub struct TestHarness {
    vm: Vm,
}

impl TestHarness {
    /// Compile a syntax tree and stand up a fresh run.
    ///
    /// # Panics
    ///
    /// Panics if compilation fails.
    pub fn from_script(script: &Script) -> Self {
        let program = compile(script).expect("compilation failed");
        Self {
            vm: Vm::new(program),
        }
    }

    /// Drive the run to the end, answering each choice from `choices` in
    /// order. Returns every emitted line as `(character, text)`.
    ///
    /// # Panics
    ///
    /// Panics if execution fails or the script asks for more choices than
    /// provided.
    pub fn run_scripted(&mut self, choices: &[usize]) -> Vec<(String, String)> {
        let mut lines = Vec::new();
        let mut remaining = choices.iter();
        loop {
            match self.vm.next_event().expect("execution failed") {
                Event::Line { character, text } => lines.push((character, text)),
                Event::Choice(_) => {
                    let selection = *remaining
                        .next()
                        .expect("script asked for more choices than scripted");
                    self.vm.choose(selection).expect("choose failed");
                }
                Event::Ended => return lines,
            }
        }
    }

    /// Drive the run with no choices expected.
    pub fn run(&mut self) -> Vec<(String, String)> {
        self.run_scripted(&[])
    }

    /// Current value of a variable, if bound.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.vm.variable(name)
    }

    /// Depth of the operand stack after the run so far.
    pub fn stack_depth(&self) -> usize {
        self.vm.stack_depth()
    }
}
