//! Console driver
//!
//! Drives a program against terminal-style I/O: renders lines and choice
//! menus, and owns the re-prompt loop for invalid selections. The engine
//! itself never sees bad input.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::error::Result;
use crate::instruction::DialogOption;
use crate::program::Program;
use crate::vm::{Event, Vm};

/// Run `program` over the given reader/writer until it ends.
pub fn run<R: BufRead, W: Write>(program: Program, input: &mut R, output: &mut W) -> Result<()> {
    let mut vm = Vm::new(program);
    loop {
        match vm.next_event()? {
            Event::Line { character, text } => {
                writeln!(output, "{character}:")?;
                writeln!(output, "{text}")?;
            }
            Event::Choice(options) => {
                render_options(output, &options)?;
                let selection = prompt_selection(input, output, options.len())?;
                vm.choose(selection)?;
            }
            Event::Ended => return Ok(()),
        }
    }
}

/// Run `program` on stdin/stdout.
pub fn run_stdio(program: Program) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run(program, &mut input, &mut output)
}

fn render_options<W: Write>(output: &mut W, options: &[DialogOption]) -> io::Result<()> {
    for option in options {
        writeln!(output, "{})", option.ordinal)?;
        writeln!(output, "  {}", option.text)?;
    }
    Ok(())
}

/// Re-prompt until the player supplies an integer in `1..=count`.
fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    count: usize,
) -> Result<usize> {
    loop {
        write!(output, "Your choice: ")?;
        output.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        match line.trim().parse::<usize>() {
            Ok(selection) if (1..=count).contains(&selection) => return Ok(selection),
            _ => {
                warn!(input = line.trim(), "invalid selection");
                writeln!(output, "Invalid input")?;
            }
        }
    }
}
