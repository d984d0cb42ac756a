//! The interpreter.
//!
//! Execution is a state machine whose only control state is the position in
//! the source.  Every instruction advances it by one, except the loop
//! delimiters, which may move it to just past their partner recorded in the
//! [`JumpTable`]:
//!
//! - `[` on a zero cell continues after the matching `]`
//! - `]` on a non-zero cell continues after the matching `[`
//!
//! The run halts when the position reaches the end of the source.

use std::io::{self, Read, Write};

use crate::config::{EngineConfig, EofPolicy};
use crate::error::{Error, Result};
use crate::program::{Instruction, Program};
use crate::tape::Tape;
use crate::validate::{validate, JumpTable};

/// Result of a single [`Interpreter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction (or comment byte) was consumed; more remain.
    Continue,
    /// The position is at the end of the program.
    Halted,
}

/// Executes one validated program against its own, freshly zeroed tape.
#[derive(Debug)]
pub struct Interpreter<'p> {
    program: &'p Program,
    jumps: &'p JumpTable,
    tape: Tape,
    pos: usize,
    eof: EofPolicy,
    steps: u64,
}

impl<'p> Interpreter<'p> {
    /// `jumps` must be the table [`validate`] produced for `program`.
    ///
    /// Fails with [`Error::JumpTableMismatch`] for any other table, and with
    /// [`Error::Config`] when `config` does not pass
    /// [`EngineConfig::validate`].
    pub fn new(program: &'p Program, jumps: &'p JumpTable, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        if !jumps.matches(program) {
            return Err(Error::JumpTableMismatch);
        }
        Ok(Self {
            program,
            jumps,
            tape: Tape::new(config.tape_size),
            pos: 0,
            eof: config.eof,
            steps: 0,
        })
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn into_tape(self) -> Tape {
        self.tape
    }

    /// Position of the next byte to execute.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Instructions executed so far (comment bytes are not counted).
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.pos >= self.program.len()
    }

    /// Execute the byte at the current position.
    ///
    /// A tape error leaves the position on the failing instruction, so
    /// nothing after it runs.
    pub fn step<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<StepOutcome> {
        if self.is_halted() {
            return Ok(StepOutcome::Halted);
        }

        let Some(insn) = self.program.instruction(self.pos) else {
            self.pos += 1;
            return Ok(self.outcome());
        };

        let mut next = self.pos + 1;
        match insn {
            Instruction::Inc => self.tape.increment(),
            Instruction::Dec => self.tape.decrement(),
            Instruction::Right => self.tape.move_right()?,
            Instruction::Left => self.tape.move_left()?,
            Instruction::Write => output.write_all(&[self.tape.read()])?,
            Instruction::Read => {
                // Let prompts reach the user before blocking on input.
                output.flush()?;
                match read_byte(input)? {
                    Some(b) => self.tape.write(b),
                    None => match self.eof {
                        EofPolicy::Unchanged => {}
                        EofPolicy::Sentinel(v) => self.tape.write(v),
                    },
                }
            }
            Instruction::LoopStart if self.tape.read() == 0 => {
                next = self.jump_past_partner()?;
            }
            Instruction::LoopEnd if self.tape.read() != 0 => {
                next = self.jump_past_partner()?;
            }
            Instruction::LoopStart | Instruction::LoopEnd => {}
        }

        self.steps += 1;
        self.pos = next;
        Ok(self.outcome())
    }

    /// Step until the program halts or an instruction fails.
    ///
    /// `output` is flushed in both cases, so bytes written before a fatal
    /// error are not lost.
    pub fn run<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        log::debug!(
            "run: {} byte program, {} cell tape, eof {:?}",
            self.program.len(),
            self.tape.len(),
            self.eof
        );
        loop {
            match self.step(input, output) {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Halted) => break,
                Err(e) => {
                    let _ = output.flush();
                    log::debug!("run aborted at position {} after {} steps: {e}", self.pos, self.steps);
                    return Err(e);
                }
            }
        }
        output.flush()?;
        log::debug!(
            "run finished after {} steps, cursor at {}",
            self.steps,
            self.tape.cursor()
        );
        Ok(())
    }

    fn outcome(&self) -> StepOutcome {
        if self.is_halted() {
            StepOutcome::Halted
        } else {
            StepOutcome::Continue
        }
    }

    fn jump_past_partner(&self) -> Result<usize> {
        let target = self.jumps.target(self.pos).ok_or(Error::JumpTableMismatch)?;
        log::trace!("jump {} -> {}", self.pos, target);
        Ok(target + 1)
    }
}

/// Read one byte, or `None` at end of input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Validate `program`, then run it to completion on a fresh tape.
///
/// Returns the final tape.
pub fn execute<R: Read, W: Write>(
    program: &Program,
    config: &EngineConfig,
    input: &mut R,
    output: &mut W,
) -> Result<Tape> {
    let jumps = validate(program)?;
    let mut interp = Interpreter::new(program, &jumps, config)?;
    interp.run(input, output)?;
    Ok(interp.into_tape())
}
