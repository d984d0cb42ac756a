//! Brainfuck → C transpiler.
//!
//! The source is streamed one byte at a time and each instruction becomes a
//! fixed C statement acting on an `unsigned char *cell` pointer.  Loops map
//! straight onto `while (*cell) { … }`, so no jump table is built and no
//! validation happens here: an unbalanced program produces C that does not
//! compile.  Run [`validate`](crate::validate) first when that matters.

use std::io::{self, BufReader, Read, Write};

use crate::config::{EngineConfig, EofPolicy};
use crate::program::Instruction;

/// Emits a freestanding C program equivalent to a Brainfuck source.
#[derive(Debug, Clone)]
pub struct Transpiler {
    tape_size: usize,
    eof: EofPolicy,
}

impl Transpiler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tape_size: config.tape_size,
            eof: config.eof,
        }
    }

    /// Translate everything readable from `source` into C on `out`.
    pub fn transpile<R: Read, W: Write>(&self, source: R, mut out: W) -> io::Result<()> {
        self.write_prologue(&mut out)?;

        let mut depth = 1usize;
        let mut emitted = 0usize;
        for byte in BufReader::new(source).bytes() {
            let Some(insn) = Instruction::decode(byte?) else { continue };
            if insn == Instruction::LoopEnd {
                depth = depth.saturating_sub(1).max(1);
            }
            indent(&mut out, depth)?;
            self.write_instruction(&mut out, insn)?;
            if insn == Instruction::LoopStart {
                depth += 1;
            }
            emitted += 1;
        }

        write!(out, "\n\tfree(cells);\n\treturn 0;\n}}\n")?;
        out.flush()?;
        log::debug!("transpiled {emitted} instruction(s)");
        Ok(())
    }

    /// Translate an in-memory source into a C string.
    pub fn transpile_to_string(&self, source: &[u8]) -> String {
        let mut out = Vec::new();
        // Reading a slice and writing a Vec cannot fail.
        if self.transpile(source, &mut out).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    fn write_prologue<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "#include <stdio.h>\n\
             #include <stdlib.h>\n\
             \n\
             int main(void)\n\
             {{\n\
             \tunsigned char *cells = calloc({size}, 1);\n\
             \tunsigned char *cell = cells;\n\
             \tif (!cells) {{\n\
             \t\tfprintf(stderr, \"Error allocating memory.\\n\");\n\
             \t\treturn 1;\n\
             \t}}\n\
             \n",
            size = self.tape_size,
        )
    }

    fn write_instruction<W: Write>(&self, out: &mut W, insn: Instruction) -> io::Result<()> {
        match insn {
            Instruction::Right => writeln!(out, "++cell;"),
            Instruction::Left => writeln!(out, "--cell;"),
            Instruction::Inc => writeln!(out, "++*cell;"),
            Instruction::Dec => writeln!(out, "--*cell;"),
            Instruction::Write => writeln!(out, "putchar(*cell);"),
            Instruction::Read => match self.eof {
                EofPolicy::Unchanged => {
                    writeln!(out, "{{ int c = getchar(); if (c != EOF) *cell = (unsigned char)c; }}")
                }
                EofPolicy::Sentinel(v) => writeln!(
                    out,
                    "{{ int c = getchar(); *cell = (c == EOF) ? {v} : (unsigned char)c; }}"
                ),
            },
            Instruction::LoopStart => writeln!(out, "while (*cell) {{"),
            Instruction::LoopEnd => writeln!(out, "}}"),
        }
    }
}

fn indent<W: Write>(out: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        out.write_all(b"\t")?;
    }
    Ok(())
}
