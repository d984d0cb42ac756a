//! MiniBf: an interpreter and C transpiler for the eight-instruction
//! Brainfuck tape language.
//!
//! The engine is split into four pieces that share one control-flow model
//! (matched `[`/`]` delimiters):
//!
//! - [`Tape`]: the bounded byte array and its cursor
//! - [`validate`]: bracket matching, producing a [`JumpTable`]
//! - [`Interpreter`]: executes a validated [`Program`] against a fresh tape
//! - [`Transpiler`]: emits an equivalent C program
//!
//! # Quick start
//!
//! ```rust
//! use bf::{EngineConfig, Interpreter, Program};
//!
//! let config = EngineConfig::default();
//! let program = Program::from_source("++++++[>++++++++++<-]>+++++.", &config).unwrap();
//! let jumps = bf::validate(&program).unwrap();
//!
//! let mut out: Vec<u8> = Vec::new();
//! Interpreter::new(&program, &jumps, &config)
//!     .unwrap()
//!     .run(&mut std::io::empty(), &mut out)
//!     .unwrap();
//! assert_eq!(out, b"e");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod interp;
pub mod program;
pub mod tape;
pub mod transpile;
pub mod validate;

// Re-exports for convenience.
pub use config::{EngineConfig, EofPolicy};
pub use error::{Bracket, Direction, Error, Result};
pub use interp::{execute, Interpreter, StepOutcome};
pub use program::{Instruction, Program};
pub use tape::Tape;
pub use transpile::Transpiler;
pub use validate::{validate, JumpTable};
