//! Engine error type.

use std::fmt;

/// Which loop delimiter was left unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `[` with no closing partner before the end of the program.
    Open,
    /// `]` with no open `[` before it.
    Close,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bracket::Open => f.write_str("["),
            Bracket::Close => f.write_str("]"),
        }
    }
}

/// Direction of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// Every failure the engine can report.  All of them are fatal to the
/// current run; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program failed bracket validation.  `position` is the byte offset
    /// of the offending delimiter in the source.
    #[error("unbalanced brackets: unmatched `{bracket}` at position {position}")]
    UnbalancedBrackets { position: usize, bracket: Bracket },

    /// The cursor tried to leave the tape.
    #[error("tape out of bounds: cannot move {direction} from cell {cursor} (tape has {len} cells)")]
    TapeOutOfBounds {
        cursor: usize,
        len: usize,
        direction: Direction,
    },

    /// The source exceeds the configured capacity.
    #[error("program too large: {len} bytes exceeds the limit of {max}")]
    ProgramTooLarge { len: usize, max: usize },

    /// The jump table handed to the interpreter was not built from the
    /// program it is asked to run.
    #[error("jump table does not match the program")]
    JumpTableMismatch,

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
