//! Program source and instruction decoding.

use std::io::Read;
use std::path::Path;

use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// The decoded meaning of one source byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `+`
    Inc,
    /// `-`
    Dec,
    /// `>`
    Right,
    /// `<`
    Left,
    /// `,`
    Read,
    /// `.`
    Write,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
}

impl Instruction {
    /// Decode a source byte.  Anything outside the eight instruction
    /// characters is a comment and decodes to `None`.
    pub fn decode(byte: u8) -> Option<Self> {
        Some(match byte {
            b'+' => Instruction::Inc,
            b'-' => Instruction::Dec,
            b'>' => Instruction::Right,
            b'<' => Instruction::Left,
            b',' => Instruction::Read,
            b'.' => Instruction::Write,
            b'[' => Instruction::LoopStart,
            b']' => Instruction::LoopEnd,
            _ => return None,
        })
    }
}

/// Immutable program source.
///
/// Comment bytes are kept so that positions reported by the validator refer
/// to offsets in the text the user wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    source: Vec<u8>,
}

impl Program {
    /// Wrap `source`, enforcing the configured length limit.
    pub fn new(source: Vec<u8>, config: &EngineConfig) -> Result<Self> {
        if source.len() > config.max_program_len {
            return Err(Error::ProgramTooLarge {
                len: source.len(),
                max: config.max_program_len,
            });
        }
        Ok(Self { source })
    }

    pub fn from_source(source: impl AsRef<[u8]>, config: &EngineConfig) -> Result<Self> {
        Self::new(source.as_ref().to_vec(), config)
    }

    /// Read a whole program from `reader`.
    ///
    /// At most `max_program_len + 1` bytes are buffered: one past the limit
    /// is enough to know the program is too large.
    pub fn from_reader<R: Read>(reader: R, config: &EngineConfig) -> Result<Self> {
        let cap = (config.max_program_len as u64).saturating_add(1);
        let mut source = Vec::new();
        reader.take(cap).read_to_end(&mut source)?;
        if source.len() > config.max_program_len {
            return Err(Error::ProgramTooLarge {
                len: source.len(),
                max: config.max_program_len,
            });
        }
        log::debug!("loaded {} byte program", source.len());
        Ok(Self { source })
    }

    pub fn load_file(path: &Path, config: &EngineConfig) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), config)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Instruction at `pos`, or `None` for a comment byte or a position past
    /// the end.
    pub fn instruction(&self, pos: usize) -> Option<Instruction> {
        self.source.get(pos).copied().and_then(Instruction::decode)
    }
}
