//! Bracket validation and the jump table.
//!
//! [`validate`] is the only way to obtain a [`JumpTable`], and the
//! [`Interpreter`](crate::Interpreter) requires one, so a program cannot be
//! executed without first passing validation.

use crate::error::{Bracket, Error, Result};
use crate::program::{Instruction, Program};

/// Bidirectional mapping between matched `[` and `]` positions.
///
/// Stored densely, indexed by source position, so lookups during execution
/// are a single slice access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<Option<usize>>,
    pairs: usize,
}

impl JumpTable {
    /// Matching delimiter for the bracket at `pos`, or `None` if `pos` is not
    /// a bracket.
    pub fn target(&self, pos: usize) -> Option<usize> {
        self.targets.get(pos).copied().flatten()
    }

    /// Number of matched `[`/`]` pairs.
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Length of the source this table was built for.
    pub fn source_len(&self) -> usize {
        self.targets.len()
    }

    /// Whether this is the table [`validate`] builds for `program`.
    ///
    /// Every bracket must have an entry pointing at an opposite bracket
    /// that points back, and no other byte may have one.  A bracket
    /// sequence has exactly one well-nested matching, so a table that
    /// passes is the one `validate` would produce.
    pub fn matches(&self, program: &Program) -> bool {
        if self.targets.len() != program.len() {
            return false;
        }
        self.targets.iter().enumerate().all(|(pos, &target)| {
            match (program.instruction(pos), target) {
                (Some(Instruction::LoopStart), Some(t)) => {
                    t > pos
                        && program.instruction(t) == Some(Instruction::LoopEnd)
                        && self.target(t) == Some(pos)
                }
                (Some(Instruction::LoopEnd), Some(t)) => {
                    t < pos
                        && program.instruction(t) == Some(Instruction::LoopStart)
                        && self.target(t) == Some(pos)
                }
                (Some(Instruction::LoopStart | Instruction::LoopEnd), None) => false,
                (_, target) => target.is_none(),
            }
        })
    }

    /// All `(position, target)` entries in source order, both directions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(pos, t)| t.map(|t| (pos, t)))
    }
}

/// Match every loop delimiter in `program` in a single forward scan.
///
/// Fails on the first `]` with nothing open, or, after the scan, on the
/// earliest `[` that was never closed.
pub fn validate(program: &Program) -> Result<JumpTable> {
    let mut targets = vec![None; program.len()];
    let mut open: Vec<usize> = Vec::new();
    let mut pairs = 0;

    for pos in 0..program.len() {
        match program.instruction(pos) {
            Some(Instruction::LoopStart) => open.push(pos),
            Some(Instruction::LoopEnd) => {
                let Some(start) = open.pop() else {
                    return Err(Error::UnbalancedBrackets { position: pos, bracket: Bracket::Close });
                };
                targets[start] = Some(pos);
                targets[pos] = Some(start);
                pairs += 1;
            }
            _ => {}
        }
    }

    // The bottom of the stack is the earliest unmatched `[`.
    if let Some(&first) = open.first() {
        return Err(Error::UnbalancedBrackets { position: first, bracket: Bracket::Open });
    }

    log::debug!("validated {} bytes, {pairs} loop(s)", program.len());
    Ok(JumpTable { targets, pairs })
}
