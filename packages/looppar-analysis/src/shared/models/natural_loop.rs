//! Natural loop as reported by the flow toolkit

use super::stmt::StmtId;
use serde::{Deserialize, Serialize};

/// Single-entry region reachable through back edges to `header`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalLoop {
    pub header: StmtId,
    /// Header first, then the remaining body statements by position
    pub statements: Vec<StmtId>,
    /// Latch with the highest position (the jump back to the header)
    pub back_jump: StmtId,
    /// (in-loop statement, out-of-loop successor)
    pub exits: Vec<(StmtId, StmtId)>,
}

impl NaturalLoop {
    pub fn contains(&self, stmt: StmtId) -> bool {
        self.statements.contains(&stmt)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Exactly one statement leaves the loop
    pub fn has_single_exit(&self) -> bool {
        let mut sources: Vec<StmtId> = self.exits.iter().map(|(s, _)| *s).collect();
        sources.sort();
        sources.dedup();
        sources.len() == 1
    }

    /// Out-of-loop successors of an exiting statement
    pub fn exit_targets_of(&self, stmt: StmtId) -> Vec<StmtId> {
        self.exits
            .iter()
            .filter(|(s, _)| *s == stmt)
            .map(|(_, t)| *t)
            .collect()
    }

    /// Lowest statement position in the loop
    pub fn first_position(&self) -> StmtId {
        self.statements
            .iter()
            .copied()
            .min()
            .unwrap_or(self.header)
    }
}
