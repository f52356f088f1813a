//! Scalar dependence domain

use crate::shared::models::{LocalId, StmtId};
use std::collections::BTreeSet;
use thiserror::Error;

/// Locals whose value never survives an iteration of the loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopLocals {
    locals: BTreeSet<LocalId>,
}

impl LoopLocals {
    pub fn new(locals: BTreeSet<LocalId>) -> Self {
        Self { locals }
    }

    pub fn contains(&self, local: LocalId) -> bool {
        self.locals.contains(&local)
    }

    pub fn iter(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.locals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarRejection {
    #[error("{name} assigned at {stmt} is live after the loop or carried across iterations")]
    CarriedLocal { name: String, stmt: StmtId },

    #[error("field written at {0}")]
    FieldWrite(StmtId),
}
