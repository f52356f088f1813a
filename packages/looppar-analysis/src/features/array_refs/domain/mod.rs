//! Array access domain

use crate::shared::models::{AccessKind, LocalId, StmtId};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// One array element access inside a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArrayRef {
    pub base: LocalId,
    pub index: LocalId,
    pub stmt: StmtId,
    pub kind: AccessKind,
}

/// Array accesses of a loop grouped by base local
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayAccessMaps {
    pub writes: BTreeMap<LocalId, Vec<ArrayRef>>,
    pub reads: BTreeMap<LocalId, Vec<ArrayRef>>,
}

impl ArrayAccessMaps {
    pub fn record(&mut self, access: ArrayRef) {
        let map = match access.kind {
            AccessKind::Write => &mut self.writes,
            AccessKind::Read => &mut self.reads,
        };
        map.entry(access.base).or_default().push(access);
    }

    pub fn write_count(&self) -> usize {
        self.writes.values().map(Vec::len).sum()
    }

    pub fn read_count(&self) -> usize {
        self.reads.values().map(Vec::len).sum()
    }

    pub fn has_writes(&self) -> bool {
        !self.writes.is_empty()
    }

    /// Writes in base order, then statement order
    pub fn all_writes(&self) -> impl Iterator<Item = &ArrayRef> {
        self.writes.values().flatten()
    }

    pub fn all_reads(&self) -> impl Iterator<Item = &ArrayRef> {
        self.reads.values().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayRefRejection {
    #[error("array base at {0} is not a local")]
    NonLocalBase(StmtId),

    #[error("array index at {0} is not a local")]
    NonLocalIndex(StmtId),
}
