//! Per-method purity facts

use crate::shared::models::{MethodId, StmtId};
use crate::shared::ports::CallGraph;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Statements of one method that observe or mutate state outside it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurityRecord {
    pub read_impure: BTreeSet<StmtId>,
    pub write_impure: BTreeSet<StmtId>,
}

impl PurityRecord {
    pub fn is_read_pure(&self) -> bool {
        self.read_impure.is_empty()
    }

    pub fn is_write_pure(&self) -> bool {
        self.write_impure.is_empty()
    }

    pub fn is_pure(&self) -> bool {
        self.is_read_pure() && self.is_write_pure()
    }

    pub(crate) fn mark_both(&mut self, stmt: StmtId) {
        self.read_impure.insert(stmt);
        self.write_impure.insert(stmt);
    }
}

/// Purity records of every classified method; write-once per method
#[derive(Debug, Default)]
pub struct PurityTable {
    records: FxHashMap<MethodId, PurityRecord>,
}

impl PurityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn purity_of(&self, method: MethodId) -> Option<&PurityRecord> {
        self.records.get(&method)
    }

    /// Unclassified methods are impure
    pub fn is_pure(&self, method: MethodId) -> bool {
        self.purity_of(method).map_or(false, PurityRecord::is_pure)
    }

    /// Whether the call performed by `stmt` in `caller` only reaches
    /// classified, read- and write-pure application methods
    pub fn call_is_pure(&self, call_graph: &dyn CallGraph, caller: MethodId, stmt: StmtId) -> bool {
        let callees = call_graph.callees_of(caller, stmt);
        !callees.is_empty()
            && callees
                .iter()
                .all(|&c| call_graph.classify(c).is_analyzable() && self.is_pure(c))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Classified methods in id order
    pub fn methods(&self) -> Vec<MethodId> {
        let mut ids: Vec<MethodId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn insert(&mut self, method: MethodId, record: PurityRecord) {
        self.records.entry(method).or_insert(record);
    }
}
