//! Worklist dataflow over the statement CFG
//!
//! - Reaching definitions: forward may-analysis, facts are defining statements
//! - Live variables: backward may-analysis, facts are locals

use super::cfg::StatementCfg;
use crate::shared::models::{LocalId, Method, StmtId};
use std::collections::{BTreeSet, VecDeque};

/// Definitions reaching the entry of each statement
pub struct ReachingDefinitions {
    reach_in: Vec<BTreeSet<StmtId>>,
    def_of: Vec<Option<LocalId>>,
}

impl ReachingDefinitions {
    pub fn compute(method: &Method, cfg: &StatementCfg) -> Self {
        let n = method.body.len();
        let def_of: Vec<Option<LocalId>> = method.body.iter().map(|s| s.def_local()).collect();
        let mut reach_in: Vec<BTreeSet<StmtId>> = vec![BTreeSet::new(); n];
        let mut reach_out: Vec<BTreeSet<StmtId>> = vec![BTreeSet::new(); n];

        let mut worklist: VecDeque<StmtId> = method.stmt_ids().collect();
        let mut queued = vec![true; n];

        while let Some(stmt) = worklist.pop_front() {
            let i = stmt.index();
            queued[i] = false;

            let mut input = BTreeSet::new();
            for pred in cfg.predecessors(stmt) {
                input.extend(reach_out[pred.index()].iter().copied());
            }

            let output = match def_of[i] {
                Some(local) => {
                    let mut out: BTreeSet<StmtId> = input
                        .iter()
                        .copied()
                        .filter(|d| def_of[d.index()] != Some(local))
                        .collect();
                    out.insert(stmt);
                    out
                }
                None => input.clone(),
            };
            reach_in[i] = input;

            if output != reach_out[i] {
                reach_out[i] = output;
                for &succ in cfg.successors(stmt) {
                    if !queued[succ.index()] {
                        queued[succ.index()] = true;
                        worklist.push_back(succ);
                    }
                }
            }
        }

        Self { reach_in, def_of }
    }

    /// Definitions of `local` reaching the point just before `stmt`
    pub fn defs_of_at(&self, local: LocalId, stmt: StmtId) -> Vec<StmtId> {
        self.reach_in
            .get(stmt.index())
            .map(|set| {
                set.iter()
                    .copied()
                    .filter(|d| self.def_of[d.index()] == Some(local))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Locals live at the entry of each statement
pub struct LiveVariables {
    live_in: Vec<BTreeSet<LocalId>>,
}

impl LiveVariables {
    pub fn compute(method: &Method, cfg: &StatementCfg) -> Self {
        let n = method.body.len();
        let uses: Vec<Vec<LocalId>> = method.body.iter().map(|s| s.used_locals()).collect();
        let defs: Vec<Option<LocalId>> = method.body.iter().map(|s| s.def_local()).collect();
        let mut live_in: Vec<BTreeSet<LocalId>> = vec![BTreeSet::new(); n];

        let mut worklist: VecDeque<StmtId> = method.stmt_ids().rev().collect();
        let mut queued = vec![true; n];

        while let Some(stmt) = worklist.pop_front() {
            let i = stmt.index();
            queued[i] = false;

            let mut live: BTreeSet<LocalId> = BTreeSet::new();
            for succ in cfg.successors(stmt) {
                live.extend(live_in[succ.index()].iter().copied());
            }
            if let Some(def) = defs[i] {
                live.remove(&def);
            }
            live.extend(uses[i].iter().copied());

            if live != live_in[i] {
                live_in[i] = live;
                for &pred in cfg.predecessors(stmt) {
                    if !queued[pred.index()] {
                        queued[pred.index()] = true;
                        worklist.push_back(pred);
                    }
                }
            }
        }

        Self { live_in }
    }

    pub fn live_before(&self, stmt: StmtId) -> Vec<LocalId> {
        self.live_in
            .get(stmt.index())
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}
