//! Statement-level control-flow graph
//!
//! One node per statement; node index `i` is statement `i`. Statement 0 is
//! the method entry.

use crate::shared::models::{Method, NaturalLoop, StmtId};
use petgraph::algo::dominators::{simple_fast, Dominators};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeMap;

pub struct StatementCfg {
    graph: DiGraph<StmtId, ()>,
    succs: Vec<Vec<StmtId>>,
    preds: Vec<Vec<StmtId>>,
}

impl StatementCfg {
    pub fn build(method: &Method) -> Self {
        let n = method.body.len();
        let mut graph = DiGraph::with_capacity(n, n * 2);
        for id in method.stmt_ids() {
            graph.add_node(id);
        }

        let mut succs = vec![Vec::new(); n];
        let mut preds = vec![Vec::new(); n];
        for (i, stmt) in method.body.iter().enumerate() {
            let mut targets = Vec::with_capacity(2);
            if stmt.falls_through() && i + 1 < n {
                targets.push(StmtId(i as u32 + 1));
            }
            if let Some(target) = stmt.branch_target() {
                if target.index() < n && !targets.contains(&target) {
                    targets.push(target);
                }
            }
            for target in targets {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(target.index()), ());
                succs[i].push(target);
                preds[target.index()].push(StmtId(i as u32));
            }
        }

        Self {
            graph,
            succs,
            preds,
        }
    }

    pub fn len(&self) -> usize {
        self.succs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.succs.is_empty()
    }

    pub fn successors(&self, stmt: StmtId) -> &[StmtId] {
        &self.succs[stmt.index()]
    }

    pub fn predecessors(&self, stmt: StmtId) -> &[StmtId] {
        &self.preds[stmt.index()]
    }

    fn dominators(&self) -> Option<Dominators<NodeIndex>> {
        if self.is_empty() {
            return None;
        }
        Some(simple_fast(&self.graph, NodeIndex::new(0)))
    }

    /// Natural loops, one per header, ordered by header position
    pub fn natural_loops(&self) -> Vec<NaturalLoop> {
        let Some(doms) = self.dominators() else {
            return Vec::new();
        };
        let dominates = |a: StmtId, b: StmtId| {
            doms.dominators(NodeIndex::new(b.index()))
                .map_or(false, |mut it| it.any(|d| d.index() == a.index()))
        };

        // header -> latches
        let mut back_edges: BTreeMap<StmtId, Vec<StmtId>> = BTreeMap::new();
        for (i, succs) in self.succs.iter().enumerate() {
            let from = StmtId(i as u32);
            for &to in succs {
                if dominates(to, from) {
                    back_edges.entry(to).or_default().push(from);
                }
            }
        }

        back_edges
            .into_iter()
            .map(|(header, latches)| self.loop_for(header, &latches))
            .collect()
    }

    fn loop_for(&self, header: StmtId, latches: &[StmtId]) -> NaturalLoop {
        let mut in_loop = vec![false; self.len()];
        in_loop[header.index()] = true;
        let mut worklist: Vec<StmtId> = Vec::new();
        for &latch in latches {
            if !in_loop[latch.index()] {
                in_loop[latch.index()] = true;
                worklist.push(latch);
            }
        }
        while let Some(node) = worklist.pop() {
            for &pred in self.predecessors(node) {
                if !in_loop[pred.index()] {
                    in_loop[pred.index()] = true;
                    worklist.push(pred);
                }
            }
        }

        let mut statements = vec![header];
        statements.extend(
            (0..self.len())
                .filter(|&i| in_loop[i] && i != header.index())
                .map(|i| StmtId(i as u32)),
        );

        let back_jump = latches.iter().copied().max().unwrap_or(header);

        let exits = statements
            .iter()
            .flat_map(|&s| {
                self.successors(s)
                    .iter()
                    .filter(|t| !in_loop[t.index()])
                    .map(move |&t| (s, t))
            })
            .collect();

        NaturalLoop {
            header,
            statements,
            back_jump,
            exits,
        }
    }
}
