//! `MethodFlow` provider backed by the statement CFG

use super::cfg::StatementCfg;
use super::dataflow::{LiveVariables, ReachingDefinitions};
use crate::shared::models::{LocalId, Method, NaturalLoop, StmtId};
use crate::shared::ports::MethodFlow;

/// All flow facts of one method, computed eagerly
pub struct StatementFlow {
    cfg: StatementCfg,
    loops: Vec<NaturalLoop>,
    reaching: ReachingDefinitions,
    liveness: LiveVariables,
    offsets: Vec<Option<u32>>,
}

impl StatementFlow {
    pub fn new(method: &Method) -> Self {
        let cfg = StatementCfg::build(method);
        let loops = cfg.natural_loops();
        let reaching = ReachingDefinitions::compute(method, &cfg);
        let liveness = LiveVariables::compute(method, &cfg);
        Self {
            cfg,
            loops,
            reaching,
            liveness,
            offsets: method.bytecode_offsets.clone(),
        }
    }
}

impl MethodFlow for StatementFlow {
    fn successors(&self, stmt: StmtId) -> &[StmtId] {
        self.cfg.successors(stmt)
    }

    fn predecessors(&self, stmt: StmtId) -> &[StmtId] {
        self.cfg.predecessors(stmt)
    }

    fn natural_loops(&self) -> &[NaturalLoop] {
        &self.loops
    }

    fn defs_of_at(&self, local: LocalId, stmt: StmtId) -> Vec<StmtId> {
        self.reaching.defs_of_at(local, stmt)
    }

    fn live_before(&self, stmt: StmtId) -> Vec<LocalId> {
        self.liveness.live_before(stmt)
    }

    fn instruction_offset(&self, stmt: StmtId) -> u32 {
        self.offsets
            .get(stmt.index())
            .copied()
            .flatten()
            .unwrap_or(stmt.0)
    }

    fn has_bytecode_offsets(&self) -> bool {
        !self.offsets.is_empty() && self.offsets.iter().all(Option::is_some)
    }
}
