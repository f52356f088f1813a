//! Interprocedural purity propagation
//!
//! Callees are classified before their callers (DFS post-order from the
//! entry points, then from every remaining application method in
//! declaration order). A callee still on the DFS stack is part of a cycle
//! and counts as impure.

use crate::features::purity::domain::{EscapingLocals, PurityRecord, PurityTable};
use crate::shared::models::{Immediate, LocalId, Method, MethodId, Place, Program, Rvalue, Stmt, StmtId};
use crate::shared::ports::{CallGraph, PointsToOracle};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

pub struct PurityAnalysis<'a> {
    program: &'a Program,
    call_graph: &'a dyn CallGraph,
    oracle: &'a dyn PointsToOracle,
    state: FxHashMap<MethodId, VisitState>,
    table: PurityTable,
}

impl<'a> PurityAnalysis<'a> {
    pub fn run(
        program: &'a Program,
        call_graph: &'a dyn CallGraph,
        oracle: &'a dyn PointsToOracle,
    ) -> PurityTable {
        let mut analysis = Self {
            program,
            call_graph,
            oracle,
            state: FxHashMap::default(),
            table: PurityTable::new(),
        };

        let roots: Vec<MethodId> = call_graph
            .entry_points()
            .iter()
            .copied()
            .chain(program.method_ids())
            .collect();
        for root in roots {
            if analysis.is_analyzable(root) && !analysis.state.contains_key(&root) {
                analysis.visit(root);
            }
        }

        let pure = analysis
            .table
            .methods()
            .into_iter()
            .filter(|&m| analysis.table.is_pure(m))
            .count();
        info!(methods = analysis.table.len(), pure, "purity analysis complete");
        analysis.table
    }

    fn is_analyzable(&self, method: MethodId) -> bool {
        self.call_graph.classify(method).is_analyzable()
    }

    /// Iterative post-order DFS over application callees
    fn visit(&mut self, root: MethodId) {
        self.state.insert(root, VisitState::InProgress);
        let mut stack = vec![(root, self.pending_callees(root))];

        while let Some((method, pending)) = stack.last_mut() {
            if let Some(next) = pending.pop() {
                if self.is_analyzable(next) && !self.state.contains_key(&next) {
                    self.state.insert(next, VisitState::InProgress);
                    let callees = self.pending_callees(next);
                    stack.push((next, callees));
                }
                continue;
            }

            let method = *method;
            stack.pop();
            let record = self.analyze_method(self.program.method(method));
            debug!(
                method = %self.program.method(method).signature(),
                read_pure = record.is_read_pure(),
                write_pure = record.is_write_pure(),
                "classified"
            );
            self.table.insert(method, record);
            self.state.insert(method, VisitState::Done);
        }
    }

    /// Callees in call-site order, reversed so `pop` yields the first one
    fn pending_callees(&self, method: MethodId) -> Vec<MethodId> {
        let body = self.program.method(method);
        let mut callees: Vec<MethodId> = body
            .stmt_ids()
            .filter(|&s| body.stmt(s).invoke().is_some())
            .flat_map(|s| self.call_graph.callees_of(method, s).iter().copied())
            .collect();
        callees.reverse();
        callees
    }

    fn analyze_method(&self, method: &Method) -> PurityRecord {
        let escaping = EscapingLocals::compute(method, self.oracle);
        let mut record = PurityRecord::default();

        for (id, stmt) in method.stmt_ids().zip(method.body.iter()) {
            self.scan_stmt(id, stmt, &escaping, &mut record);
            if stmt.invoke().is_some() {
                self.scan_call(method.id, id, &mut record);
            }
        }
        record
    }

    fn scan_stmt(&self, id: StmtId, stmt: &Stmt, escaping: &EscapingLocals, record: &mut PurityRecord) {
        match stmt {
            Stmt::Identity { .. } | Stmt::Goto(_) | Stmt::Nop => {}
            Stmt::Assign { place, value } => {
                let writes_outside = match place {
                    Place::Local(_) => false,
                    Place::InstanceField { base, .. } => escaping.contains(*base),
                    Place::ArrayElem { base, .. } => escaping.contains_imm(base),
                    Place::StaticField(_) => true,
                };
                if writes_outside {
                    record.write_impure.insert(id);
                }

                let reads_outside = matches!(value, Rvalue::StaticField(_))
                    || value_operands(value).into_iter().any(|l| escaping.contains(l));
                if reads_outside {
                    record.read_impure.insert(id);
                }
            }
            Stmt::Invoke(call) => {
                if call.args.iter().any(|a| escaping.contains_imm(a)) {
                    record.read_impure.insert(id);
                }
            }
            Stmt::If { .. } | Stmt::Return(_) | Stmt::Throw(_) => {
                if stmt.used_locals().into_iter().any(|l| escaping.contains(l)) {
                    record.read_impure.insert(id);
                }
            }
        }
    }

    fn scan_call(&self, caller: MethodId, id: StmtId, record: &mut PurityRecord) {
        let callees = self.call_graph.callees_of(caller, id);
        if callees.is_empty() {
            record.mark_both(id);
            return;
        }
        for &callee in callees {
            if !self.is_analyzable(callee)
                || self.state.get(&callee) == Some(&VisitState::InProgress)
            {
                record.mark_both(id);
                continue;
            }
            match self.table.purity_of(callee) {
                Some(callee_record) => {
                    if !callee_record.is_read_pure() {
                        record.read_impure.insert(id);
                    }
                    if !callee_record.is_write_pure() {
                        record.write_impure.insert(id);
                    }
                }
                None => record.mark_both(id),
            }
        }
    }
}

/// Locals read by an rvalue; call receivers are not reads
fn value_operands(value: &Rvalue) -> Vec<LocalId> {
    let imm = |i: &Immediate| i.as_local();
    match value {
        Rvalue::Use(v) | Rvalue::Neg(v) | Rvalue::Length(v) | Rvalue::Cast { value: v, .. } => {
            imm(v).into_iter().collect()
        }
        Rvalue::Binary { lhs, rhs, .. } => imm(lhs).into_iter().chain(imm(rhs)).collect(),
        Rvalue::ArrayRead { base, index } => imm(base).into_iter().chain(imm(index)).collect(),
        Rvalue::InstanceField { base, .. } => vec![*base],
        Rvalue::StaticField(_) | Rvalue::New(_) => Vec::new(),
        Rvalue::NewArray { size, .. } => imm(size).into_iter().collect(),
        Rvalue::NewMultiArray { sizes, .. } => sizes.iter().filter_map(imm).collect(),
        Rvalue::Invoke(call) => call.args.iter().filter_map(imm).collect(),
    }
}
