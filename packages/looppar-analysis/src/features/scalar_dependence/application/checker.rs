//! Loop-carried scalar dependence check
//!
//! A local written in the loop must be loop-local: dead once the loop
//! exits, and never assigned from a value computed in an earlier
//! iteration. Field writes reject the loop outright.

use crate::features::flow_graph::crosses_iterations;
use crate::features::loop_shape::InductionVariable;
use crate::features::scalar_dependence::domain::{LoopLocals, ScalarRejection};
use crate::shared::models::{LocalId, Method, NaturalLoop, Place, Stmt, StmtId};
use crate::shared::ports::MethodFlow;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarDependenceChecker;

impl ScalarDependenceChecker {
    pub fn new() -> Self {
        Self
    }

    /// `nested_ivs` holds induction variables of loops nested in `lp` that
    /// already passed this check; their updates are not treated as carries.
    pub fn check(
        &self,
        method: &Method,
        flow: &dyn MethodFlow,
        lp: &NaturalLoop,
        iv: &InductionVariable,
        nested_ivs: &FxHashSet<LocalId>,
    ) -> Result<LoopLocals, ScalarRejection> {
        let mut locals: BTreeSet<LocalId> = method.local_ids().collect();

        if let Some(exit) = method.stmt(iv.test).branch_target() {
            for live in flow.live_before(exit) {
                locals.remove(&live);
            }
        }

        for &s in &lp.statements {
            for def in carried_defs(method, flow, lp, iv, nested_ivs, s) {
                if let Some(local) = method.stmt(def).def_local() {
                    locals.remove(&local);
                }
            }

            if s == iv.update {
                continue;
            }
            let Some(local) = method.stmt(s).def_local() else {
                continue;
            };
            if nested_ivs.contains(&local) {
                continue;
            }
            if carries_value(method, flow, lp, iv, nested_ivs, s) {
                locals.remove(&local);
            }
        }

        for &s in &lp.statements {
            if s == iv.update {
                continue;
            }
            match method.stmt(s) {
                Stmt::Assign {
                    place: Place::InstanceField { .. } | Place::StaticField(_),
                    ..
                } => {
                    debug!(method = %method.signature(), stmt = %s, "field write in loop");
                    return Err(ScalarRejection::FieldWrite(s));
                }
                stmt => {
                    if let Some(local) = stmt.def_local() {
                        if !locals.contains(&local) {
                            let name = method.local(local).name.clone();
                            debug!(method = %method.signature(), stmt = %s, local = %name, "scalar carry");
                            return Err(ScalarRejection::CarriedLocal { name, stmt: s });
                        }
                    }
                }
            }
        }

        Ok(LoopLocals::new(locals))
    }
}

/// In-loop definitions whose value may be read at `stmt` in a later
/// iteration than the one that wrote it
fn carried_defs(
    method: &Method,
    flow: &dyn MethodFlow,
    lp: &NaturalLoop,
    iv: &InductionVariable,
    nested_ivs: &FxHashSet<LocalId>,
    stmt: StmtId,
) -> Vec<StmtId> {
    let mut carried = Vec::new();
    for used in method.stmt(stmt).used_locals() {
        if used == iv.local || nested_ivs.contains(&used) {
            continue;
        }
        for def in flow.defs_of_at(used, stmt) {
            if def != iv.update
                && lp.contains(def)
                && crosses_iterations(flow, lp, iv.update, stmt, def)
            {
                carried.push(def);
            }
        }
    }
    carried
}

/// Whether any operand of `stmt` may hold a value from an earlier iteration,
/// directly or through the in-loop definitions it is computed from
fn carries_value(
    method: &Method,
    flow: &dyn MethodFlow,
    lp: &NaturalLoop,
    iv: &InductionVariable,
    nested_ivs: &FxHashSet<LocalId>,
    stmt: StmtId,
) -> bool {
    let mut visited: FxHashSet<StmtId> = FxHashSet::default();
    let mut worklist = vec![stmt];
    visited.insert(stmt);

    while let Some(at) = worklist.pop() {
        for used in method.stmt(at).used_locals() {
            if nested_ivs.contains(&used) {
                continue;
            }
            for def in flow.defs_of_at(used, at) {
                if def == iv.update
                    || !lp.contains(def)
                    || matches!(method.stmt(def), Stmt::Identity { .. })
                {
                    continue;
                }
                if crosses_iterations(flow, lp, iv.update, at, def) {
                    return true;
                }
                if visited.insert(def) {
                    worklist.push(def);
                }
            }
        }
    }
    false
}
