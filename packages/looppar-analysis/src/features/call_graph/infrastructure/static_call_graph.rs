//! Class-hierarchy call graph

use crate::config::ConfigError;
use crate::errors::Result;
use crate::shared::models::{InvokeKind, MethodId, MethodRef, Program, StmtId};
use crate::shared::ports::{CallGraph, CalleeKind};
use rustc_hash::FxHashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct StaticCallGraph {
    callees: FxHashMap<(MethodId, StmtId), Vec<MethodId>>,
    callers: FxHashMap<MethodId, Vec<(MethodId, StmtId)>>,
    entries: Vec<MethodId>,
    kinds: Vec<CalleeKind>,
}

impl StaticCallGraph {
    /// Build the call graph of `program`.
    ///
    /// `entry_signatures` overrides the default entry points (methods marked
    /// `entry`, else every static `main`); an unknown signature is an error.
    pub fn build(program: &Program, entry_signatures: &[String]) -> Result<Self> {
        let kinds = program
            .method_ids()
            .map(|m| classify_method(program, m))
            .collect();

        let mut graph = Self {
            kinds,
            ..Self::default()
        };

        for method in &program.methods {
            if !method.has_body() {
                continue;
            }
            for stmt in method.stmt_ids() {
                let Some(call) = method.stmt(stmt).invoke() else {
                    continue;
                };
                let targets = resolve_targets(program, call.kind, &call.method);
                if targets.is_empty() {
                    debug!(caller = %method.signature(), target = %call.method, "unresolved call");
                }
                for &target in &targets {
                    graph
                        .callers
                        .entry(target)
                        .or_default()
                        .push((method.id, stmt));
                }
                graph.callees.insert((method.id, stmt), targets);
            }
        }

        graph.entries = select_entry_points(program, entry_signatures)?;
        Ok(graph)
    }

    pub fn call_site_count(&self) -> usize {
        self.callees.len()
    }
}

impl CallGraph for StaticCallGraph {
    fn callees_of(&self, caller: MethodId, stmt: StmtId) -> &[MethodId] {
        self.callees
            .get(&(caller, stmt))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn callers_of(&self, callee: MethodId) -> &[(MethodId, StmtId)] {
        self.callers
            .get(&callee)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn entry_points(&self) -> &[MethodId] {
        &self.entries
    }

    fn classify(&self, callee: MethodId) -> CalleeKind {
        self.kinds
            .get(callee.index())
            .copied()
            .unwrap_or(CalleeKind::Library)
    }
}

fn classify_method(program: &Program, id: MethodId) -> CalleeKind {
    let method = program.method(id);
    if method.is_constructor() {
        CalleeKind::Constructor
    } else if method.is_static_initializer() {
        CalleeKind::StaticInitializer
    } else if program.is_library_method(id) || !method.has_body() {
        CalleeKind::Library
    } else {
        CalleeKind::Application
    }
}

fn resolve_targets(program: &Program, kind: InvokeKind, mref: &MethodRef) -> Vec<MethodId> {
    match kind {
        InvokeKind::Static | InvokeKind::Special => program.resolve(mref).into_iter().collect(),
        InvokeKind::Virtual | InvokeKind::Interface => {
            let mut targets: Vec<MethodId> = program
                .classes
                .iter()
                .filter(|c| program.is_subclass_of(&c.name, &mref.class))
                .filter_map(|c| {
                    program.resolve(&MethodRef {
                        class: c.name.clone(),
                        ..mref.clone()
                    })
                })
                .filter(|&m| !program.method(m).is_abstract)
                .collect();
            targets.sort_unstable();
            targets.dedup();
            targets
        }
    }
}

fn select_entry_points(program: &Program, signatures: &[String]) -> Result<Vec<MethodId>> {
    if !signatures.is_empty() {
        return signatures
            .iter()
            .map(|sig| {
                program.method_by_signature(sig).ok_or_else(|| {
                    ConfigError::Validation(format!("entry point {} not found in program", sig))
                        .into()
                })
            })
            .collect();
    }

    let marked: Vec<MethodId> = program
        .methods
        .iter()
        .filter(|m| m.is_entry)
        .map(|m| m.id)
        .collect();
    if !marked.is_empty() {
        return Ok(marked);
    }

    Ok(program
        .methods
        .iter()
        .filter(|m| m.is_static && m.name == "main" && m.has_body())
        .map(|m| m.id)
        .collect())
}
