//! Whole-program points-to analyzer
//!
//! Turns every method body into Andersen constraints, passes parameters,
//! receivers and return values along call-graph edges, and solves once.
//!
//! # Usage
//! ```text
//! let call_graph = StaticCallGraph::build(&program, &[])?;
//! let graph = PointsToAnalyzer::new(&program, &call_graph).analyze();
//! graph.may_alias(VarKey::new(m, x), VarKey::new(m, y));
//! ```

use crate::features::points_to::domain::{
    Constraint, FieldId, LocationFactory, PointsToGraph, VarId, ARRAY_CONTENTS,
    EXTERNAL_LOCATION,
};
use crate::features::points_to::infrastructure::AndersenSolver;
use crate::shared::models::{
    FieldRef, IdentitySource, Immediate, LocalId, Method, MethodId, Place, Program, Rvalue, Stmt,
    StmtId,
};
use crate::shared::ports::{CallGraph, VarKey};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Constraint-graph node before interning
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Node {
    Local(VarKey),
    This(MethodId),
    Param(MethodId, u32),
    Return(MethodId),
    Static(String),
    Temp(u32),
}

pub struct PointsToAnalyzer<'a> {
    program: &'a Program,
    call_graph: &'a dyn CallGraph,
    nodes: FxHashMap<Node, VarId>,
    fields: FxHashMap<String, FieldId>,
    locations: LocationFactory,
    constraints: Vec<Constraint>,
    temps: u32,
}

impl<'a> PointsToAnalyzer<'a> {
    pub fn new(program: &'a Program, call_graph: &'a dyn CallGraph) -> Self {
        let mut fields = FxHashMap::default();
        fields.insert("[]".to_string(), ARRAY_CONTENTS);
        Self {
            program,
            call_graph,
            nodes: FxHashMap::default(),
            fields,
            locations: LocationFactory::new(),
            constraints: Vec::new(),
            temps: 0,
        }
    }

    pub fn analyze(mut self) -> PointsToGraph {
        let program = self.program;
        for method in &program.methods {
            if method.has_body() {
                self.seed_unknown_callers(method);
                self.method_constraints(method);
            } else {
                // results of methods we cannot see come from outside
                let ret = self.node(Node::Return(method.id));
                self.constraints.push(Constraint::alloc(ret, EXTERNAL_LOCATION));
            }
        }

        let mut solver = AndersenSolver::new(self.nodes.len());
        solver.add_constraints(self.constraints.drain(..));
        let (pts, stats) = solver.solve();
        debug!(
            constraints = stats.constraints_total,
            iterations = stats.iterations,
            heap_cells = stats.heap_cells,
            "points-to solved"
        );

        let points_to = self
            .nodes
            .iter()
            .filter_map(|(node, &var)| match node {
                Node::Local(key) => Some((*key, pts[var as usize].clone())),
                _ => None,
            })
            .collect();
        PointsToGraph::new(points_to, self.locations.into_locations())
    }

    fn node(&mut self, node: Node) -> VarId {
        let next = self.nodes.len() as VarId;
        *self.nodes.entry(node).or_insert(next)
    }

    fn local(&mut self, method: MethodId, local: LocalId) -> VarId {
        self.node(Node::Local(VarKey::new(method, local)))
    }

    fn temp(&mut self) -> VarId {
        self.temps += 1;
        let id = self.temps;
        self.node(Node::Temp(id))
    }

    fn field(&mut self, field: &FieldRef) -> FieldId {
        let next = self.fields.len() as FieldId;
        *self.fields.entry(field.to_string()).or_insert(next)
    }

    /// Reference parameters of methods nobody calls may alias anything
    fn seed_unknown_callers(&mut self, method: &Method) {
        if !self.call_graph.callers_of(method.id).is_empty() {
            return;
        }
        for (i, ty) in method.params.iter().enumerate() {
            if ty.is_reference() {
                let param = self.node(Node::Param(method.id, i as u32));
                self.constraints.push(Constraint::alloc(param, EXTERNAL_LOCATION));
            }
        }
        if !method.is_static {
            let this = self.node(Node::This(method.id));
            self.constraints.push(Constraint::alloc(this, EXTERNAL_LOCATION));
        }
    }

    fn method_constraints(&mut self, method: &Method) {
        let m = method.id;
        for (stmt_id, stmt) in method.stmt_ids().zip(method.body.iter()) {
            if let Some(call) = stmt.invoke() {
                let callees = self.call_graph.callees_of(m, stmt_id).to_vec();
                for callee in callees {
                    for (i, arg) in call.args.iter().enumerate() {
                        if let Immediate::Local(a) = arg {
                            let src = self.local(m, *a);
                            let param = self.node(Node::Param(callee, i as u32));
                            self.constraints.push(Constraint::copy(param, src));
                        }
                    }
                    if let Some(receiver) = call.receiver {
                        let src = self.local(m, receiver);
                        let this = self.node(Node::This(callee));
                        self.constraints.push(Constraint::copy(this, src));
                    }
                }
            }

            match stmt {
                Stmt::Identity { local, source } => {
                    let dst = self.local(m, *local);
                    match source {
                        IdentitySource::This => {
                            let this = self.node(Node::This(m));
                            self.constraints.push(Constraint::copy(dst, this));
                        }
                        IdentitySource::Parameter(n) => {
                            let param = self.node(Node::Param(m, *n));
                            self.constraints.push(Constraint::copy(dst, param));
                        }
                        IdentitySource::CaughtException => {
                            self.constraints.push(Constraint::alloc(dst, EXTERNAL_LOCATION));
                        }
                    }
                }
                Stmt::Assign { place, value } => {
                    self.assign_constraints(method, stmt_id, place, value);
                }
                Stmt::Return(Some(Immediate::Local(r))) => {
                    let src = self.local(m, *r);
                    let ret = self.node(Node::Return(m));
                    self.constraints.push(Constraint::copy(ret, src));
                }
                _ => {}
            }
        }
    }

    fn assign_constraints(&mut self, method: &Method, stmt: StmtId, place: &Place, value: &Rvalue) {
        let m = method.id;
        match place {
            Place::Local(l) => {
                let dst = self.local(m, *l);
                self.rvalue_into(method, stmt, dst, value);
            }
            Place::ArrayElem {
                base: Immediate::Local(b),
                ..
            } => {
                let tmp = self.temp();
                self.rvalue_into(method, stmt, tmp, value);
                let base = self.local(m, *b);
                self.constraints
                    .push(Constraint::store(base, ARRAY_CONTENTS, tmp));
            }
            Place::ArrayElem { .. } => {}
            Place::InstanceField { base, field } => {
                let tmp = self.temp();
                self.rvalue_into(method, stmt, tmp, value);
                let base = self.local(m, *base);
                let field = self.field(field);
                self.constraints.push(Constraint::store(base, field, tmp));
            }
            Place::StaticField(field) => {
                let global = self.node(Node::Static(field.to_string()));
                self.rvalue_into(method, stmt, global, value);
            }
        }
    }

    /// Constraints making `dst` point to whatever `value` evaluates to
    fn rvalue_into(&mut self, method: &Method, stmt: StmtId, dst: VarId, value: &Rvalue) {
        let m = method.id;
        match value {
            Rvalue::Use(Immediate::Local(r))
            | Rvalue::Cast {
                value: Immediate::Local(r),
                ..
            } => {
                let src = self.local(m, *r);
                self.constraints.push(Constraint::copy(dst, src));
            }
            Rvalue::New(class) => {
                let loc = self
                    .locations
                    .create(format!("{}{}", method.signature(), stmt), class.clone());
                self.constraints.push(Constraint::alloc(dst, loc));
            }
            Rvalue::NewArray { elem, .. } => {
                let loc = self
                    .locations
                    .create(format!("{}{}", method.signature(), stmt), format!("{}[]", elem));
                self.constraints.push(Constraint::alloc(dst, loc));
            }
            Rvalue::NewMultiArray { elem, sizes } => {
                // one site per dimension: outer array → rows → ...
                let mut outer: Option<VarId> = None;
                for dim in 0..sizes.len() {
                    let ty = format!("{}{}", elem, "[]".repeat(sizes.len() - dim));
                    let loc = self
                        .locations
                        .create(format!("{}{}[{}]", method.signature(), stmt, dim), ty);
                    let level = self.temp();
                    self.constraints.push(Constraint::alloc(level, loc));
                    match outer {
                        Some(parent) => self
                            .constraints
                            .push(Constraint::store(parent, ARRAY_CONTENTS, level)),
                        None => self.constraints.push(Constraint::copy(dst, level)),
                    }
                    outer = Some(level);
                }
            }
            Rvalue::ArrayRead {
                base: Immediate::Local(b),
                ..
            } => {
                let base = self.local(m, *b);
                self.constraints
                    .push(Constraint::load(dst, base, ARRAY_CONTENTS));
            }
            Rvalue::InstanceField { base, field } => {
                let base = self.local(m, *base);
                let field = self.field(field);
                self.constraints.push(Constraint::load(dst, base, field));
            }
            Rvalue::StaticField(field) => {
                let global = self.node(Node::Static(field.to_string()));
                self.constraints.push(Constraint::copy(dst, global));
            }
            Rvalue::Invoke(_) => {
                let callees = self.call_graph.callees_of(m, stmt).to_vec();
                if callees.is_empty() {
                    self.constraints.push(Constraint::alloc(dst, EXTERNAL_LOCATION));
                }
                for callee in callees {
                    let ret = self.node(Node::Return(callee));
                    self.constraints.push(Constraint::copy(dst, ret));
                }
            }
            Rvalue::Use(Immediate::Const(_))
            | Rvalue::Cast { .. }
            | Rvalue::ArrayRead { .. }
            | Rvalue::Binary { .. }
            | Rvalue::Neg(_)
            | Rvalue::Length(_) => {}
        }
    }
}
