//! Andersen's Points-to Analysis Solver
//!
//! Inclusion-based, flow-insensitive, field-sensitive. Heap cells `(o, f)`
//! become constraint variables on demand; LOAD/STORE constraints add copy
//! edges to them as the base points-to sets grow.
//!
//! # References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Pearce et al. "Efficient Field-Sensitive Pointer Analysis" (CC 2004)

use crate::features::points_to::domain::{
    Constraint, ConstraintKind, ConstraintSet, FieldId, LocationId, VarId,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct AndersenStats {
    pub constraints_total: usize,
    pub constraints_alloc: usize,
    pub constraints_copy: usize,
    pub constraints_complex: usize,
    pub heap_cells: usize,
    pub iterations: usize,
    pub propagations: usize,
}

pub struct AndersenSolver {
    constraints: ConstraintSet,

    /// var → locations
    points_to: Vec<BTreeSet<LocationId>>,

    /// rhs → {lhs}
    copy_edges: Vec<FxHashSet<VarId>>,

    /// base → (dst, field)
    loads: FxHashMap<VarId, Vec<(VarId, FieldId)>>,

    /// base → (src, field)
    stores: FxHashMap<VarId, Vec<(VarId, FieldId)>>,

    heap_cells: FxHashMap<(LocationId, FieldId), VarId>,

    worklist: VecDeque<VarId>,
    in_worklist: FxHashSet<VarId>,

    stats: AndersenStats,
}

impl AndersenSolver {
    /// `var_count` variables (0..var_count) are allocated up front
    pub fn new(var_count: usize) -> Self {
        Self {
            constraints: ConstraintSet::new(),
            points_to: vec![BTreeSet::new(); var_count],
            copy_edges: vec![FxHashSet::default(); var_count],
            loads: FxHashMap::default(),
            stores: FxHashMap::default(),
            heap_cells: FxHashMap::default(),
            worklist: VecDeque::new(),
            in_worklist: FxHashSet::default(),
            stats: AndersenStats::default(),
        }
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.add(constraint);
    }

    pub fn add_constraints(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        for c in constraints {
            self.add_constraint(c);
        }
    }

    pub fn stats(&self) -> &AndersenStats {
        &self.stats
    }

    /// Solve to a fixed point; returns the points-to set of every variable
    pub fn solve(mut self) -> (Vec<BTreeSet<LocationId>>, AndersenStats) {
        self.stats.constraints_total = self.constraints.len();
        self.stats.constraints_alloc = self.constraints.alloc_count;
        self.stats.constraints_copy = self.constraints.copy_count;
        self.stats.constraints_complex = self.constraints.load_count + self.constraints.store_count;

        let constraints: Vec<Constraint> = self.constraints.iter().copied().collect();
        for c in constraints {
            self.ensure_var(c.lhs);
            match c.kind {
                ConstraintKind::Alloc => {
                    self.points_to[c.lhs as usize].insert(c.rhs);
                    self.enqueue(c.lhs);
                }
                ConstraintKind::Copy => {
                    self.ensure_var(c.rhs);
                    self.copy_edges[c.rhs as usize].insert(c.lhs);
                }
                ConstraintKind::Load => {
                    self.ensure_var(c.rhs);
                    let field = c.field.unwrap_or_default();
                    self.loads.entry(c.rhs).or_default().push((c.lhs, field));
                }
                ConstraintKind::Store => {
                    self.ensure_var(c.rhs);
                    let field = c.field.unwrap_or_default();
                    self.stores.entry(c.lhs).or_default().push((c.rhs, field));
                }
            }
        }

        while let Some(var) = self.worklist.pop_front() {
            self.stats.iterations += 1;
            self.in_worklist.remove(&var);

            let current = self.points_to[var as usize].clone();
            if current.is_empty() {
                continue;
            }

            if let Some(loads) = self.loads.get(&var).cloned() {
                for (dst, field) in loads {
                    for &loc in &current {
                        let cell = self.heap_cell(loc, field);
                        self.add_edge(cell, dst);
                    }
                }
            }
            if let Some(stores) = self.stores.get(&var).cloned() {
                for (src, field) in stores {
                    for &loc in &current {
                        let cell = self.heap_cell(loc, field);
                        self.add_edge(src, cell);
                    }
                }
            }

            let successors: Vec<VarId> = self.copy_edges[var as usize].iter().copied().collect();
            for succ in successors {
                self.propagate(var, succ);
            }
        }

        self.stats.heap_cells = self.heap_cells.len();
        (self.points_to, self.stats)
    }

    fn ensure_var(&mut self, var: VarId) {
        let needed = var as usize + 1;
        if self.points_to.len() < needed {
            self.points_to.resize(needed, BTreeSet::new());
            self.copy_edges.resize(needed, FxHashSet::default());
        }
    }

    fn heap_cell(&mut self, loc: LocationId, field: FieldId) -> VarId {
        if let Some(&cell) = self.heap_cells.get(&(loc, field)) {
            return cell;
        }
        let cell = self.points_to.len() as VarId;
        self.ensure_var(cell);
        self.heap_cells.insert((loc, field), cell);
        cell
    }

    fn add_edge(&mut self, from: VarId, to: VarId) {
        if from != to && self.copy_edges[from as usize].insert(to) {
            self.propagate(from, to);
        }
    }

    fn propagate(&mut self, from: VarId, to: VarId) {
        let source = self.points_to[from as usize].clone();
        let target = &mut self.points_to[to as usize];
        let before = target.len();
        target.extend(source);
        if target.len() > before {
            self.stats.propagations += 1;
            self.enqueue(to);
        }
    }

    fn enqueue(&mut self, var: VarId) {
        if self.in_worklist.insert(var) {
            self.worklist.push_back(var);
        }
    }
}
