//! Encodes "two distinct iterations touch the same array element" as an
//! integer formula
//!
//! Every aliasing (write, write) and (write, read) pair gets two instances,
//! suffixed `_1` and `_2`, each with its own copy of the induction variable
//! and of every value computed in the loop. Values fixed for the whole loop
//! (parameters, definitions outside the loop) are shared between instances.
//! Values that may come from an earlier iteration or from a nested loop are
//! left unconstrained.
//!
//! Symbol names:
//! - `i_3_1`: induction variable `i`, pair 3, instance 1
//! - `n`: parameter `n`
//! - `n#4`: definition of `n` at statement 4, outside the loop
//! - `$t#9_3_1`: in-loop definition at statement 9, per instance
//! - `k@12`: merge of several definitions reaching statement 12
//! - `j?0`: unconstrained value

use crate::features::array_refs::{ArrayAccessMaps, ArrayRef};
use crate::features::flow_graph::{crosses_iterations, nested_loop_statements};
use crate::features::loop_shape::{BoundValue, InductionVariable};
use crate::features::scalar_dependence::LoopLocals;
use crate::features::smt::domain::{Formula, Term};
use crate::shared::models::{
    BinOp, Immediate, LocalId, Method, NaturalLoop, Place, Rvalue, Stmt, StmtId,
};
use crate::shared::ports::MethodFlow;
use rustc_hash::FxHashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("no definition of {name} reaches {stmt}")]
    Undefined { name: String, stmt: StmtId },

    #[error("definition at {0} is not integer arithmetic")]
    UnsupportedDefinition(StmtId),
}

/// Dependence query of one loop
#[derive(Debug, Clone)]
pub struct EncodedQuery {
    /// Satisfiable iff a dependence may exist
    pub formula: Formula,
    pub pairs: usize,
}

pub struct DependenceEncoder<'a> {
    method: &'a Method,
    flow: &'a dyn MethodFlow,
    lp: &'a NaturalLoop,
    iv: &'a InductionVariable,
    loop_locals: &'a LoopLocals,
    nested: FxHashSet<StmtId>,
}

/// Shared symbols of one query
#[derive(Default)]
struct Session {
    constraints: Vec<Formula>,
    emitted: FxHashSet<String>,
    fresh: u32,
}

impl Session {
    fn unconstrained(&mut self, name: &str) -> Term {
        let term = Term::var(format!("{}?{}", name, self.fresh));
        self.fresh += 1;
        term
    }
}

/// One side of an access pair
struct Instance {
    suffix: String,
    constraints: Vec<Formula>,
    translated: FxHashSet<StmtId>,
    merged: FxHashSet<String>,
    in_progress: FxHashSet<StmtId>,
}

impl Instance {
    fn new(pair: usize, side: u8) -> Self {
        Self {
            suffix: format!("{}_{}", pair, side),
            constraints: Vec::new(),
            translated: FxHashSet::default(),
            merged: FxHashSet::default(),
            in_progress: FxHashSet::default(),
        }
    }
}

impl<'a> DependenceEncoder<'a> {
    pub fn new(
        method: &'a Method,
        flow: &'a dyn MethodFlow,
        lp: &'a NaturalLoop,
        iv: &'a InductionVariable,
        loop_locals: &'a LoopLocals,
    ) -> Self {
        let nested = nested_loop_statements(flow.natural_loops(), lp);
        Self {
            method,
            flow,
            lp,
            iv,
            loop_locals,
            nested,
        }
    }

    /// `may_alias(a, b)`: whether array locals `a` and `b` may refer to the
    /// same array. With no aliasing pair the formula is `False`.
    pub fn encode<F>(&self, maps: &ArrayAccessMaps, may_alias: F) -> Result<EncodedQuery, EncodeError>
    where
        F: Fn(LocalId, LocalId) -> bool,
    {
        let writes: Vec<&ArrayRef> = maps.all_writes().collect();
        let reads: Vec<&ArrayRef> = maps.all_reads().collect();

        let mut candidates: Vec<(&ArrayRef, &ArrayRef)> = Vec::new();
        for (i, w) in writes.iter().enumerate() {
            // includes each write with itself
            for other in &writes[i..] {
                if may_alias(w.base, other.base) {
                    candidates.push((w, other));
                }
            }
            for r in &reads {
                if may_alias(w.base, r.base) {
                    candidates.push((w, r));
                }
            }
        }

        let mut session = Session::default();
        let mut disjuncts = Vec::with_capacity(candidates.len());
        for (pair, (a, b)) in candidates.iter().enumerate() {
            disjuncts.push(self.encode_pair(pair, a, b, &mut session)?);
        }

        let pairs = disjuncts.len();
        let mut parts = session.constraints;
        parts.push(Formula::or(disjuncts));
        Ok(EncodedQuery {
            formula: Formula::and(parts),
            pairs,
        })
    }

    fn encode_pair(
        &self,
        pair: usize,
        a: &ArrayRef,
        b: &ArrayRef,
        session: &mut Session,
    ) -> Result<Formula, EncodeError> {
        let mut first = Instance::new(pair, 1);
        let mut second = Instance::new(pair, 2);

        let idx1 = self.use_term(a.index, a.stmt, &mut first, session)?;
        let idx2 = self.use_term(b.index, b.stmt, &mut second, session)?;

        let mut parts = self.bounds(&mut first, session)?;
        parts.extend(self.bounds(&mut second, session)?);
        parts.append(&mut first.constraints);
        parts.append(&mut second.constraints);
        parts.push(Formula::Ne(self.iv_term(&first), self.iv_term(&second)));
        parts.push(Formula::Eq(idx1, idx2));
        Ok(Formula::and(parts))
    }

    fn iv_term(&self, inst: &Instance) -> Term {
        Term::var(format!("{}_{}", self.name(self.iv.local), inst.suffix))
    }

    fn name(&self, local: LocalId) -> &str {
        &self.method.local(local).name
    }

    /// Iteration range of the induction variable. The upper bound is left
    /// out when its local may change inside the loop.
    fn bounds(&self, inst: &mut Instance, session: &mut Session) -> Result<Vec<Formula>, EncodeError> {
        let iv = self.iv_term(inst);
        let mut out = Vec::new();
        if self.iv.has_lower_bound() {
            out.push(Formula::Ge(iv.clone(), Term::int(self.iv.lower_bound)));
        }

        let upper = match self.iv.upper_bound.value {
            BoundValue::Const(c) => Some(Term::int(c)),
            BoundValue::Local(local) => {
                let defs = self.flow.defs_of_at(local, self.iv.test);
                if defs.is_empty() || defs.iter().any(|d| self.lp.contains(*d)) {
                    None
                } else {
                    Some(self.use_term(local, self.iv.test, inst, session)?)
                }
            }
        };
        if let Some(ub) = upper {
            if self.iv.upper_bound.strict {
                out.push(Formula::Le(Term::add(iv, Term::int(1)), ub));
            } else {
                out.push(Formula::Le(iv, ub));
            }
        }
        Ok(out)
    }

    /// Value of `local` just before statement `at`
    fn use_term(
        &self,
        local: LocalId,
        at: StmtId,
        inst: &mut Instance,
        session: &mut Session,
    ) -> Result<Term, EncodeError> {
        if local == self.iv.local {
            return Ok(self.iv_term(inst));
        }

        let defs = self.flow.defs_of_at(local, at);
        match defs.as_slice() {
            [] => Err(EncodeError::Undefined {
                name: self.name(local).to_string(),
                stmt: at,
            }),
            [def] => self.def_term(local, *def, at, inst, session),
            _ => {
                let shared = defs.iter().all(|d| !self.lp.contains(*d));
                let symbol = if shared {
                    format!("{}@{}", self.name(local), at.0)
                } else {
                    format!("{}@{}_{}", self.name(local), at.0, inst.suffix)
                };
                let fresh = if shared {
                    session.emitted.insert(symbol.clone())
                } else {
                    inst.merged.insert(symbol.clone())
                };
                if fresh {
                    let mut options = Vec::with_capacity(defs.len());
                    for &def in &defs {
                        let value = self.def_term(local, def, at, inst, session)?;
                        options.push(Formula::Eq(Term::var(symbol.clone()), value));
                    }
                    let merge = Formula::or(options);
                    if shared {
                        session.constraints.push(merge);
                    } else {
                        inst.constraints.push(merge);
                    }
                }
                Ok(Term::var(symbol))
            }
        }
    }

    /// Value assigned to `local` by `def`, as seen at `at`
    fn def_term(
        &self,
        local: LocalId,
        def: StmtId,
        at: StmtId,
        inst: &mut Instance,
        session: &mut Session,
    ) -> Result<Term, EncodeError> {
        let stmt = self.method.stmt(def);
        if matches!(stmt, Stmt::Identity { .. }) {
            return Ok(Term::var(self.name(local)));
        }

        if !self.lp.contains(def) {
            let symbol = format!("{}#{}", self.name(local), def.0);
            if let Stmt::Assign {
                value: Rvalue::Use(Immediate::Const(c)),
                ..
            } = stmt
            {
                if let Some(v) = c.as_int() {
                    if session.emitted.insert(symbol.clone()) {
                        session
                            .constraints
                            .push(Formula::Eq(Term::var(symbol.clone()), Term::int(v)));
                    }
                }
            }
            return Ok(Term::var(symbol));
        }

        if self.nested.contains(&def)
            || !self.loop_locals.contains(local)
            || crosses_iterations(self.flow, self.lp, self.iv.update, at, def)
        {
            return Ok(session.unconstrained(self.name(local)));
        }

        let symbol = Term::var(format!("{}#{}_{}", self.name(local), def.0, inst.suffix));
        if inst.translated.contains(&def) {
            return Ok(symbol);
        }
        if !inst.in_progress.insert(def) {
            return Ok(session.unconstrained(self.name(local)));
        }
        let value = self.translate(def, inst, session);
        inst.in_progress.remove(&def);

        inst.constraints.push(Formula::Eq(symbol.clone(), value?));
        inst.translated.insert(def);
        Ok(symbol)
    }

    fn translate(&self, def: StmtId, inst: &mut Instance, session: &mut Session) -> Result<Term, EncodeError> {
        let Stmt::Assign {
            place: Place::Local(_),
            value,
        } = self.method.stmt(def)
        else {
            return Err(EncodeError::UnsupportedDefinition(def));
        };

        match value {
            Rvalue::Use(imm) => self.operand(imm, def, inst, session),
            Rvalue::Neg(imm) => Ok(Term::sub(
                Term::int(0),
                self.operand(imm, def, inst, session)?,
            )),
            Rvalue::Binary { op, lhs, rhs } => {
                let combine = match op {
                    BinOp::Add => Term::add,
                    BinOp::Sub => Term::sub,
                    BinOp::Mul => Term::mul,
                    _ => return Err(EncodeError::UnsupportedDefinition(def)),
                };
                let lhs = self.operand(lhs, def, inst, session)?;
                let rhs = self.operand(rhs, def, inst, session)?;
                Ok(combine(lhs, rhs))
            }
            _ => Err(EncodeError::UnsupportedDefinition(def)),
        }
    }

    fn operand(
        &self,
        imm: &Immediate,
        at: StmtId,
        inst: &mut Instance,
        session: &mut Session,
    ) -> Result<Term, EncodeError> {
        match imm {
            Immediate::Local(local) => self.use_term(*local, at, inst, session),
            Immediate::Const(c) => c
                .as_int()
                .map(Term::int)
                .ok_or(EncodeError::UnsupportedDefinition(at)),
        }
    }
}
