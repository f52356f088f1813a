//! Builtin integer decision procedure
//!
//! Decides quantifier-free formulas over (possibly nonlinear) integer
//! polynomials well enough for index-equality queries:
//!
//! 1. Negation normal form, then DNF (capped)
//! 2. Per disjunct: gcd normalization, elimination of unit-coefficient
//!    variables, exact two-variable Diophantine parametrization
//! 3. Constant contradictions and proportional disequalities
//! 4. Single-variable interval bounds
//! 5. Bounded witness search; an exhausted finite domain proves `Unsat`
//!
//! Anything it cannot settle comes back as `Unknown`.

use super::polynomial::{ext_gcd, Poly, VarIdx};
use super::SmtSolver;
use crate::config::SolverConfig;
use crate::features::smt::domain::{Formula, Model, SolverResult, Term};
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// `poly rel 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Eq,
    Ne,
    Ge,
}

#[derive(Debug, Clone)]
struct Literal {
    rel: Relation,
    diff: Term,
}

/// Why a disjunct was not decided `Sat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unsat,
    Unknown,
}

pub struct BuiltinSolver {
    timeout: Duration,
    max_disjuncts: usize,
    search_bound: i128,
}

impl BuiltinSolver {
    pub fn new(config: &SolverConfig) -> Self {
        Self::with_limits(
            Duration::from_millis(config.timeout_ms),
            config.max_disjuncts,
            config.witness_search_bound,
        )
    }

    pub fn with_limits(timeout: Duration, max_disjuncts: usize, search_bound: i64) -> Self {
        Self {
            timeout,
            max_disjuncts: max_disjuncts.max(1),
            search_bound: i128::from(search_bound.max(1)),
        }
    }

    fn decide(&self, literals: &[Literal], deadline: Instant) -> SolverResult {
        let mut vars = VarTable::default();
        let mut system = System::default();
        for lit in literals {
            let Some(poly) = vars.poly_of(&lit.diff) else {
                return SolverResult::Unknown;
            };
            match lit.rel {
                Relation::Eq => system.eqs.push(poly),
                Relation::Ne => system.nes.push(poly),
                Relation::Ge => system.ges.push(poly),
            }
        }

        if let Err(outcome) = system.simplify(&mut vars) {
            return outcome.into();
        }
        let bounds = match system.intervals(vars.len()) {
            Ok(bounds) => bounds,
            Err(outcome) => return outcome.into(),
        };

        let mut search = WitnessSearch::new(&system, &bounds, self.search_bound, deadline);
        let mut values: Vec<Option<i128>> = vec![None; vars.len()];
        match search.run(0, &mut values) {
            Search::Found => {}
            Search::Exhausted if search.exhaustive && !search.lossy => return SolverResult::Unsat,
            Search::Exhausted | Search::Aborted => return SolverResult::Unknown,
        }

        match system.model(&vars, values) {
            Some(model) => SolverResult::Sat(model),
            None => SolverResult::Unknown,
        }
    }
}

impl SmtSolver for BuiltinSolver {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn check(&self, formula: &Formula) -> SolverResult {
        let deadline = Instant::now() + self.timeout;
        let Some(disjuncts) = dnf(formula, false, self.max_disjuncts) else {
            debug!(cap = self.max_disjuncts, "DNF expansion exceeded cap");
            return SolverResult::Unknown;
        };

        let mut unknown = false;
        for literals in &disjuncts {
            if Instant::now() >= deadline {
                debug!("builtin solver timed out");
                return SolverResult::Unknown;
            }
            match self.decide(literals, deadline) {
                SolverResult::Sat(model) => return SolverResult::Sat(model),
                SolverResult::Unsat => {}
                SolverResult::Unknown => unknown = true,
            }
        }

        if unknown {
            SolverResult::Unknown
        } else {
            SolverResult::Unsat
        }
    }
}

impl From<Outcome> for SolverResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Unsat => SolverResult::Unsat,
            Outcome::Unknown => SolverResult::Unknown,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Normal forms
// ═══════════════════════════════════════════════════════════════════════════

fn literal(atom: &Formula, negated: bool) -> Option<Literal> {
    let (rel, diff) = match (atom, negated) {
        (Formula::Eq(a, b), false) | (Formula::Ne(a, b), true) => {
            (Relation::Eq, Term::sub(a.clone(), b.clone()))
        }
        (Formula::Ne(a, b), false) | (Formula::Eq(a, b), true) => {
            (Relation::Ne, Term::sub(a.clone(), b.clone()))
        }
        (Formula::Le(a, b), false) => (Relation::Ge, Term::sub(b.clone(), a.clone())),
        (Formula::Ge(a, b), false) => (Relation::Ge, Term::sub(a.clone(), b.clone())),
        // a > b  <=>  a - b - 1 >= 0
        (Formula::Le(a, b), true) => (
            Relation::Ge,
            Term::sub(Term::sub(a.clone(), b.clone()), Term::int(1)),
        ),
        (Formula::Ge(a, b), true) => (
            Relation::Ge,
            Term::sub(Term::sub(b.clone(), a.clone()), Term::int(1)),
        ),
        _ => return None,
    };
    Some(Literal { rel, diff })
}

/// Disjunctive normal form of `formula` (negated when `negated`); `None`
/// once more than `cap` disjuncts would be needed
fn dnf(formula: &Formula, negated: bool, cap: usize) -> Option<Vec<Vec<Literal>>> {
    match (formula, negated) {
        (Formula::True, false) | (Formula::False, true) => Some(vec![Vec::new()]),
        (Formula::False, false) | (Formula::True, true) => Some(Vec::new()),
        (Formula::Not(inner), _) => dnf(inner, !negated, cap),
        (Formula::And(parts), false) | (Formula::Or(parts), true) => {
            let mut acc: Vec<Vec<Literal>> = vec![Vec::new()];
            for part in parts {
                let sub = dnf(part, negated, cap)?;
                if acc.len().saturating_mul(sub.len()) > cap {
                    return None;
                }
                acc = acc
                    .iter()
                    .flat_map(|left| {
                        sub.iter().map(move |right| {
                            let mut both = left.clone();
                            both.extend(right.iter().cloned());
                            both
                        })
                    })
                    .collect();
                if acc.is_empty() {
                    break;
                }
            }
            Some(acc)
        }
        (Formula::Or(parts), false) | (Formula::And(parts), true) => {
            let mut acc = Vec::new();
            for part in parts {
                acc.extend(dnf(part, negated, cap)?);
                if acc.len() > cap {
                    return None;
                }
            }
            Some(acc)
        }
        (atom, _) => literal(atom, negated).map(|lit| vec![vec![lit]]),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Variables
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct VarTable {
    names: Vec<Option<String>>,
    index: FxHashMap<String, VarIdx>,
}

impl VarTable {
    fn len(&self) -> usize {
        self.names.len()
    }

    fn intern(&mut self, name: &str) -> VarIdx {
        if let Some(&v) = self.index.get(name) {
            return v;
        }
        let v = self.names.len();
        self.names.push(Some(name.to_string()));
        self.index.insert(name.to_string(), v);
        v
    }

    /// Solver-internal variable, absent from models
    fn fresh(&mut self) -> VarIdx {
        self.names.push(None);
        self.names.len() - 1
    }

    fn poly_of(&mut self, term: &Term) -> Option<Poly> {
        match term {
            Term::Const(c) => Some(Poly::constant(i128::from(*c))),
            Term::Var(name) => Some(Poly::var(self.intern(name))),
            Term::Add(a, b) => self.poly_of(a)?.checked_add(&self.poly_of(b)?),
            Term::Sub(a, b) => self.poly_of(a)?.checked_sub(&self.poly_of(b)?),
            Term::Mul(a, b) => self.poly_of(a)?.checked_mul(&self.poly_of(b)?),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Conjunctive system
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct System {
    eqs: Vec<Poly>,
    nes: Vec<Poly>,
    ges: Vec<Poly>,
    /// Eliminated variables in elimination order
    solved: Vec<(VarIdx, Poly)>,
}

type Interval = (Option<i128>, Option<i128>);

impl System {
    fn simplify(&mut self, vars: &mut VarTable) -> Result<(), Outcome> {
        loop {
            self.normalize()?;
            if self.eliminate_unit()? || self.eliminate_pair(vars)? {
                continue;
            }
            self.check_disequalities()?;
            return Ok(());
        }
    }

    /// Drops decided constant atoms and divides out coefficient gcds
    fn normalize(&mut self) -> Result<(), Outcome> {
        let mut eqs = Vec::with_capacity(self.eqs.len());
        for p in self.eqs.drain(..) {
            if let Some(c) = p.as_constant() {
                if c != 0 {
                    return Err(Outcome::Unsat);
                }
                continue;
            }
            let g = p.var_content();
            if p.constant_term() % g != 0 {
                return Err(Outcome::Unsat);
            }
            eqs.push(p.divide_floor(g));
        }
        self.eqs = eqs;

        let mut nes = Vec::with_capacity(self.nes.len());
        for p in self.nes.drain(..) {
            if let Some(c) = p.as_constant() {
                if c == 0 {
                    return Err(Outcome::Unsat);
                }
                continue;
            }
            let g = p.var_content();
            // can never be zero
            if p.constant_term() % g != 0 {
                continue;
            }
            nes.push(p.divide_floor(g));
        }
        self.nes = nes;

        let mut ges = Vec::with_capacity(self.ges.len());
        for p in self.ges.drain(..) {
            if let Some(c) = p.as_constant() {
                if c < 0 {
                    return Err(Outcome::Unsat);
                }
                continue;
            }
            ges.push(p.divide_floor(p.var_content()));
        }
        self.ges = ges;
        Ok(())
    }

    fn substitute(&mut self, v: VarIdx, by: &Poly) -> Result<(), Outcome> {
        for p in self
            .eqs
            .iter_mut()
            .chain(self.nes.iter_mut())
            .chain(self.ges.iter_mut())
        {
            *p = p.substitute(v, by).ok_or(Outcome::Unknown)?;
        }
        Ok(())
    }

    /// Solves an equality for a variable with coefficient ±1
    fn eliminate_unit(&mut self) -> Result<bool, Outcome> {
        let found = self.eqs.iter().enumerate().find_map(|(i, p)| {
            p.vars().into_iter().find_map(|v| match p.linear_coefficient(v) {
                Some(c @ (1 | -1)) => Some((i, v, c)),
                _ => None,
            })
        });
        let Some((i, v, c)) = found else {
            return Ok(false);
        };

        let eq = self.eqs.remove(i);
        // c*v + rest = 0  =>  v = -c * rest
        let value = eq
            .checked_sub(&Poly::var(v).checked_scale(c).ok_or(Outcome::Unknown)?)
            .and_then(|rest| rest.checked_scale(-c))
            .ok_or(Outcome::Unknown)?;
        self.substitute(v, &value)?;
        self.solved.push((v, value));
        Ok(true)
    }

    /// Parametrizes `a*x + b*y + c = 0` with gcd(a, b) = 1 over a fresh `k`
    fn eliminate_pair(&mut self, vars: &mut VarTable) -> Result<bool, Outcome> {
        let found = self.eqs.iter().enumerate().find_map(|(i, p)| {
            let vs: Vec<VarIdx> = p.vars().into_iter().collect();
            if !p.is_linear() || vs.len() != 2 {
                return None;
            }
            Some((i, vs[0], vs[1], p.coefficient(&[vs[0]]), p.coefficient(&[vs[1]]), p.constant_term()))
        });
        let Some((i, x, y, a, b, c)) = found else {
            return Ok(false);
        };

        let (g, s, t) = ext_gcd(a, b);
        if g != 1 {
            return Ok(false);
        }
        self.eqs.remove(i);

        let k = Poly::var(vars.fresh());
        let overflow = || Outcome::Unknown;
        // x = -c*s + b*k,  y = -c*t - a*k
        let neg_c = c.checked_neg().ok_or_else(overflow)?;
        let x_val = Poly::constant(neg_c.checked_mul(s).ok_or_else(overflow)?)
            .checked_add(&k.checked_scale(b).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;
        let y_val = Poly::constant(neg_c.checked_mul(t).ok_or_else(overflow)?)
            .checked_sub(&k.checked_scale(a).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;

        self.substitute(x, &x_val)?;
        self.substitute(y, &y_val)?;
        self.solved.push((x, x_val));
        self.solved.push((y, y_val));
        Ok(true)
    }

    /// `p != 0` contradicts `q = 0` when `p` is a rational multiple of `q`
    fn check_disequalities(&self) -> Result<(), Outcome> {
        for ne in &self.nes {
            for eq in &self.eqs {
                if proportional(ne, eq) {
                    return Err(Outcome::Unsat);
                }
            }
        }
        Ok(())
    }

    fn intervals(&self, var_count: usize) -> Result<Vec<Interval>, Outcome> {
        let mut bounds: Vec<Interval> = vec![(None, None); var_count];
        for p in &self.ges {
            let vs = p.vars();
            if vs.len() != 1 || !p.is_linear() {
                continue;
            }
            let Some(&v) = vs.iter().next() else {
                continue;
            };
            let a = p.coefficient(&[v]);
            let c = p.constant_term();
            let (lo, hi) = &mut bounds[v];
            // normalized, so a is ±1
            if a > 0 {
                let bound = (-c).div_euclid(a) + i128::from((-c).rem_euclid(a) != 0);
                *lo = Some(lo.map_or(bound, |l| l.max(bound)));
            } else {
                let bound = c.div_euclid(-a);
                *hi = Some(hi.map_or(bound, |h| h.min(bound)));
            }
        }
        if bounds
            .iter()
            .any(|(lo, hi)| matches!((lo, hi), (Some(l), Some(h)) if l > h))
        {
            return Err(Outcome::Unsat);
        }
        Ok(bounds)
    }

    fn atoms(&self) -> impl Iterator<Item = (Relation, &Poly)> {
        self.eqs
            .iter()
            .map(|p| (Relation::Eq, p))
            .chain(self.nes.iter().map(|p| (Relation::Ne, p)))
            .chain(self.ges.iter().map(|p| (Relation::Ge, p)))
    }

    /// Completes a witness of the residual atoms into a model of the
    /// original variables
    fn model(&self, vars: &VarTable, mut values: Vec<Option<i128>>) -> Option<Model> {
        for value in values.iter_mut() {
            if value.is_none() {
                *value = Some(0);
            }
        }
        for (v, poly) in self.solved.iter().rev() {
            let value = poly.eval(&values)?;
            values[*v] = Some(value);
        }

        let mut model = Model::new();
        for (v, name) in vars.names.iter().enumerate() {
            if let (Some(name), Some(value)) = (name, values[v]) {
                model.insert(name.clone(), i64::try_from(value).ok()?);
            }
        }
        Some(model)
    }
}

fn proportional(p: &Poly, q: &Poly) -> bool {
    let Some((m0, q0)) = q.terms().find(|(m, _)| !m.is_empty()) else {
        return false;
    };
    let p0 = p.coefficient(m0);
    if p0 == 0 {
        return false;
    }
    let same = |m: &[VarIdx]| {
        let lhs = p.coefficient(m).checked_mul(q0);
        let rhs = q.coefficient(m).checked_mul(p0);
        lhs.is_some() && lhs == rhs
    };
    p.terms().all(|(m, _)| same(m)) && q.terms().all(|(m, _)| same(m))
}

// ═══════════════════════════════════════════════════════════════════════════
// Witness search
// ═══════════════════════════════════════════════════════════════════════════

enum Search {
    Found,
    Exhausted,
    Aborted,
}

struct WitnessSearch<'a> {
    order: Vec<VarIdx>,
    candidates: Vec<Vec<i128>>,
    /// Atoms decided once `order[pos]` is assigned
    checks: Vec<Vec<(Relation, &'a Poly)>>,
    deadline: Instant,
    nodes: u64,
    /// Every candidate list covers its variable's whole domain
    exhaustive: bool,
    /// Some atom could not be evaluated
    lossy: bool,
}

impl<'a> WitnessSearch<'a> {
    fn new(system: &'a System, bounds: &[Interval], radius: i128, deadline: Instant) -> Self {
        let mut order: Vec<VarIdx> = Vec::new();
        for (_, p) in system.atoms() {
            for v in p.vars() {
                if !order.contains(&v) {
                    order.push(v);
                }
            }
        }
        // finite domains first
        order.sort_by_key(|&v| {
            let (lo, hi) = bounds[v];
            match (lo, hi) {
                (Some(l), Some(h)) => (0, h - l, v),
                (Some(_), None) | (None, Some(_)) => (1, 0, v),
                (None, None) => (2, 0, v),
            }
        });

        let mut exhaustive = true;
        let candidates = order
            .iter()
            .map(|&v| {
                let (lo, hi) = bounds[v];
                let anchor = 0i128.max(lo.unwrap_or(i128::MIN)).min(hi.unwrap_or(i128::MAX));
                let low = lo.map_or(anchor - radius, |l| l.max(anchor - radius));
                let high = hi.map_or(anchor + radius, |h| h.min(anchor + radius));
                if lo != Some(low) || hi != Some(high) {
                    exhaustive = false;
                }
                let mut out = vec![anchor];
                for d in 1..=radius {
                    if anchor + d <= high {
                        out.push(anchor + d);
                    }
                    if anchor - d >= low {
                        out.push(anchor - d);
                    }
                }
                out
            })
            .collect();

        let position: FxHashMap<VarIdx, usize> =
            order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let mut checks: Vec<Vec<(Relation, &Poly)>> = vec![Vec::new(); order.len()];
        for (rel, p) in system.atoms() {
            if let Some(last) = p.vars().iter().filter_map(|v| position.get(v)).max() {
                checks[*last].push((rel, p));
            }
        }

        Self {
            order,
            candidates,
            checks,
            deadline,
            nodes: 0,
            exhaustive,
            lossy: false,
        }
    }

    fn run(&mut self, pos: usize, values: &mut Vec<Option<i128>>) -> Search {
        if pos == self.order.len() {
            return Search::Found;
        }
        let v = self.order[pos];
        for ci in 0..self.candidates[pos].len() {
            self.nodes += 1;
            if self.nodes % 1024 == 0 && Instant::now() >= self.deadline {
                return Search::Aborted;
            }
            values[v] = Some(self.candidates[pos][ci]);
            if self.consistent(pos, values) {
                match self.run(pos + 1, values) {
                    Search::Exhausted => {}
                    done => return done,
                }
            }
        }
        values[v] = None;
        Search::Exhausted
    }

    fn consistent(&mut self, pos: usize, values: &[Option<i128>]) -> bool {
        let mut lossy = false;
        let ok = self.checks[pos].iter().all(|(rel, p)| match p.eval(values) {
            Some(x) => match rel {
                Relation::Eq => x == 0,
                Relation::Ne => x != 0,
                Relation::Ge => x >= 0,
            },
            None => {
                lossy = true;
                false
            }
        });
        self.lossy |= lossy;
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn solver() -> BuiltinSolver {
        BuiltinSolver::with_limits(Duration::from_secs(5), 256, 64)
    }

    fn v(name: &str) -> Term {
        Term::var(name)
    }

    /// Distinct iterations `i1 != i2` in `[lo, n)` hitting the same index
    fn same_index(idx1: Term, idx2: Term, extra: Vec<Formula>) -> Formula {
        let mut parts = vec![
            Formula::Ge(v("i1"), Term::int(0)),
            Formula::Ge(v("i2"), Term::int(0)),
            Formula::Le(Term::add(v("i1"), Term::int(1)), v("n")),
            Formula::Le(Term::add(v("i2"), Term::int(1)), v("n")),
            Formula::Ne(v("i1"), v("i2")),
            Formula::Eq(idx1, idx2),
        ];
        parts.extend(extra);
        Formula::and(parts)
    }

    fn holds(formula: &Formula, model: &Model) -> bool {
        fn eval(t: &Term, m: &Model) -> i128 {
            match t {
                Term::Const(c) => i128::from(*c),
                Term::Var(name) => i128::from(m.get(name).copied().unwrap_or(0)),
                Term::Add(a, b) => eval(a, m) + eval(b, m),
                Term::Sub(a, b) => eval(a, m) - eval(b, m),
                Term::Mul(a, b) => eval(a, m) * eval(b, m),
            }
        }
        match formula {
            Formula::True => true,
            Formula::False => false,
            Formula::Eq(a, b) => eval(a, model) == eval(b, model),
            Formula::Ne(a, b) => eval(a, model) != eval(b, model),
            Formula::Le(a, b) => eval(a, model) <= eval(b, model),
            Formula::Ge(a, b) => eval(a, model) >= eval(b, model),
            Formula::And(ps) => ps.iter().all(|p| holds(p, model)),
            Formula::Or(ps) => ps.iter().any(|p| holds(p, model)),
            Formula::Not(p) => !holds(p, model),
        }
    }

    #[test]
    fn test_identity_index_is_unsat() {
        let f = same_index(v("i1"), v("i2"), vec![]);
        assert_eq!(solver().check(&f), SolverResult::Unsat);
    }

    #[test]
    fn test_shifted_write_read_is_sat() {
        // a[i] = a[i - 1]
        let f = same_index(v("i1"), Term::sub(v("i2"), Term::int(1)), vec![]);
        let SolverResult::Sat(model) = solver().check(&f) else {
            panic!("expected sat");
        };
        assert!(holds(&f, &model));
        assert_eq!(model["i1"] + 1, model["i2"]);
    }

    #[test]
    fn test_parity_gcd_unsat() {
        // 2*i1 == 2*i2 + 1
        let f = same_index(
            Term::mul(Term::int(2), v("i1")),
            Term::add(Term::mul(Term::int(2), v("i2")), Term::int(1)),
            vec![],
        );
        assert_eq!(solver().check(&f), SolverResult::Unsat);
    }

    #[test]
    fn test_row_major_with_shared_stride_is_unsat() {
        // x[r * w + i] with the same r and w on both sides
        let idx = |i: &str| Term::add(Term::mul(v("r"), v("w")), v(i));
        let f = same_index(idx("i1"), idx("i2"), vec![]);
        assert_eq!(solver().check(&f), SolverResult::Unsat);
    }

    #[test]
    fn test_constant_index_is_sat() {
        // a[n - 1] written every iteration
        let idx = Term::sub(v("n"), Term::int(1));
        let f = same_index(idx.clone(), idx, vec![]);
        let SolverResult::Sat(model) = solver().check(&f) else {
            panic!("expected sat");
        };
        assert!(holds(&f, &model));
    }

    #[test]
    fn test_two_variable_diophantine() {
        // 3*i1 == 5*i2 with distinct iterations has solutions (5, 3)
        let f = same_index(
            Term::mul(Term::int(3), v("i1")),
            Term::mul(Term::int(5), v("i2")),
            vec![],
        );
        let SolverResult::Sat(model) = solver().check(&f) else {
            panic!("expected sat");
        };
        assert!(holds(&f, &model));
        assert_eq!(3 * model["i1"], 5 * model["i2"]);
    }

    #[test]
    fn test_bounded_domain_exhausts_to_unsat() {
        // i1, i2 in [0, 2), i1 != i2, i1 * i1 == i2 * i2 + 1
        let f = Formula::and(vec![
            Formula::Ge(v("i1"), Term::int(0)),
            Formula::Ge(v("i2"), Term::int(0)),
            Formula::Le(v("i1"), Term::int(1)),
            Formula::Le(v("i2"), Term::int(1)),
            Formula::Eq(
                Term::mul(v("i1"), v("i1")),
                Term::add(Term::mul(v("i2"), v("i2")), Term::int(1)),
            ),
            Formula::Ne(v("i1"), v("i2")),
        ]);
        // 1 == 0 + 1 at (1, 0)
        assert!(solver().check(&f).is_sat());

        let g = Formula::and(vec![
            Formula::Ge(v("i1"), Term::int(0)),
            Formula::Le(v("i1"), Term::int(3)),
            Formula::Eq(Term::mul(v("i1"), v("i1")), Term::int(2)),
        ]);
        assert_eq!(solver().check(&g), SolverResult::Unsat);
    }

    #[test]
    fn test_unbounded_nonlinear_is_unknown() {
        // x*x == 2 has no integer solution but nothing bounds x
        let f = Formula::Eq(Term::mul(v("x"), v("x")), Term::int(2));
        assert_eq!(solver().check(&f), SolverResult::Unknown);
    }

    #[test]
    fn test_disjunction_and_negation() {
        let f = Formula::and(vec![
            Formula::or(vec![
                Formula::Eq(v("x"), Term::int(1)),
                Formula::Eq(v("x"), Term::int(2)),
            ]),
            Formula::not(Formula::Le(v("x"), Term::int(1))),
        ]);
        let SolverResult::Sat(model) = solver().check(&f) else {
            panic!("expected sat");
        };
        assert_eq!(model["x"], 2);
        assert_eq!(solver().check(&Formula::False), SolverResult::Unsat);
        assert!(solver().check(&Formula::True).is_sat());
    }

    #[test]
    fn test_dnf_cap_gives_unknown() {
        let choice = |name: &str| {
            Formula::or(vec![
                Formula::Eq(v(name), Term::int(0)),
                Formula::Eq(v(name), Term::int(1)),
            ])
        };
        let f = Formula::and((0..10).map(|i| choice(&format!("x{}", i))).collect());
        let small = BuiltinSolver::with_limits(Duration::from_secs(5), 16, 64);
        assert_eq!(small.check(&f), SolverResult::Unknown);
    }
}
