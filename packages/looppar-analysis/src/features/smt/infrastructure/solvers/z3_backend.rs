//! Z3 SMT Solver Backend
//!
//! Only available when compiled with `--features z3`.
//!
//! ```bash
//! apt-get install libz3-dev  # Linux
//! brew install z3            # macOS
//! cargo build --release --features z3
//! ```

#![cfg(feature = "z3")]

use super::SmtSolver;
use crate::features::smt::domain::{Formula, Model, SolverResult, Term};
use std::collections::BTreeMap;
use z3::ast::{Ast, Bool, Int};
use z3::{Config, Context, SatResult, Solver};

/// Z3 over linear and nonlinear integer arithmetic
///
/// A fresh context per query keeps the backend `Send + Sync`.
pub struct Z3Backend {
    timeout_ms: u64,
}

impl Z3Backend {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }
}

struct Translator<'ctx> {
    ctx: &'ctx Context,
    vars: BTreeMap<String, Int<'ctx>>,
}

impl<'ctx> Translator<'ctx> {
    fn int(&mut self, term: &Term) -> Int<'ctx> {
        match term {
            Term::Const(c) => Int::from_i64(self.ctx, *c),
            Term::Var(name) => {
                let ctx = self.ctx;
                self.vars
                    .entry(name.clone())
                    .or_insert_with(|| Int::new_const(ctx, name.as_str()))
                    .clone()
            }
            Term::Add(a, b) => {
                let (a, b) = (self.int(a), self.int(b));
                Int::add(self.ctx, &[&a, &b])
            }
            Term::Sub(a, b) => {
                let (a, b) = (self.int(a), self.int(b));
                Int::sub(self.ctx, &[&a, &b])
            }
            Term::Mul(a, b) => {
                let (a, b) = (self.int(a), self.int(b));
                Int::mul(self.ctx, &[&a, &b])
            }
        }
    }

    fn bool(&mut self, formula: &Formula) -> Bool<'ctx> {
        match formula {
            Formula::True => Bool::from_bool(self.ctx, true),
            Formula::False => Bool::from_bool(self.ctx, false),
            Formula::Eq(a, b) => {
                let (a, b) = (self.int(a), self.int(b));
                a._eq(&b)
            }
            Formula::Ne(a, b) => {
                let (a, b) = (self.int(a), self.int(b));
                a._eq(&b).not()
            }
            Formula::Le(a, b) => {
                let (a, b) = (self.int(a), self.int(b));
                a.le(&b)
            }
            Formula::Ge(a, b) => {
                let (a, b) = (self.int(a), self.int(b));
                a.ge(&b)
            }
            Formula::And(parts) => {
                let parts: Vec<Bool<'ctx>> = parts.iter().map(|p| self.bool(p)).collect();
                let refs: Vec<&Bool<'ctx>> = parts.iter().collect();
                Bool::and(self.ctx, &refs)
            }
            Formula::Or(parts) => {
                let parts: Vec<Bool<'ctx>> = parts.iter().map(|p| self.bool(p)).collect();
                let refs: Vec<&Bool<'ctx>> = parts.iter().collect();
                Bool::or(self.ctx, &refs)
            }
            Formula::Not(inner) => self.bool(inner).not(),
        }
    }
}

impl SmtSolver for Z3Backend {
    fn name(&self) -> &'static str {
        "z3"
    }

    fn check(&self, formula: &Formula) -> SolverResult {
        let mut cfg = Config::new();
        cfg.set_timeout_msec(self.timeout_ms);
        let ctx = Context::new(&cfg);
        let solver = Solver::new(&ctx);

        let mut translator = Translator {
            ctx: &ctx,
            vars: BTreeMap::new(),
        };
        let assertion = translator.bool(formula);
        solver.assert(&assertion);

        match solver.check() {
            SatResult::Unsat => SolverResult::Unsat,
            SatResult::Unknown => SolverResult::Unknown,
            SatResult::Sat => {
                let Some(z3_model) = solver.get_model() else {
                    return SolverResult::Sat(Model::new());
                };
                let model = translator
                    .vars
                    .iter()
                    .filter_map(|(name, var)| {
                        z3_model
                            .eval(var, true)
                            .and_then(|v| v.as_i64())
                            .map(|v| (name.clone(), v))
                    })
                    .collect();
                SolverResult::Sat(model)
            }
        }
    }
}
