//! SMT Domain Models

pub mod formula;

pub use formula::{Formula, Term};

use std::collections::BTreeMap;

/// Satisfying assignment, by variable name
pub type Model = BTreeMap<String, i64>;

/// Solver result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// Satisfiable, with a witness
    Sat(Model),

    /// Unsatisfiable
    Unsat,

    /// Timeout, resource limit or unsupported arithmetic
    Unknown,
}

impl SolverResult {
    pub fn is_unsat(&self) -> bool {
        matches!(self, SolverResult::Unsat)
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, SolverResult::Sat(_))
    }
}
