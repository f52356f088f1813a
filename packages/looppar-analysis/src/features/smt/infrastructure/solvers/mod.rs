//! SMT Solver Implementations
//!
//! 1. **Builtin**: integer decision procedure, always available
//! 2. **Z3Backend**: full SMT solver (optional, feature-gated)

use crate::config::{SolverBackend, SolverConfig};
use crate::errors::Result;
use crate::features::smt::domain::{Formula, SolverResult};

pub mod builtin;
pub mod polynomial;

#[cfg(feature = "z3")]
pub mod z3_backend;

pub use builtin::BuiltinSolver;

#[cfg(feature = "z3")]
pub use z3_backend::Z3Backend;

/// Decides satisfiability of an integer formula
///
/// Implementations must be sound for `Unsat`: it is the only answer that
/// lets a loop be parallelized.
pub trait SmtSolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, formula: &Formula) -> SolverResult;
}

/// Solver for the configured backend
pub fn create_solver(config: &SolverConfig) -> Result<Box<dyn SmtSolver>> {
    match config.backend {
        SolverBackend::Builtin => Ok(Box::new(BuiltinSolver::new(config))),
        #[cfg(feature = "z3")]
        SolverBackend::Z3 => Ok(Box::new(Z3Backend::new(config.timeout_ms))),
        #[cfg(not(feature = "z3"))]
        SolverBackend::Z3 => Err(crate::config::ConfigError::BackendUnavailable(
            SolverBackend::Z3.name().to_string(),
            "Rebuild with `--features z3` or use the builtin backend.".to_string(),
        )
        .into()),
    }
}
