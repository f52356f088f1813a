//! SMT Module
//!
//! Dependence queries over integer arithmetic and the solvers that decide
//! them.
//!
//! ```text
//! SMT
//! ├── domain/          # Term, Formula, SolverResult
//! ├── application/     # DependenceEncoder
//! └── infrastructure/  # SmtSolver, builtin procedure, Z3 backend
//! ```
//!
//! A loop is parallel only when its query is `Unsat`; `Sat` and `Unknown`
//! both reject.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{DependenceEncoder, EncodeError, EncodedQuery};
pub use domain::{Formula, Model, SolverResult, Term};
pub use infrastructure::{create_solver, BuiltinSolver, SmtSolver};

#[cfg(feature = "z3")]
pub use infrastructure::Z3Backend;
