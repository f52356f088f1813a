pub mod solvers;

pub use solvers::{create_solver, BuiltinSolver, SmtSolver};

#[cfg(feature = "z3")]
pub use solvers::Z3Backend;
