pub mod andersen_solver;

pub use andersen_solver::{AndersenSolver, AndersenStats};
