pub mod paths;

pub use paths::{crosses_iterations, nested_loop_statements, path_avoiding};
