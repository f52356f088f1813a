//! Flow Graph Feature
//!
//! Statement-level control flow for one method at a time: successors,
//! dominator-based natural loops, reaching definitions and liveness.
//!
//! ## Structure
//! - `domain/` - path queries shared by the scalar and SMT stages
//! - `infrastructure/` - StatementCfg (petgraph), worklist dataflow, StatementFlow
//! - `application/` - StatementFlowToolkit (the `FlowToolkit` port)

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::StatementFlowToolkit;
pub use domain::{crosses_iterations, nested_loop_statements, path_avoiding};
pub use infrastructure::StatementFlow;
