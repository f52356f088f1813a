//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/         - Pure analysis facts and rejections
//! - application/    - The stage itself
//! - infrastructure/ - Solvers, graph builders, parsers
//!
//! Stages in pipeline order:

// Textual IR front end
pub mod parsing;

// Statement CFG, natural loops, reaching definitions, liveness
pub mod flow_graph;

// CHA call graph
pub mod call_graph;

// Andersen points-to (may-alias oracle)
pub mod points_to;

// Read/write purity per method
pub mod purity;

// Canonical counted loops
pub mod loop_shape;

// Loop-carried scalars
pub mod scalar_dependence;

pub mod array_refs;

// Dependence queries and solvers
pub mod smt;

// annotationMap.json
pub mod annotation;
