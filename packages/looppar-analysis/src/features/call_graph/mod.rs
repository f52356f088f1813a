//! Call Graph Feature
//!
//! Resolves every call site of the program to its possible targets and
//! classifies callees for the purity oracle.
//!
//! - static / special calls: declared method, walking superclasses
//! - virtual / interface calls: class-hierarchy analysis over the receiver's subtree

pub mod infrastructure;

pub use infrastructure::StaticCallGraph;
