//! Flow graph infrastructure - CFG, loops, dataflow

pub mod cfg;
pub mod dataflow;
pub mod method_flow;

pub use cfg::StatementCfg;
pub use dataflow::{LiveVariables, ReachingDefinitions};
pub use method_flow::StatementFlow;
