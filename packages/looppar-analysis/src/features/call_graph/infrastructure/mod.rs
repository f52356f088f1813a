pub mod static_call_graph;

pub use static_call_graph::StaticCallGraph;
