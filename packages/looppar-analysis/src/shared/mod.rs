//! Shared module - Common types and utilities
//!
//! Subject-program IR and the ports every analysis stage depends on.
//! No stage-specific logic lives here.

pub mod models;
pub mod ports;

pub use models::*;
pub use ports::{CallGraph, CalleeKind, FlowToolkit, MethodFlow, PointsToOracle, VarKey};
