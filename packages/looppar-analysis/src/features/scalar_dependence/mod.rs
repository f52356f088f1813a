//! Scalar Dependence Feature
//!
//! Decides which locals written in a loop are loop-local and rejects loops
//! with a loop-carried scalar dependence or a field write.

pub mod application;
pub mod domain;

pub use application::ScalarDependenceChecker;
pub use domain::{LoopLocals, ScalarRejection};
