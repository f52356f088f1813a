//! Annotation Feature
//!
//! Parallel regions of accepted loops, keyed by method signature and
//! serialized once per run.

pub mod application;
pub mod domain;

pub use application::{AnnotationEmitter, EmitRejection};
pub use domain::{AnnotationMap, ParallelRegion};
