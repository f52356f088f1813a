//! Loop Shape Feature
//!
//! Extracts the induction variable, bounds and step of a natural loop and
//! rejects anything that is not a canonical counted loop.

pub mod application;
pub mod domain;

pub use application::LoopShapeRecognizer;
pub use domain::{BoundValue, InductionVariable, ShapeRejection, Step, UpperBound};
