//! Array Reference Feature
//!
//! Gathers the array element accesses of a loop, grouped by base local.

pub mod application;
pub mod domain;

pub use application::ArrayRefCollector;
pub use domain::{ArrayAccessMaps, ArrayRef, ArrayRefRejection};
