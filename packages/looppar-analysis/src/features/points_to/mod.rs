//! # Points-to Analysis Module
//!
//! Whole-program Andersen analysis backing the `PointsToOracle` port:
//! allocation sites (one per `newmultiarray` dimension), copies and casts,
//! field and array-content loads/stores, static fields as globals, and
//! parameter/receiver/return passing along call-graph edges.
//!
//! Reference parameters of methods without callers start out pointing to a
//! shared `external` location, so two such parameters may alias.
//!
//! ## Academic References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Pearce et al. "Efficient Field-Sensitive Pointer Analysis" (CC 2004)

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::PointsToAnalyzer;
pub use domain::{AbstractLocation, Constraint, ConstraintKind, PointsToGraph};
#[doc(hidden)]
pub use infrastructure::AndersenSolver;
