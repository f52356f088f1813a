//! Domain models for Points-to Analysis
//!
//! - AbstractLocation: allocation-site abstraction
//! - Constraint: ALLOC, COPY, LOAD, STORE
//! - PointsToGraph: solved relation, the `PointsToOracle` implementation

pub mod abstract_location;
pub mod constraint;
pub mod points_to_graph;

pub use abstract_location::{AbstractLocation, LocationFactory, LocationId, EXTERNAL_LOCATION};
pub use constraint::{Constraint, ConstraintKind, ConstraintSet, FieldId, VarId, ARRAY_CONTENTS};
pub use points_to_graph::PointsToGraph;
