pub mod induction_variable;

pub use induction_variable::{BoundValue, InductionVariable, ShapeRejection, Step, UpperBound};
