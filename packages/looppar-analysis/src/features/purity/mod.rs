//! Purity Oracle Feature
//!
//! Classifies every application method as read-pure and/or write-pure.
//! Library methods, constructors, static initializers and unresolved call
//! sites are never classified and make the calling statement impure.
//!
//! ## Structure
//! - `domain/` - PurityRecord, PurityTable, EscapingLocals
//! - `application/` - PurityAnalysis (callee-before-caller propagation)

pub mod application;
pub mod domain;

pub use application::PurityAnalysis;
pub use domain::{EscapingLocals, PurityRecord, PurityTable};
