//! Induction variable of a canonical counted loop

use crate::shared::models::{LocalId, StmtId};
use thiserror::Error;

/// Loop-invariant value added to the induction variable each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Always positive
    Const(i64),
    Local(LocalId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundValue {
    Const(i64),
    Local(LocalId),
}

/// Upper bound as seen by the loop body: `iv < value` or `iv <= value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpperBound {
    pub value: BoundValue,
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InductionVariable {
    pub local: LocalId,
    pub lower_bound: i64,
    pub upper_bound: UpperBound,
    pub step: Step,
    /// The loop's exit test
    pub test: StmtId,
    pub update: StmtId,
    pub init: StmtId,
}

impl InductionVariable {
    /// `iv >= lower_bound` holds in every iteration only when the step is a
    /// known positive constant
    pub fn has_lower_bound(&self) -> bool {
        matches!(self.step, Step::Const(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeRejection {
    #[error("loop has more than one exit")]
    MultipleExits,

    #[error("back jump is not the last loop statement")]
    BackJumpNotLast,

    #[error("loop has no conditional test")]
    NoLoopTest,

    #[error("loop test does not branch out of the loop")]
    TestNotExit,

    #[error("statement before the back jump is not `v = v + step`")]
    UpdateNotIncrement,

    #[error("updated variable does not appear in the loop test")]
    UpdateNotInTest,

    #[error("unsupported comparison shape in loop test")]
    UnsupportedComparison,

    #[error("upper bound is not an integer")]
    NonIntegerBound,

    #[error("step is not a positive constant or loop-invariant local")]
    UnsupportedStep,

    #[error("induction variable assigned inside the loop body")]
    InductionReassigned,

    #[error("no integer-constant initializer immediately before the loop")]
    NoInitializer,

    #[error("induction variable reaches the header from more than one initializer")]
    MultipleInitializers,

    #[error("array access before the loop test")]
    AccessBeforeTest,
}
