//! Canonical counted-loop recognition
//!
//! Accepted shape (statements in position order):
//!
//! ```text
//!     v = <int const>            // initializer, right before the header
//! header:
//!     ...                        // no array access before the test
//!     if v >= ub goto exit       // first conditional: the only exit
//!     ...                        // body, never assigns v
//!     v = v + step               // update
//!     goto header                // back jump, last loop statement
//! ```

use crate::features::loop_shape::domain::{
    BoundValue, InductionVariable, ShapeRejection, Step, UpperBound,
};
use crate::shared::models::{
    BinOp, CondOp, Immediate, LocalId, Method, NaturalLoop, Place, Rvalue, Stmt, StmtId,
};
use crate::shared::ports::MethodFlow;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoopShapeRecognizer;

impl LoopShapeRecognizer {
    pub fn new() -> Self {
        Self
    }

    pub fn recognize(
        &self,
        method: &Method,
        flow: &dyn MethodFlow,
        lp: &NaturalLoop,
    ) -> Result<InductionVariable, ShapeRejection> {
        let result = self.recognize_inner(method, flow, lp);
        if let Err(reason) = &result {
            debug!(method = %method.signature(), header = %lp.header, %reason, "loop shape rejected");
        }
        result
    }

    fn recognize_inner(
        &self,
        method: &Method,
        flow: &dyn MethodFlow,
        lp: &NaturalLoop,
    ) -> Result<InductionVariable, ShapeRejection> {
        if !lp.has_single_exit() {
            return Err(ShapeRejection::MultipleExits);
        }
        let n = lp.statements.len();
        if n < 3 || lp.statements.last() != Some(&lp.back_jump) || lp.first_position() != lp.header {
            return Err(ShapeRejection::BackJumpNotLast);
        }

        let (test, cond, target) = lp
            .statements
            .iter()
            .find_map(|&s| match method.stmt(s) {
                Stmt::If { cond, target } => Some((s, cond, *target)),
                _ => None,
            })
            .ok_or(ShapeRejection::NoLoopTest)?;
        if lp.contains(target) || lp.exits.first().map(|(src, _)| *src) != Some(test) {
            return Err(ShapeRejection::TestNotExit);
        }

        let update = lp.statements[n - 2];
        let (iv, step_operand) = match method.stmt(update) {
            Stmt::Assign {
                place: Place::Local(v),
                value:
                    Rvalue::Binary {
                        op: BinOp::Add,
                        lhs,
                        rhs,
                    },
            } => {
                let v = *v;
                if lhs.as_local() == Some(v) {
                    (v, rhs)
                } else if rhs.as_local() == Some(v) {
                    (v, lhs)
                } else {
                    return Err(ShapeRejection::UpdateNotIncrement);
                }
            }
            _ => return Err(ShapeRejection::UpdateNotIncrement),
        };

        let on_left = cond.lhs.as_local() == Some(iv);
        let on_right = cond.rhs.as_local() == Some(iv);
        let (bound, strict) = match (on_left, on_right, cond.op) {
            (false, false, _) => return Err(ShapeRejection::UpdateNotInTest),
            (true, false, CondOp::Ge) => (&cond.rhs, true),
            (true, false, CondOp::Gt) => (&cond.rhs, false),
            (false, true, CondOp::Le) => (&cond.lhs, true),
            (false, true, CondOp::Lt) => (&cond.lhs, false),
            _ => return Err(ShapeRejection::UnsupportedComparison),
        };
        let bound = match bound {
            Immediate::Local(l) => BoundValue::Local(*l),
            Immediate::Const(c) => BoundValue::Const(c.as_int().ok_or(ShapeRejection::NonIntegerBound)?),
        };

        let assigned_in_loop = |local: LocalId| {
            lp.statements
                .iter()
                .any(|&s| s != update && method.stmt(s).def_local() == Some(local))
        };

        let step = match step_operand {
            Immediate::Const(c) => match c.as_int() {
                Some(k) if k > 0 => Step::Const(k),
                _ => return Err(ShapeRejection::UnsupportedStep),
            },
            Immediate::Local(s) if *s != iv && !assigned_in_loop(*s) => Step::Local(*s),
            Immediate::Local(_) => return Err(ShapeRejection::UnsupportedStep),
        };

        if assigned_in_loop(iv) {
            return Err(ShapeRejection::InductionReassigned);
        }

        let init = lp
            .header
            .0
            .checked_sub(1)
            .map(StmtId)
            .ok_or(ShapeRejection::NoInitializer)?;
        let lower_bound = match method.stmt(init) {
            Stmt::Assign {
                place: Place::Local(v),
                value: Rvalue::Use(Immediate::Const(c)),
            } if *v == iv => c.as_int().ok_or(ShapeRejection::NoInitializer)?,
            _ => return Err(ShapeRejection::NoInitializer),
        };

        if flow
            .defs_of_at(iv, lp.header)
            .iter()
            .any(|&d| d != init && d != update)
        {
            return Err(ShapeRejection::MultipleInitializers);
        }

        if lp
            .statements
            .iter()
            .any(|&s| s < test && method.stmt(s).array_access().is_some())
        {
            return Err(ShapeRejection::AccessBeforeTest);
        }

        Ok(InductionVariable {
            local: iv,
            lower_bound,
            upper_bound: UpperBound {
                value: bound,
                strict,
            },
            step,
            test,
            update,
            init,
        })
    }
}
