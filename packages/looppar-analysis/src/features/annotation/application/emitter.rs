//! Turns an accepted loop into a `ParallelRegion`

use crate::features::annotation::domain::ParallelRegion;
use crate::features::loop_shape::InductionVariable;
use crate::shared::models::{Method, NaturalLoop};
use crate::shared::ports::MethodFlow;
use thiserror::Error;

/// Slots 0..=3 have single-byte store forms
const SHORT_STORE_SLOTS: u32 = 3;
/// Width of the backward `goto`
const GOTO_WIDTH: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitRejection {
    #[error("induction variable {0} is a stack temporary without a local slot")]
    NoSlot(String),

    #[error("loop extent is empty")]
    EmptyExtent,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AnnotationEmitter;

impl AnnotationEmitter {
    pub fn new() -> Self {
        Self
    }

    /// The region starts right after the initializer's store and ends with
    /// the back jump.
    pub fn region(
        &self,
        method: &Method,
        flow: &dyn MethodFlow,
        lp: &NaturalLoop,
        iv: &InductionVariable,
    ) -> Result<ParallelRegion, EmitRejection> {
        let slot = method
            .slot_of(iv.local)
            .ok_or_else(|| EmitRejection::NoSlot(method.local(iv.local).name.clone()))?;

        let init = flow.instruction_offset(iv.init);
        let back_jump = flow.instruction_offset(lp.back_jump);
        let (start, end) = if flow.has_bytecode_offsets() {
            let store_width = if slot <= SHORT_STORE_SLOTS { 1 } else { 2 };
            (init + store_width, back_jump + GOTO_WIDTH)
        } else {
            (init + 1, back_jump + 1)
        };

        let length = end
            .checked_sub(start)
            .filter(|len| *len > 0)
            .ok_or(EmitRejection::EmptyExtent)?;
        Ok(ParallelRegion {
            start,
            length,
            slot,
        })
    }
}
