//! Pipeline orchestration
//!
//! ```text
//! Program ─► StaticCallGraph ─► PointsToGraph ─► PurityTable
//!                                                    │
//! per method, per loop (innermost first):            ▼
//!   shape ─► scalar ─► array refs ─► call purity ─► SMT ─► annotation
//! ```
//!
//! Whole-program facts are computed once into an `AnalysisContext`; the
//! `LoopParallelizer` then walks every application method and records one
//! `LoopVerdict` per natural loop.

pub mod context;
pub mod loop_parallelizer;
pub mod report;

pub use context::AnalysisContext;
pub use loop_parallelizer::LoopParallelizer;
pub use report::{AnalysisReport, LoopReport, LoopVerdict, MethodReport, RejectReason, SkippedMethod};
