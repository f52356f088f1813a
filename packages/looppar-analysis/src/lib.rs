/*
 * Looppar Analysis - Interprocedural Loop-Parallelism Legality
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Subject-program IR + ports for external collaborators
 * - features/    : Vertical slices (parsing → flow → call graph → points-to
 *                  → purity → loop shape → scalar → array refs → smt → annotation)
 * - pipeline/    : Orchestration (AnalysisContext threaded through every stage)
 * - config/      : YAML configuration with validation
 *
 * A loop is annotated parallel only when every stage proves it safe;
 * any failure, timeout or unsupported shape rejects it.
 */

#![allow(clippy::too_many_arguments)] // Encoder helpers thread the whole loop context
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

/// Subject-program model and external-collaborator ports
pub mod shared;

/// Feature modules (analysis stages)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::AnalysisConfig;
pub use errors::{LoopParError, Result};
pub use features::annotation::{AnnotationMap, ParallelRegion};
pub use features::parsing::parse_program;
pub use pipeline::{AnalysisContext, AnalysisReport, LoopParallelizer, LoopVerdict, RejectReason};
pub use shared::models::Program;
