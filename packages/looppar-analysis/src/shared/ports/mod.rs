//! Ports for the external collaborators of the loop analysis
//!
//! The stages never depend on a concrete flow toolkit, call graph or
//! points-to solver; they see these traits only.
//!
//! - `MethodFlow`: CFG, natural loops, reaching definitions, liveness
//! - `CallGraph`: resolved callees and entry points
//! - `PointsToOracle`: may-alias queries on reference locals

use crate::errors::Result;
use crate::shared::models::{LocalId, Method, MethodId, NaturalLoop, StmtId};

// ============================================================================
// Flow toolkit
// ============================================================================

/// Per-method flow facts
pub trait MethodFlow {
    fn successors(&self, stmt: StmtId) -> &[StmtId];

    fn predecessors(&self, stmt: StmtId) -> &[StmtId];

    /// Natural loops of the method, one per header
    fn natural_loops(&self) -> &[NaturalLoop];

    /// Definitions of `local` reaching the program point just before `stmt`
    fn defs_of_at(&self, local: LocalId, stmt: StmtId) -> Vec<StmtId>;

    /// Locals live just before `stmt`
    fn live_before(&self, stmt: StmtId) -> Vec<LocalId>;

    /// Position of `stmt` in the linear instruction stream
    fn instruction_offset(&self, stmt: StmtId) -> u32;

    /// Whether `instruction_offset` reports real bytecode offsets
    fn has_bytecode_offsets(&self) -> bool;
}

/// Builds `MethodFlow` facts for a method
pub trait FlowToolkit {
    /// Fails with `LoopParError::MalformedMethod` when the method has no body
    fn analyze(&self, method: &Method) -> Result<Box<dyn MethodFlow>>;
}

// ============================================================================
// Call graph
// ============================================================================

/// How a resolved callee is treated by the purity oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalleeKind {
    Application,
    /// Library class, native or abstract method
    Library,
    Constructor,
    StaticInitializer,
}

impl CalleeKind {
    /// Only application methods are ever classified
    pub fn is_analyzable(self) -> bool {
        self == CalleeKind::Application
    }
}

pub trait CallGraph {
    /// Resolved targets of the call performed by `stmt` in `caller`
    fn callees_of(&self, caller: MethodId, stmt: StmtId) -> &[MethodId];

    /// Call sites targeting `callee`
    fn callers_of(&self, callee: MethodId) -> &[(MethodId, StmtId)];

    fn entry_points(&self) -> &[MethodId];

    fn classify(&self, callee: MethodId) -> CalleeKind;
}

// ============================================================================
// Points-to oracle
// ============================================================================

/// A local of a particular method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarKey {
    pub method: MethodId,
    pub local: LocalId,
}

impl VarKey {
    pub fn new(method: MethodId, local: LocalId) -> Self {
        Self { method, local }
    }
}

pub trait PointsToOracle {
    /// Whether the two variables may refer to overlapping memory
    fn may_alias(&self, a: VarKey, b: VarKey) -> bool;
}
