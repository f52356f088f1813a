//! Points-to Analysis Constraints
//!
//! Four constraint types following Andersen's formulation:
//! - ALLOC: x = new T()   → pts(x) ⊇ {site}
//! - COPY:  x = y         → pts(x) ⊇ pts(y)
//! - LOAD:  x = y.f       → ∀o ∈ pts(y): pts(x) ⊇ pts(o.f)
//! - STORE: x.f = y       → ∀o ∈ pts(x): pts(o.f) ⊇ pts(y)
//!
//! Array contents are the pseudo-field `[]` (`ARRAY_CONTENTS`).

use super::abstract_location::LocationId;

/// Constraint variable (interned node index)
pub type VarId = u32;

/// Interned field name
pub type FieldId = u32;

/// Field id of array contents
pub const ARRAY_CONTENTS: FieldId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Alloc,
    Copy,
    Load,
    Store,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Alloc => "ALLOC",
            ConstraintKind::Copy => "COPY",
            ConstraintKind::Load => "LOAD",
            ConstraintKind::Store => "STORE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub kind: ConstraintKind,

    /// Destination; the base variable for STORE
    pub lhs: VarId,

    /// Location for ALLOC, source variable for COPY/STORE, base variable for LOAD
    pub rhs: u32,

    pub field: Option<FieldId>,
}

impl Constraint {
    #[inline]
    pub fn alloc(lhs: VarId, location: LocationId) -> Self {
        Self {
            kind: ConstraintKind::Alloc,
            lhs,
            rhs: location,
            field: None,
        }
    }

    #[inline]
    pub fn copy(lhs: VarId, rhs: VarId) -> Self {
        Self {
            kind: ConstraintKind::Copy,
            lhs,
            rhs,
            field: None,
        }
    }

    /// `lhs = base.field`
    #[inline]
    pub fn load(lhs: VarId, base: VarId, field: FieldId) -> Self {
        Self {
            kind: ConstraintKind::Load,
            lhs,
            rhs: base,
            field: Some(field),
        }
    }

    /// `base.field = rhs`
    #[inline]
    pub fn store(base: VarId, field: FieldId, rhs: VarId) -> Self {
        Self {
            kind: ConstraintKind::Store,
            lhs: base,
            rhs,
            field: Some(field),
        }
    }
}

/// Constraint collection with per-kind counters
#[derive(Debug, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    pub alloc_count: usize,
    pub copy_count: usize,
    pub load_count: usize,
    pub store_count: usize,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, constraint: Constraint) {
        match constraint.kind {
            ConstraintKind::Alloc => self.alloc_count += 1,
            ConstraintKind::Copy => self.copy_count += 1,
            ConstraintKind::Load => self.load_count += 1,
            ConstraintKind::Store => self.store_count += 1,
        }
        self.constraints.push(constraint);
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }
}
