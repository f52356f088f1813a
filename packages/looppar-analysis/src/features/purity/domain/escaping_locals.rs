//! Locals whose referents are visible to the caller

use crate::shared::models::{IdentitySource, Immediate, LocalId, Method, Place, Rvalue, Stmt};
use crate::shared::ports::{PointsToOracle, VarKey};
use rustc_hash::FxHashSet;

/// Fixed point seeded with reference parameters and `@this`, grown by copies,
/// casts, reference loads from escaping bases and may-alias with escaping locals.
#[derive(Debug, Clone, Default)]
pub struct EscapingLocals {
    locals: FxHashSet<LocalId>,
}

impl EscapingLocals {
    pub fn compute(method: &Method, oracle: &dyn PointsToOracle) -> Self {
        let mut locals = FxHashSet::default();
        for stmt in &method.body {
            if let Stmt::Identity { local, source } = stmt {
                let escapes = match source {
                    IdentitySource::This => true,
                    IdentitySource::Parameter(n) => method
                        .params
                        .get(*n as usize)
                        .map_or(true, |ty| ty.is_reference()),
                    IdentitySource::CaughtException => false,
                };
                if escapes {
                    locals.insert(*local);
                }
            }
        }

        let is_reference = |l: LocalId| method.local(l).ty.is_reference();
        loop {
            let mut changed = false;

            for stmt in &method.body {
                let Stmt::Assign {
                    place: Place::Local(l),
                    value,
                } = stmt
                else {
                    continue;
                };
                if locals.contains(l) {
                    continue;
                }
                let grows = match value {
                    Rvalue::Use(Immediate::Local(r))
                    | Rvalue::Cast {
                        value: Immediate::Local(r),
                        ..
                    } => locals.contains(r),
                    Rvalue::InstanceField { base, .. } => locals.contains(base) && is_reference(*l),
                    Rvalue::ArrayRead {
                        base: Immediate::Local(b),
                        ..
                    } => locals.contains(b) && is_reference(*l),
                    _ => false,
                };
                if grows {
                    locals.insert(*l);
                    changed = true;
                }
            }

            for l in method.local_ids() {
                if locals.contains(&l) || !is_reference(l) {
                    continue;
                }
                let key = VarKey::new(method.id, l);
                if locals
                    .iter()
                    .any(|&e| oracle.may_alias(key, VarKey::new(method.id, e)))
                {
                    locals.insert(l);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        Self { locals }
    }

    pub fn contains(&self, local: LocalId) -> bool {
        self.locals.contains(&local)
    }

    pub fn contains_imm(&self, imm: &Immediate) -> bool {
        imm.as_local().map_or(false, |l| self.contains(l))
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}
