//! Path queries over a method's statement graph

use crate::shared::models::{NaturalLoop, StmtId};
use crate::shared::ports::MethodFlow;
use rustc_hash::FxHashSet;

/// Whether `to` is reachable from `from` without passing through `avoid`
///
/// `from == to` is always reachable. Reaching `avoid` ends that path unless
/// `avoid` is `to` itself.
pub fn path_avoiding(flow: &dyn MethodFlow, from: StmtId, to: StmtId, avoid: StmtId) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = vec![from];
    visited.insert(from);

    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if node == avoid {
            continue;
        }
        for &succ in flow.successors(node) {
            if visited.insert(succ) {
                stack.push(succ);
            }
        }
    }
    false
}

/// Whether the value defined at `def` may reach `use_stmt` from an earlier
/// iteration of `lp`.
///
/// Holds when `use_stmt` is `def` itself, or when `def` reaches the loop's
/// update without re-executing `use_stmt` while the header reaches
/// `use_stmt` without re-executing `def`.
pub fn crosses_iterations(
    flow: &dyn MethodFlow,
    lp: &NaturalLoop,
    update: StmtId,
    use_stmt: StmtId,
    def: StmtId,
) -> bool {
    use_stmt == def
        || (path_avoiding(flow, def, update, use_stmt)
            && path_avoiding(flow, lp.header, use_stmt, def))
}

/// Statements of loops strictly nested inside `outer`
pub fn nested_loop_statements(loops: &[NaturalLoop], outer: &NaturalLoop) -> FxHashSet<StmtId> {
    loops
        .iter()
        .filter(|inner| inner.header != outer.header && outer.contains(inner.header))
        .flat_map(|inner| inner.statements.iter().copied())
        .collect()
}
