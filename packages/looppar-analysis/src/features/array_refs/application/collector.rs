//! Collects array element reads and writes of a loop

use crate::features::array_refs::domain::{ArrayAccessMaps, ArrayRef, ArrayRefRejection};
use crate::shared::models::{AccessKind, Immediate, Method, NaturalLoop, Place, Rvalue, Stmt, StmtId};

#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayRefCollector;

impl ArrayRefCollector {
    pub fn new() -> Self {
        Self
    }

    /// Accesses in nested loops are collected with the rest. A constant
    /// index rejects the loop.
    pub fn collect(
        &self,
        method: &Method,
        lp: &NaturalLoop,
    ) -> Result<ArrayAccessMaps, ArrayRefRejection> {
        let mut statements = lp.statements.clone();
        statements.sort();

        let mut maps = ArrayAccessMaps::default();
        for stmt in statements {
            let Stmt::Assign { place, value } = method.stmt(stmt) else {
                continue;
            };
            if let Place::ArrayElem { base, index } = place {
                maps.record(access(stmt, base, index, AccessKind::Write)?);
            }
            if let Rvalue::ArrayRead { base, index } = value {
                maps.record(access(stmt, base, index, AccessKind::Read)?);
            }
        }
        Ok(maps)
    }
}

fn access(
    stmt: StmtId,
    base: &Immediate,
    index: &Immediate,
    kind: AccessKind,
) -> Result<ArrayRef, ArrayRefRejection> {
    let base = base
        .as_local()
        .ok_or(ArrayRefRejection::NonLocalBase(stmt))?;
    let index = index
        .as_local()
        .ok_or(ArrayRefRejection::NonLocalIndex(stmt))?;
    Ok(ArrayRef {
        base,
        index,
        stmt,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_graph::StatementFlowToolkit;
    use crate::features::parsing::parse_program;
    use crate::shared::models::LocalId;
    use crate::shared::ports::FlowToolkit;

    fn collect(src: &str) -> Result<ArrayAccessMaps, ArrayRefRejection> {
        let program = parse_program(src).unwrap();
        let method = &program.methods[0];
        let flow = StatementFlowToolkit::new().analyze(method).unwrap();
        let lp = flow.natural_loops()[0].clone();
        ArrayRefCollector::new().collect(method, &lp)
    }

    #[test]
    fn test_groups_by_base() {
        let maps = collect(
            r#"
class C {
    method static void f(int[], int[], int) {
        int[] a, b
        int n, i, $v, $j
        a := @parameter0: int[]
        b := @parameter1: int[]
        n := @parameter2: int
        i = 0
    head:
        if i >= n goto done
        $v = b[i]
        $j = i + 1
        a[$j] = $v
        a[i] = 0
        i = i + 1
        goto head
    done:
        return
    }
}
"#,
        )
        .unwrap();

        assert_eq!(maps.write_count(), 2);
        assert_eq!(maps.read_count(), 1);
        let writes = &maps.writes[&LocalId(0)];
        assert_eq!(writes[0].stmt, StmtId(7));
        assert_eq!(writes[0].index, LocalId(5));
        assert_eq!(writes[1].stmt, StmtId(8));
        assert_eq!(writes[1].index, LocalId(3));
        assert_eq!(maps.reads[&LocalId(1)][0].kind, AccessKind::Read);
    }

    #[test]
    fn test_constant_index_rejected() {
        let err = collect(
            r#"
class C {
    method static void f(int[], int) {
        int[] a
        int n, i
        a := @parameter0: int[]
        n := @parameter1: int
        i = 0
    head:
        if i >= n goto done
        a[0] = i
        i = i + 1
        goto head
    done:
        return
    }
}
"#,
        )
        .unwrap_err();
        assert_eq!(err, ArrayRefRejection::NonLocalIndex(StmtId(4)));
    }

    #[test]
    fn test_loop_without_arrays() {
        let maps = collect(
            r#"
class C {
    method static void f(int) {
        int n, i
        n := @parameter0: int
        i = 0
    head:
        if i >= n goto done
        i = i + 1
        goto head
    done:
        return
    }
}
"#,
        )
        .unwrap();
        assert!(!maps.has_writes());
        assert_eq!(maps.read_count(), 0);
    }
}
