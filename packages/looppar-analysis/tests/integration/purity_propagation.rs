//! Interprocedural purity and its effect on loop verdicts

#[path = "../common/mod.rs"]
mod common;

use common::*;
use looppar_analysis::features::purity::PurityRecord;
use looppar_analysis::AnalysisContext;
use proptest::prelude::*;

fn record<'c>(ctx: &'c AnalysisContext, signature: &str) -> &'c PurityRecord {
    let id = ctx
        .program
        .method_by_signature(signature)
        .unwrap_or_else(|| panic!("{} not in program", signature));
    ctx.purity
        .purity_of(id)
        .unwrap_or_else(|| panic!("{} not classified", signature))
}

#[test]
fn test_callee_classification() {
    let ctx = context(dep_test_program());

    assert!(record(&ctx, "<TestCode: pureFun(I)I>").is_pure());
    assert!(record(&ctx, "<TestCode: callPureFun(I)I>").is_pure());
    assert!(record(&ctx, "<DepTest: identity(I)I>").is_pure());

    let gv_access = record(&ctx, "<TestCode: gvAccess(I)I>");
    assert!(!gv_access.is_read_pure());
    assert!(gv_access.is_write_pure());

    let gv_modify = record(&ctx, "<TestCode: gvModify(I)V>");
    assert!(gv_modify.is_read_pure());
    assert!(!gv_modify.is_write_pure());

    assert!(!record(&ctx, "<TestCode: arrAccess(I[I)I>").is_read_pure());
    assert!(!record(&ctx, "<TestCode: arrModify(II[I)V>").is_write_pure());

    // reads System.out and calls into an unknown class
    let print = record(&ctx, "<TestCode: printFun(I)V>");
    assert!(!print.is_read_pure() && !print.is_write_pure());

    let wraps_impure = record(&ctx, "<TestCode: callImpureFun(I)I>");
    assert!(!wraps_impure.is_read_pure());
    assert!(wraps_impure.is_write_pure());
}

#[test]
fn test_loops_calling_impure_methods_are_rejected() {
    let (_, report) = analyze_program(dep_test_program());
    for signature in [
        IMPURE_CALL0,
        IMPURE_CALL1,
        IMPURE_CALL2,
        IMPURE_CALL3,
        IMPURE_CALL5,
        IMPURE_CALL9,
    ] {
        assert_rejected_as(&report, signature, 0, "impurity");
    }
}

#[test]
fn test_loops_calling_pure_methods_are_parallel() {
    let (_, report) = analyze_program(dep_test_program());
    for signature in [PURE_CALL0, PURE_CALL1, PURE_CALL2] {
        assert_parallel(&report, signature, 0);
    }
}

#[test]
fn test_recursive_callee_is_impure() {
    let (ctx, report) = analyze_source(
        r#"
class R {
    method static int fact(int) {
        int n, $m, $r, $p
        n := @parameter0: int
        if n <= 1 goto base
        $m = n - 1
        $r = staticinvoke <R: int fact(int)>($m)
        $p = n * $r
        return $p
    base:
        return 1
    }
    method static void run(int[], int) {
        int[] a
        int n, i
        a := @parameter0: int[]
        n := @parameter1: int
        i = 0
    head:
        if i >= n goto done
        staticinvoke <R: int fact(int)>(i)
        a[i] = i
        i = i + 1
        goto head
    done:
        return
    }
}
"#,
    );
    assert!(!record(&ctx, "<R: fact(I)I>").is_pure());
    assert_rejected_as(&report, "<R: run([II)V>", 0, "impurity");
}

/// `run` calls `w{depth-1}`, which reaches a global write through
/// `depth - 1` pure-looking wrappers
fn wrapped_global_write(depth: usize, scale: i64, offset: i64) -> String {
    let mut wrappers = String::new();
    for level in 0..depth {
        let callee = if level == 0 {
            "<W: void writesGlobal(int)>".to_string()
        } else {
            format!("<W: void w{}(int)>", level - 1)
        };
        wrappers.push_str(&format!(
            r#"
    method static void w{level}(int) {{
        int v
        v := @parameter0: int
        staticinvoke {callee}(v)
        return
    }}
"#
        ));
    }

    format!(
        r#"
class W {{
    field static int counter
    method static void writesGlobal(int) {{
        int v
        v := @parameter0: int
        <W: int counter> = v
        return
    }}
{wrappers}
    method static void run(int[], int) {{
        int[] a
        int n, i, $t, $x
        a := @parameter0: int[]
        n := @parameter1: int
        i = 0
    head:
        if i >= n goto done
        $t = {scale} * i
        $x = $t + {offset}
        staticinvoke <W: void w{last}(int)>(i)
        a[$x] = i
        i = i + 1
        goto head
    done:
        return
    }}
}}
"#,
        last = depth - 1
    )
}

#[test]
fn test_injective_index_without_call_is_parallel() {
    let (_, report) = analyze_source(&wrapped_global_write(1, 2, 3).replace(
        "        staticinvoke <W: void w0(int)>(i)\n",
        "",
    ));
    assert_parallel(&report, "<W: run([II)V>", 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_impure_callee_rejects_any_index_shape(
        depth in 1usize..5,
        scale in 1i64..5,
        offset in -4i64..5,
    ) {
        let (_, report) = analyze_source(&wrapped_global_write(depth, scale, offset));
        let reason = assert_rejected(&report, "<W: run([II)V>", 0);
        prop_assert_eq!(reason.kind(), "impurity");
    }
}
