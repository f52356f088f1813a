//! Loop verdicts for the dependence self-test suite

#[path = "../common/mod.rs"]
mod common;

use common::*;
use looppar_analysis::{LoopVerdict, ParallelRegion, RejectReason};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn dep_test() -> (looppar_analysis::AnalysisContext, looppar_analysis::AnalysisReport) {
    analyze_program(dep_test_program())
}

#[test]
fn test_read_of_previous_element_is_proven_dependence() {
    let (_, report) = dep_test();
    assert_rejected_as(&report, SIMPLE_DEP2, 0, "proven_dependence");
}

#[test]
fn test_constant_write_index_is_rejected() {
    let (_, report) = dep_test();
    let reason = assert_rejected(&report, SIMPLE_DEP1, 0);
    assert!(
        matches!(
            reason,
            RejectReason::ProvenDependence(_) | RejectReason::Inconclusive(_)
        ),
        "{}",
        reason
    );
}

#[test]
fn test_disjoint_cells_are_parallel() {
    let (ctx, report) = dep_test();
    // init at 1, back jump at 8, `i` in slot 1
    let region = assert_parallel(&report, SIMPLE_NO_DEP1, 0);
    assert_eq!(region, ParallelRegion { start: 2, length: 7, slot: 1 });
    assert_parallel(&report, SIMPLE_NO_DEP2, 0);
    assert_eq!(ctx.annotations.regions_of(SIMPLE_NO_DEP1), &[region]);
}

#[test]
fn test_region_from_bytecode_offsets() {
    let (_, report) = dep_test();
    // `istore_1` at 1, `goto` at 16
    let region = assert_parallel(&report, SIMPLE_NO_DEP0, 0);
    assert_eq!(region, ParallelRegion { start: 2, length: 17, slot: 1 });
}

#[test]
fn test_rows_of_distinct_arrays_are_parallel() {
    let (_, report) = dep_test();
    assert_parallel(&report, MULTI_DIM_NO_DEP1, 0);
}

#[test]
fn test_rows_of_same_array_are_dependent() {
    let (_, report) = dep_test();
    let reason = assert_rejected(&report, MULTI_DIM_DEP1, 0);
    let RejectReason::ProvenDependence(witness) = reason else {
        panic!("expected a proven dependence, got {}", reason);
    };
    assert!(witness.starts_with("witness "), "{}", witness);
}

#[test]
fn test_live_out_scalar_is_carried() {
    let (_, report) = dep_test();
    let reason = assert_rejected(&report, STACK_VARIABLE_DEP1, 0);
    assert_eq!(reason.kind(), "scalar_carry");
    assert!(reason.detail().starts_with("k assigned at #"), "{}", reason);
}

#[test]
fn test_hilbert_inner_loop_parallel_outer_rejected() {
    let (_, report) = dep_test();
    let method = report.method(HILBERT).expect("hilbert analyzed");
    assert_eq!(method.loops.len(), 2);

    let inner = &method.loops[0];
    assert_eq!(inner.induction_variable.as_deref(), Some("j"));
    assert_eq!(
        inner.verdict,
        LoopVerdict::Parallel(ParallelRegion { start: 6, length: 12, slot: 4 })
    );

    let outer = &method.loops[1];
    assert_eq!(outer.induction_variable.as_deref(), Some("i"));
    assert!(!outer.verdict.is_parallel());
}

#[test]
fn test_nested_loops() {
    let (_, report) = dep_test();
    let inner = assert_parallel(&report, NESTED_NO_DEP1, 0);
    assert_eq!(inner, ParallelRegion { start: 5, length: 7, slot: 2 });
    assert_rejected(&report, NESTED_NO_DEP1, 1);

    // a[i] is the same cell for every inner iteration
    assert_rejected(&report, NESTED_DEP1, 0);
    assert_rejected(&report, NESTED_DEP1, 1);
}

#[test]
fn test_call_result_as_index_is_unsupported() {
    let (_, report) = dep_test();
    assert_rejected_as(&report, CALL_IN_INDEX, 0, "unsupported_shape");
}

#[test]
fn test_methods_without_loops_are_not_reported() {
    let (_, report) = dep_test();
    assert!(report.method("<DepTest: main([Ljava/lang/String;)V>").is_none());
    assert!(report.method("<DepTest: identity(I)I>").is_none());
    assert!(report.method("<TestCode: gvModify(I)V>").is_none());
    assert!(report.skipped.is_empty());
}

#[test]
fn test_annotation_map_holds_exactly_the_parallel_loops() {
    let (ctx, report) = dep_test();
    let annotated: BTreeSet<&str> = ctx.annotations.iter().map(|(sig, _)| sig).collect();
    let expected: BTreeSet<&str> = [
        SIMPLE_NO_DEP0,
        SIMPLE_NO_DEP1,
        SIMPLE_NO_DEP2,
        PURE_CALL0,
        PURE_CALL1,
        PURE_CALL2,
        MULTI_DIM_NO_DEP1,
        NESTED_NO_DEP1,
        HILBERT,
    ]
    .into_iter()
    .collect();
    assert_eq!(annotated, expected);
    assert_eq!(ctx.annotations.region_count(), report.parallel_count());
    assert_eq!(report.parallel_count() + report.rejected_count(), report.loop_count());
}

#[test]
fn test_text_report_summary() {
    let (_, report) = dep_test();
    let text = report.to_string();
    let summary = text.lines().last().expect("summary line");
    assert_eq!(
        summary,
        format!(
            "{} loops in {} methods: {} parallel, {} rejected",
            report.loop_count(),
            report.methods.len(),
            report.parallel_count(),
            report.rejected_count()
        )
    );
    assert!(text.contains(&format!("{}\n  loop #2 (i): parallel start=2 length=7 slot=1", SIMPLE_NO_DEP1)));
}

#[test]
fn test_json_report_tags_reasons() {
    let (_, report) = dep_test();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let method = json["methods"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["signature"] == STACK_VARIABLE_DEP1)
        .unwrap();
    assert_eq!(method["loops"][0]["verdict"]["rejected"]["reason"], "scalar_carry");
}
