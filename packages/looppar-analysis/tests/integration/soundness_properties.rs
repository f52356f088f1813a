//! Accepted loops must not depend on iteration order, and repeated runs
//! must agree byte for byte

#[path = "../common/mod.rs"]
mod common;

use common::*;
use looppar_analysis::features::flow_graph::StatementFlowToolkit;
use looppar_analysis::shared::ports::FlowToolkit;
use looppar_analysis::LoopParallelizer;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// How the stored value picks up the scalar `t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    Absent,
    /// `t = i` before the read
    Fresh,
    /// `t = i` after the store, read by the next iteration
    Carried,
}

#[derive(Debug, Clone, Copy)]
struct AffineLoop {
    lower: i64,
    write_scale: i64,
    write_offset: i64,
    read_scale: i64,
    read_offset: i64,
    scalar: Scalar,
}

impl AffineLoop {
    fn new(lower: i64, write_scale: i64, write_offset: i64, read_scale: i64, read_offset: i64) -> Self {
        Self {
            lower,
            write_scale,
            write_offset,
            read_scale,
            read_offset,
            scalar: Scalar::Absent,
        }
    }

    fn with_scalar(self, scalar: Scalar) -> Self {
        Self { scalar, ..self }
    }

    fn source(&self) -> String {
        match self.scalar {
            Scalar::Absent => affine_loop(
                self.lower,
                self.write_scale,
                self.write_offset,
                self.read_scale,
                self.read_offset,
            ),
            Scalar::Fresh | Scalar::Carried => affine_loop_with_scalar(
                self.lower,
                self.write_scale,
                self.write_offset,
                self.read_scale,
                self.read_offset,
                self.scalar == Scalar::Carried,
            ),
        }
    }

    /// Runs `a[ws*i + wo] = a[rs*i + ro] + t + 1` for the given iteration order
    fn execute(&self, order: impl Iterator<Item = i64>) -> BTreeMap<i64, i64> {
        let mut memory: BTreeMap<i64, i64> = BTreeMap::new();
        let mut t = 0;
        for i in order {
            if self.scalar == Scalar::Fresh {
                t = i;
            }
            let read = self.read_scale * i + self.read_offset;
            let value = memory.get(&read).copied().unwrap_or(read * 7 + 1);
            memory.insert(self.write_scale * i + self.write_offset, value + t + 1);
            if self.scalar == Scalar::Carried {
                t = i;
            }
        }
        memory
    }
}

fn affine_loops() -> impl Strategy<Value = AffineLoop> {
    (
        0i64..3,
        -3i64..4,
        -4i64..5,
        -3i64..4,
        -4i64..5,
        prop_oneof![Just(Scalar::Absent), Just(Scalar::Fresh), Just(Scalar::Carried)],
    )
        .prop_map(|(lower, ws, wo, rs, ro, scalar)| {
            AffineLoop::new(lower, ws, wo, rs, ro).with_scalar(scalar)
        })
}

/// `a[j] = (i += j)` after a loop that leaves `i == n`
fn execute_sibling_scan(n: i64, order: impl Iterator<Item = i64>) -> BTreeMap<i64, i64> {
    let mut memory: BTreeMap<i64, i64> = (0..n).map(|k| (k, 0)).collect();
    let mut i = n;
    for j in order {
        i += j;
        memory.insert(j, i);
    }
    memory
}

fn is_accepted(lp: &AffineLoop) -> bool {
    let (_, report) = analyze_source(&lp.source());
    verdict(&report, AFFINE_RUN, 0).is_parallel()
}

#[test]
fn test_reads_of_other_iterations_are_rejected() {
    // a[i] = a[i - 1] + 1
    let shifted = AffineLoop::new(1, 1, 0, 1, -1);
    assert!(!is_accepted(&shifted));

    // a[i + 1] = a[i] + 1
    let forward = AffineLoop::new(0, 1, 1, 1, 0);
    assert!(!is_accepted(&forward));

    // a[2i] = a[i] + 1: iteration 2k reads what iteration k wrote
    let halving = AffineLoop::new(0, 2, 0, 1, 0);
    assert!(!is_accepted(&halving));
}

#[test]
fn test_same_cell_read_and_write_is_accepted() {
    // a[i] = a[i] + 1
    let in_place = AffineLoop::new(0, 1, 0, 1, 0);
    assert!(is_accepted(&in_place));

    // a[2i] = a[2i + 1] + 1: even cells written, odd cells read
    let parity = AffineLoop::new(0, 2, 0, 2, 1);
    assert!(is_accepted(&parity));
}

#[test]
fn test_scalar_read_before_reassignment_is_rejected() {
    let in_place = AffineLoop::new(0, 1, 0, 1, 0);
    assert!(is_accepted(&in_place.with_scalar(Scalar::Fresh)));

    let carried = in_place.with_scalar(Scalar::Carried);
    assert_ne!(carried.execute(0..6), carried.execute((0..6).rev()));
    let (_, report) = analyze_source(&carried.source());
    let reason = assert_rejected(&report, AFFINE_RUN, 0);
    assert_eq!(reason.kind(), "scalar_carry");
    // `$s0 = $v + t` is the first statement fed by the previous iteration
    assert!(reason.detail().starts_with("$s0 assigned at #"), "{}", reason);
}

#[test]
fn test_sibling_loop_induction_variable_is_still_checked() {
    assert_ne!(execute_sibling_scan(5, 0..5), execute_sibling_scan(5, (0..5).rev()));

    let (_, report) = analyze_source(SIBLING_ACCUMULATOR);
    let method = report.method(SIBLINGS_RUN).expect("siblings analyzed");
    assert_eq!(method.loops.len(), 2);
    assert_eq!(method.loops[0].induction_variable.as_deref(), Some("i"));
    assert!(method.loops[0].verdict.is_parallel());

    assert_eq!(method.loops[1].induction_variable.as_deref(), Some("j"));
    let reason = method.loops[1].verdict.reason().expect("scan rejected");
    assert_eq!(reason.kind(), "scalar_carry");
    assert!(reason.detail().starts_with("i assigned at #"), "{}", reason);
}

#[test]
fn test_repeated_runs_emit_identical_annotation_maps() {
    let (first, _) = analyze_program(dep_test_program());
    let (second, _) = analyze_program(dep_test_program());
    assert!(!first.annotations.is_empty());
    assert_eq!(first.annotations.to_json().unwrap(), second.annotations.to_json().unwrap());
}

#[test]
fn test_reanalyzing_a_method_is_idempotent() {
    let ctx = context(dep_test_program());
    let id = ctx.program.method_by_signature(HILBERT).unwrap();
    let method = ctx.program.method(id);
    let toolkit = StatementFlowToolkit::new();
    let parallelizer = LoopParallelizer::new();

    let flow = toolkit.analyze(method).unwrap();
    let first = parallelizer.analyze_method(&ctx, method, flow.as_ref());
    let flow = toolkit.analyze(method).unwrap();
    let second = parallelizer.analyze_method(&ctx, method, flow.as_ref());
    assert_eq!(first, second);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_accepted_loops_are_order_independent(
        lp in affine_loops(),
        count in 1i64..12,
    ) {
        if !is_accepted(&lp) {
            return Ok(());
        }
        let upper = lp.lower + count;
        let sequential = lp.execute(lp.lower..upper);
        let reversed = lp.execute((lp.lower..upper).rev());
        prop_assert_eq!(sequential, reversed, "accepted {:?}", lp);
    }

    #[test]
    fn prop_verdict_is_deterministic(lp in affine_loops()) {
        let (first_ctx, first) = analyze_source(&lp.source());
        let (second_ctx, second) = analyze_source(&lp.source());
        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        prop_assert_eq!(
            first_ctx.annotations.to_json().unwrap(),
            second_ctx.annotations.to_json().unwrap()
        );
    }
}
