//! Per-loop legality pipeline
//!
//! Stages run in a fixed order and the first rejection wins:
//! shape, scalar, array refs, call purity, SMT, annotation extent.

use crate::features::annotation::{AnnotationEmitter, ParallelRegion};
use crate::features::array_refs::ArrayRefCollector;
use crate::features::loop_shape::{InductionVariable, LoopShapeRecognizer};
use crate::features::scalar_dependence::ScalarDependenceChecker;
use crate::features::smt::{DependenceEncoder, SolverResult};
use crate::pipeline::context::AnalysisContext;
use crate::pipeline::report::{
    AnalysisReport, LoopReport, LoopVerdict, MethodReport, RejectReason, SkippedMethod,
};
use crate::shared::models::{LocalId, Method, NaturalLoop, StmtId};
use crate::shared::ports::{CalleeKind, MethodFlow, VarKey};
use rustc_hash::FxHashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A loop that passed the shape and scalar checks
#[derive(Debug, Clone)]
struct CountedLoop {
    header: StmtId,
    iv: InductionVariable,
}

/// Induction variables of counted loops strictly inside `lp` whose
/// initializer also runs in every iteration of `lp`
fn nested_induction_variables(
    lp: &NaturalLoop,
    iv: &InductionVariable,
    counted: &[CountedLoop],
) -> FxHashSet<LocalId> {
    counted
        .iter()
        .filter(|inner| {
            inner.header != lp.header
                && lp.contains(inner.header)
                && lp.contains(inner.iv.init)
                && inner.iv.local != iv.local
        })
        .map(|inner| inner.iv.local)
        .collect()
}

#[derive(Debug, Default)]
pub struct LoopParallelizer {
    shape: LoopShapeRecognizer,
    scalar: ScalarDependenceChecker,
    collector: ArrayRefCollector,
    emitter: AnnotationEmitter,
}

impl LoopParallelizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes every candidate method in declaration order and records the
    /// parallel loops in `ctx.annotations`
    pub fn run(&self, ctx: &mut AnalysisContext) -> AnalysisReport {
        let started = Instant::now();
        let mut report = AnalysisReport::default();

        for index in 0..ctx.program.methods.len() {
            let method = &ctx.program.methods[index];
            if !self.is_candidate(ctx, method) {
                continue;
            }

            let flow = match ctx.flow_toolkit.analyze(method) {
                Ok(flow) => flow,
                Err(err) => {
                    warn!(method = %method.signature(), error = %err, "method skipped");
                    report.skipped.push(SkippedMethod {
                        signature: method.signature(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let method_report = self.analyze_method(ctx, method, flow.as_ref());
            if method_report.loops.is_empty() {
                continue;
            }
            for lp in &method_report.loops {
                if let LoopVerdict::Parallel(region) = lp.verdict {
                    ctx.annotations
                        .add_annotation(method_report.signature.clone(), region);
                }
            }
            report.methods.push(method_report);
        }

        info!(
            methods = report.methods.len(),
            loops = report.loop_count(),
            parallel = report.parallel_count(),
            skipped = report.skipped.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loop analysis complete"
        );
        report
    }

    /// Application methods only: no library classes (unless configured),
    /// constructors, static initializers, native or abstract methods
    fn is_candidate(&self, ctx: &AnalysisContext, method: &Method) -> bool {
        if method.is_native || method.is_abstract {
            return false;
        }
        if ctx.config.skip_library_classes && ctx.program.is_library_method(method.id) {
            return false;
        }
        !matches!(
            ctx.call_graph.classify(method.id),
            CalleeKind::Constructor | CalleeKind::StaticInitializer
        )
    }

    /// Loops innermost first (smaller before larger, then by position), so
    /// an outer loop sees the induction variables of its accepted inner loops
    pub fn analyze_method(
        &self,
        ctx: &AnalysisContext,
        method: &Method,
        flow: &dyn MethodFlow,
    ) -> MethodReport {
        let mut loops: Vec<&NaturalLoop> = flow.natural_loops().iter().collect();
        loops.sort_by_key(|lp| (lp.len(), lp.first_position()));

        let mut counted: Vec<CountedLoop> = Vec::new();
        let reports: Vec<LoopReport> = loops
            .into_iter()
            .map(|lp| self.analyze_loop(ctx, method, flow, lp, &mut counted))
            .collect();

        let parallel = reports.iter().filter(|r| r.verdict.is_parallel()).count();
        info!(
            method = %method.signature(),
            loops = reports.len(),
            parallel,
            "method analyzed"
        );
        MethodReport {
            signature: method.signature(),
            loops: reports,
        }
    }

    fn analyze_loop(
        &self,
        ctx: &AnalysisContext,
        method: &Method,
        flow: &dyn MethodFlow,
        lp: &NaturalLoop,
        counted: &mut Vec<CountedLoop>,
    ) -> LoopReport {
        let mut induction_variable = None;
        let verdict = match self.check_loop(ctx, method, flow, lp, counted, &mut induction_variable) {
            Ok(region) => {
                debug!(method = %method.signature(), header = %lp.header, ?region, "loop is parallel");
                LoopVerdict::Parallel(region)
            }
            Err(reason) => {
                debug!(method = %method.signature(), header = %lp.header, %reason, "loop rejected");
                LoopVerdict::Rejected(reason)
            }
        };
        LoopReport {
            header: lp.header,
            induction_variable,
            verdict,
        }
    }

    fn check_loop(
        &self,
        ctx: &AnalysisContext,
        method: &Method,
        flow: &dyn MethodFlow,
        lp: &NaturalLoop,
        counted: &mut Vec<CountedLoop>,
        induction_variable: &mut Option<String>,
    ) -> Result<ParallelRegion, RejectReason> {
        let iv = self
            .shape
            .recognize(method, flow, lp)
            .map_err(|e| RejectReason::UnsupportedShape(e.to_string()))?;
        *induction_variable = Some(method.local(iv.local).name.clone());

        let nested_ivs = nested_induction_variables(lp, &iv, counted);
        let loop_locals = self
            .scalar
            .check(method, flow, lp, &iv, &nested_ivs)
            .map_err(|e| RejectReason::ScalarCarry(e.to_string()))?;
        counted.push(CountedLoop {
            header: lp.header,
            iv: iv.clone(),
        });

        let accesses = self
            .collector
            .collect(method, lp)
            .map_err(|e| RejectReason::UnsupportedShape(e.to_string()))?;

        for &stmt in &lp.statements {
            let Some(call) = method.stmt(stmt).invoke() else {
                continue;
            };
            if !ctx.purity.call_is_pure(ctx.call_graph.as_ref(), method.id, stmt) {
                return Err(RejectReason::Impurity(format!(
                    "call to {} at {} is not pure",
                    call.method, stmt
                )));
            }
        }

        let query = DependenceEncoder::new(method, flow, lp, &iv, &loop_locals)
            .encode(&accesses, |a, b| {
                ctx.points_to
                    .may_alias(VarKey::new(method.id, a), VarKey::new(method.id, b))
            })
            .map_err(|e| RejectReason::UnsupportedShape(e.to_string()))?;
        debug!(
            method = %method.signature(),
            header = %lp.header,
            pairs = query.pairs,
            size = query.formula.size(),
            "dependence query"
        );

        match ctx.solver.check(&query.formula) {
            SolverResult::Unsat => {}
            SolverResult::Sat(model) => {
                let witness: Vec<String> = model
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect();
                return Err(RejectReason::ProvenDependence(format!(
                    "witness {}",
                    witness.join(" ")
                )));
            }
            SolverResult::Unknown => {
                warn!(
                    method = %method.signature(),
                    header = %lp.header,
                    solver = ctx.solver.name(),
                    "solver gave no answer"
                );
                return Err(RejectReason::Inconclusive(format!(
                    "{} solver returned unknown",
                    ctx.solver.name()
                )));
            }
        }

        self.emitter
            .region(method, flow, lp, &iv)
            .map_err(|e| RejectReason::UnsupportedShape(e.to_string()))
    }
}
