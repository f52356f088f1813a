//! Per-loop verdicts of one run

use crate::errors::Result;
use crate::features::annotation::ParallelRegion;
use crate::shared::models::StmtId;
use serde::Serialize;
use std::fmt;

/// Why a loop was left sequential
///
/// Every variant is handled the same way: the loop gets no annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    /// Loop shape, array access or index arithmetic not understood
    UnsupportedShape(String),
    /// A call in the loop may read or write state outside the callee
    Impurity(String),
    /// A scalar value flows between iterations or out of the loop
    ScalarCarry(String),
    /// The solver found two iterations touching the same element
    ProvenDependence(String),
    /// Solver timeout or resource limit
    Inconclusive(String),
}

impl RejectReason {
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::UnsupportedShape(_) => "unsupported_shape",
            RejectReason::Impurity(_) => "impurity",
            RejectReason::ScalarCarry(_) => "scalar_carry",
            RejectReason::ProvenDependence(_) => "proven_dependence",
            RejectReason::Inconclusive(_) => "inconclusive",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            RejectReason::UnsupportedShape(d)
            | RejectReason::Impurity(d)
            | RejectReason::ScalarCarry(d)
            | RejectReason::ProvenDependence(d)
            | RejectReason::Inconclusive(d) => d,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.detail())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopVerdict {
    Parallel(ParallelRegion),
    Rejected(RejectReason),
}

impl LoopVerdict {
    pub fn is_parallel(&self) -> bool {
        matches!(self, LoopVerdict::Parallel(_))
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            LoopVerdict::Parallel(_) => None,
            LoopVerdict::Rejected(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopReport {
    pub header: StmtId,
    /// Name of the induction variable, once recognized
    pub induction_variable: Option<String>,
    pub verdict: LoopVerdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodReport {
    pub signature: String,
    /// Innermost loops first
    pub loops: Vec<LoopReport>,
}

/// Method the flow toolkit refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMethod {
    pub signature: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Analyzed methods with at least one loop, in declaration order
    pub methods: Vec<MethodReport>,
    pub skipped: Vec<SkippedMethod>,
}

impl AnalysisReport {
    pub fn method(&self, signature: &str) -> Option<&MethodReport> {
        self.methods.iter().find(|m| m.signature == signature)
    }

    /// Verdicts of a method's loops, innermost first
    pub fn verdicts_of(&self, signature: &str) -> Vec<&LoopVerdict> {
        self.method(signature)
            .map(|m| m.loops.iter().map(|l| &l.verdict).collect())
            .unwrap_or_default()
    }

    pub fn loop_count(&self) -> usize {
        self.methods.iter().map(|m| m.loops.len()).sum()
    }

    pub fn parallel_count(&self) -> usize {
        self.loops().filter(|l| l.verdict.is_parallel()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.loop_count() - self.parallel_count()
    }

    fn loops(&self) -> impl Iterator<Item = &LoopReport> {
        self.methods.iter().flat_map(|m| m.loops.iter())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for method in &self.methods {
            writeln!(f, "{}", method.signature)?;
            for lp in &method.loops {
                let iv = lp.induction_variable.as_deref().unwrap_or("?");
                match &lp.verdict {
                    LoopVerdict::Parallel(r) => writeln!(
                        f,
                        "  loop {} ({}): parallel start={} length={} slot={}",
                        lp.header, iv, r.start, r.length, r.slot
                    )?,
                    LoopVerdict::Rejected(reason) => {
                        writeln!(f, "  loop {} ({}): rejected {}", lp.header, iv, reason)?
                    }
                }
            }
        }
        for skipped in &self.skipped {
            writeln!(f, "skipped {}: {}", skipped.signature, skipped.reason)?;
        }
        write!(
            f,
            "{} loops in {} methods: {} parallel, {} rejected",
            self.loop_count(),
            self.methods.len(),
            self.parallel_count(),
            self.rejected_count()
        )
    }
}
