//! Verdict assertions with readable failure messages

use looppar_analysis::{AnalysisReport, LoopVerdict, ParallelRegion, RejectReason};

fn verdicts<'r>(report: &'r AnalysisReport, signature: &str) -> Vec<&'r LoopVerdict> {
    let verdicts = report.verdicts_of(signature);
    assert!(
        !verdicts.is_empty(),
        "{} has no analyzed loops in report:\n{}",
        signature,
        report
    );
    verdicts
}

/// Verdict of the `index`-th loop of `signature`, innermost first
pub fn verdict<'r>(report: &'r AnalysisReport, signature: &str, index: usize) -> &'r LoopVerdict {
    let all = verdicts(report, signature);
    assert!(index < all.len(), "{} has only {} loops", signature, all.len());
    all[index]
}

pub fn assert_parallel(report: &AnalysisReport, signature: &str, index: usize) -> ParallelRegion {
    match verdict(report, signature, index) {
        LoopVerdict::Parallel(region) => *region,
        LoopVerdict::Rejected(reason) => {
            panic!("loop {} of {} rejected: {}", index, signature, reason)
        }
    }
}

pub fn assert_rejected(report: &AnalysisReport, signature: &str, index: usize) -> RejectReason {
    match verdict(report, signature, index) {
        LoopVerdict::Rejected(reason) => reason.clone(),
        LoopVerdict::Parallel(region) => {
            panic!("loop {} of {} accepted as {:?}", index, signature, region)
        }
    }
}

/// Rejected with the given `RejectReason::kind()`
pub fn assert_rejected_as(report: &AnalysisReport, signature: &str, index: usize, kind: &str) {
    let reason = assert_rejected(report, signature, index);
    assert_eq!(reason.kind(), kind, "{} loop {}: {}", signature, index, reason);
}
