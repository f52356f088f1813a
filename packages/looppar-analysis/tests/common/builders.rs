//! Context and report builders

use looppar_analysis::{
    parse_program, AnalysisConfig, AnalysisContext, AnalysisReport, LoopParallelizer, Program,
};

/// Builtin solver with a 5s timeout. Nothing is written unless a test
/// calls `write_annotations`.
pub fn test_config() -> AnalysisConfig {
    AnalysisConfig::default().with_timeout_ms(5_000)
}

pub fn context(program: Program) -> AnalysisContext {
    AnalysisContext::build(program, test_config()).expect("context builds")
}

/// Runs the whole pipeline once
pub fn analyze_program(program: Program) -> (AnalysisContext, AnalysisReport) {
    let mut ctx = context(program);
    let report = LoopParallelizer::new().run(&mut ctx);
    (ctx, report)
}

pub fn analyze_source(source: &str) -> (AnalysisContext, AnalysisReport) {
    analyze_program(parse_program(source).expect("source parses"))
}
