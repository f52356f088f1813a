//! Whole-program state threaded through every stage

use crate::config::AnalysisConfig;
use crate::errors::Result;
use crate::features::annotation::AnnotationMap;
use crate::features::call_graph::StaticCallGraph;
use crate::features::flow_graph::StatementFlowToolkit;
use crate::features::points_to::PointsToAnalyzer;
use crate::features::purity::{PurityAnalysis, PurityTable};
use crate::features::smt::{create_solver, SmtSolver};
use crate::shared::models::Program;
use crate::shared::ports::{CallGraph, FlowToolkit, PointsToOracle};
use std::time::Instant;
use tracing::info;

pub struct AnalysisContext {
    pub program: Program,
    pub config: AnalysisConfig,
    pub call_graph: Box<dyn CallGraph>,
    pub points_to: Box<dyn PointsToOracle>,
    pub purity: PurityTable,
    pub flow_toolkit: Box<dyn FlowToolkit>,
    pub solver: Box<dyn SmtSolver>,
    /// Filled by the loop parallelizer, one entry per method with a parallel loop
    pub annotations: AnnotationMap,
}

impl AnalysisContext {
    /// Validates `config`, then builds the call graph, the points-to graph
    /// and the purity table of `program`
    pub fn build(program: Program, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let started = Instant::now();

        let call_graph = StaticCallGraph::build(&program, &config.entry_points)?;
        let points_to = PointsToAnalyzer::new(&program, &call_graph).analyze();
        let purity = PurityAnalysis::run(&program, &call_graph, &points_to);
        let solver = create_solver(&config.solver)?;

        info!(
            methods = program.methods.len(),
            call_sites = call_graph.call_site_count(),
            classified = purity.len(),
            solver = solver.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "whole-program facts ready"
        );

        Ok(Self {
            program,
            config,
            call_graph: Box::new(call_graph),
            points_to: Box::new(points_to),
            purity,
            flow_toolkit: Box::new(StatementFlowToolkit::new()),
            solver,
            annotations: AnnotationMap::new(),
        })
    }

    pub fn with_solver(mut self, solver: Box<dyn SmtSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_flow_toolkit(mut self, toolkit: Box<dyn FlowToolkit>) -> Self {
        self.flow_toolkit = toolkit;
        self
    }

    /// Writes the annotation map to the configured output path
    pub fn write_annotations(&self) -> Result<()> {
        self.annotations.write_to(&self.config.output)?;
        info!(
            path = %self.config.output.display(),
            methods = self.annotations.method_count(),
            regions = self.annotations.region_count(),
            "annotation map written"
        );
        Ok(())
    }
}
