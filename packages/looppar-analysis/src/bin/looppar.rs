//! Loop-parallelism legality CLI
//!
//! # Usage
//!
//! ```bash
//! # Analyze a program, write annotationMap.json, print a text report
//! looppar program.jir
//!
//! # Z3 backend, custom output, JSON report
//! looppar program.jir --solver z3 --output out/annotations.json --report json
//!
//! # Settings from a YAML file, debug logging
//! looppar program.jir --config looppar.yaml --verbose
//! ```
//!
//! Exit code 0 on success (rejected loops included), 1 on a hard error.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use looppar_analysis::config::{AnalysisConfig, SolverBackend};
use looppar_analysis::features::parsing::parse_program_file;
use looppar_analysis::{AnalysisContext, LoopParallelizer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "looppar")]
#[command(about = "Prove loops safe to run in parallel and emit an annotation map", long_about = None)]
struct Cli {
    /// Program in textual IR
    program: PathBuf,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Annotation map output path (overrides the configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Solver backend (overrides the configuration)
    #[arg(long, value_enum)]
    solver: Option<SolverArg>,

    /// Per-query solver timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SolverArg {
    Builtin,
    Z3,
}

impl From<SolverArg> for SolverBackend {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::Builtin => SolverBackend::Builtin,
            SolverArg::Z3 => SolverBackend::Z3,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "looppar_analysis=debug" } else { "looppar_analysis=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(output) = &cli.output {
        config = config.with_output(output.clone());
    }
    if let Some(solver) = cli.solver {
        config = config.with_backend(solver.into());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let program = parse_program_file(&cli.program)
        .with_context(|| format!("failed to read {}", cli.program.display()))?;

    let mut ctx = AnalysisContext::build(program, config)?;
    let report = LoopParallelizer::new().run(&mut ctx);
    ctx.write_annotations()
        .with_context(|| format!("failed to write {}", ctx.config.output.display()))?;

    match cli.report {
        ReportFormat::Text => println!("{}", report),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
