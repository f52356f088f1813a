//! Parse program use case

use crate::errors::Result;
use crate::features::parsing::infrastructure::JirParser;
use crate::shared::models::Program;
use std::path::Path;
use tracing::info;

/// Parse a whole program from textual IR
pub fn parse_program(source: &str) -> Result<Program> {
    JirParser::new().parse(source)
}

/// Read and parse a `.jir` file
pub fn parse_program_file(path: impl AsRef<Path>) -> Result<Program> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let program = parse_program(&source)?;
    info!(
        path = %path.display(),
        classes = program.classes.len(),
        methods = program.methods.len(),
        "loaded program"
    );
    Ok(program)
}
