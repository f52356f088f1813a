//! Parsing use cases

pub mod parse_program;

pub use parse_program::{parse_program, parse_program_file};
