//! Parsing infrastructure - textual IR reader

pub mod cursor;
pub mod jir_parser;

pub use jir_parser::JirParser;
