//! Parsing Feature
//!
//! Reads subject programs written in the textual IR.
//!
//! ## Structure
//! - `application/` - parse_program, parse_program_file
//! - `infrastructure/` - JirParser (line-oriented reader), Cursor

pub mod application;
pub mod infrastructure;

// Re-exports
pub use application::{parse_program, parse_program_file};

#[doc(hidden)]
pub use infrastructure::JirParser;
