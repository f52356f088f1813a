//! Purity domain
//!
//! - PurityRecord / PurityTable: read- and write-impure statements per method
//! - EscapingLocals: locals observable by the caller

pub mod escaping_locals;
pub mod purity_record;

pub use escaping_locals::EscapingLocals;
pub use purity_record::{PurityRecord, PurityTable};
