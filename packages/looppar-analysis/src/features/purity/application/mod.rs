pub mod purity_analysis;

pub use purity_analysis::PurityAnalysis;
