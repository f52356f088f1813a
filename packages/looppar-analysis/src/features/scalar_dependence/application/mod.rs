pub mod checker;

pub use checker::ScalarDependenceChecker;
