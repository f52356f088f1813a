pub mod collector;

pub use collector::ArrayRefCollector;
