pub mod flow_toolkit;

pub use flow_toolkit::StatementFlowToolkit;
