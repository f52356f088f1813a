//! Flow toolkit entry point

use crate::errors::{LoopParError, Result};
use crate::features::flow_graph::infrastructure::StatementFlow;
use crate::shared::models::Method;
use crate::shared::ports::{FlowToolkit, MethodFlow};

/// Builds statement-level flow facts for methods with a body
#[derive(Debug, Default, Clone, Copy)]
pub struct StatementFlowToolkit;

impl StatementFlowToolkit {
    pub fn new() -> Self {
        Self
    }
}

impl FlowToolkit for StatementFlowToolkit {
    fn analyze(&self, method: &Method) -> Result<Box<dyn MethodFlow>> {
        if !method.has_body() {
            return Err(LoopParError::malformed(
                method.signature(),
                "method has no body",
            ));
        }
        Ok(Box::new(StatementFlow::new(method)))
    }
}
