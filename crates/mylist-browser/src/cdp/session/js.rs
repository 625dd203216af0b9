//! JavaScript execution operations for CDP page session.

use std::time::Duration;

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call("Runtime.evaluate", Some(Self::evaluate_params(expression)))
            .await?;
        Self::unwrap_evaluation(result)
    }

    /// Evaluate with an explicit timeout.
    pub async fn evaluate_with_timeout(
        &self,
        expression: &str,
        timeout: Duration,
    ) -> Result<Value, CdpError> {
        let result = self
            .call_with_timeout("Runtime.evaluate", Some(Self::evaluate_params(expression)), timeout)
            .await?;
        Self::unwrap_evaluation(result)
    }

    fn evaluate_params(expression: &str) -> Value {
        json!({
            "expression": expression,
            "returnByValue": true,
            "awaitPromise": true,
        })
    }

    pub(super) fn unwrap_evaluation(result: Value) -> Result<Value, CdpError> {
        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }
}
