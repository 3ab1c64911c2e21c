use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use common::{AnalysisRequest, EvaluationResult, UserCondition};
use strategy::Evaluator;

/// Per-request line of the scan report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanOutcome {
    fn failed(symbol: String, error: String) -> Self {
        Self { symbol, result: None, error: Some(error) }
    }
}

/// Symbol of a raw request, read without decoding the rest of it.
fn raw_symbol(raw: &Value) -> String {
    raw.pointer("/quote/symbol")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN")
        .to_string()
}

/// Decode and evaluate every request on the blocking pool, at most `workers`
/// at a time.
///
/// Requests without their own conditions get `default_conditions`. Outcomes
/// are returned in input order; a request that fails to decode or to analyze
/// only affects its own entry.
pub async fn run(
    evaluator: Evaluator,
    requests: Vec<Value>,
    default_conditions: &[UserCondition],
    workers: usize,
) -> Vec<ScanOutcome> {
    info!(requests = requests.len(), workers, "Starting scan");
    let permits = Arc::new(Semaphore::new(workers.max(1)));

    let pending: Vec<_> = requests
        .into_iter()
        .map(|raw| {
            let symbol = raw_symbol(&raw);
            let mut request = match serde_json::from_value::<AnalysisRequest>(raw) {
                Ok(request) => request,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Malformed request");
                    return (symbol, Err(format!("malformed request: {e}")));
                }
            };
            if request.strategies.is_none() {
                request.strategies = Some(default_conditions.to_vec());
            }
            let evaluator = evaluator.clone();
            let permits = permits.clone();

            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                tokio::task::spawn_blocking(move || evaluator.analyze(&request)).await
            });
            (symbol, Ok(handle))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(pending.len());
    for (symbol, handle) in pending {
        let outcome = match handle {
            Err(e) => ScanOutcome::failed(symbol, e),
            Ok(handle) => match handle.await {
                Ok(Ok(Ok(result))) => ScanOutcome { symbol, result: Some(result), error: None },
                Ok(Ok(Err(e))) => {
                    warn!(symbol = %symbol, error = %e, "Analysis rejected");
                    ScanOutcome::failed(symbol, e.to_string())
                }
                Ok(Err(e)) | Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Analysis task failed");
                    ScanOutcome::failed(symbol, format!("analysis task failed: {e}"))
                }
            },
        };
        outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    info!(analyzed = outcomes.len() - failed, failed, "Scan finished");
    outcomes
}
