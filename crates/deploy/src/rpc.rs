//! Shared helpers for talking to an Ethereum JSON-RPC endpoint.

use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Timeout for a single RPC request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, anyhow::Error> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")
}

/// Make a JSON-RPC call and deserialize the result.
///
/// An `"error"` member in the response is turned into an error carrying the
/// node's message.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, anyhow::Error> {
    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .with_context(|| format!("Failed to send {} request", method))?;

    let result: Value = response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", method))?;

    if let Some(error) = result.get("error") {
        anyhow::bail!(
            "RPC error from {}: {}",
            method,
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
        );
    }

    // A missing result is a JSON null, which lets callers ask for `Option<T>`.
    let result_value = result.get("result").cloned().unwrap_or(Value::Null);

    serde_json::from_value(result_value)
        .with_context(|| format!("Failed to deserialize {} result", method))
}

/// Poll `check_fn` until it yields a value or `timeout` elapses.
///
/// `Ok(None)` and errors both mean "not yet"; errors are traced and retried.
pub async fn poll_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    check_fn: F,
) -> Result<T, anyhow::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<Option<T>, anyhow::Error>>,
{
    let start = std::time::Instant::now();

    loop {
        match check_fn().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {
                tracing::trace!(what = %what, "Not available yet, retrying...");
            }
            Err(e) => {
                tracing::trace!(error = %e, what = %what, "Poll failed, retrying...");
            }
        }

        if start.elapsed() > timeout {
            anyhow::bail!("Timeout after {:?} waiting for {}", timeout, what);
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_poll_until_returns_first_value() {
        let attempts = AtomicU32::new(0);
        let value = poll_until("receipt", Duration::from_secs(1), Duration::from_millis(1), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Ok(None)
                } else if n == 2 {
                    Err(anyhow::anyhow!("flaky"))
                } else {
                    Ok(Some(n))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let result: Result<u32, _> =
            poll_until("receipt", Duration::from_millis(5), Duration::from_millis(1), || async {
                Ok(None)
            })
            .await;

        assert!(result.unwrap_err().to_string().contains("receipt"));
    }
}
