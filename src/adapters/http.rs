//! Shared HTTP plumbing for remote model backends.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::domain::ports::ProviderError;

/// Build a client with a per-request timeout
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to build HTTP client: {e}")))
}

/// Resolve an API key from explicit config or an environment variable
pub(crate) fn resolve_api_key(
    configured: Option<&str>,
    env_var: &str,
    backend: &str,
) -> Result<String, ProviderError> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "{backend} API key not set. Set {env_var} env var or configure api_key."
            ))
        })
}

/// Pass through successful responses, turn the rest into provider errors
pub(crate) async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());

    Err(if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited(body)
    } else {
        ProviderError::Api {
            status: status.as_u16(),
            message: body,
        }
    })
}
