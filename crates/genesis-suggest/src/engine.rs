//! HTTP client for an Ollama server.
//!
//! Talks to `GET /api/tags` (reachability check) and `POST /api/generate`
//! (non-streaming completion) using [`reqwest`].

use std::time::Duration;

use genesis_core::settings::{validate_server_url, InvalidUrl};
use genesis_core::ProviderConfig;
use serde::{Deserialize, Serialize};

use crate::prompt::Purpose;

/// Upper bound for the connectivity check.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound for a single generation request.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("Ollama integration is disabled")]
    Disabled,

    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrl),

    /// The server answered with a non-2xx status.
    #[error("Ollama API error ({status}): {body}")]
    Http { status: u16, body: String },

    /// Connection refused, DNS failure, timeout and the like.
    #[error("could not reach the Ollama server: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx answer whose body is not what the endpoint promises.
    #[error("unexpected response from Ollama: {0}")]
    InvalidResponse(String),
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Stateless apart from the pooled connection inside `reqwest::Client`, so a
/// single client can serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    check_timeout: Duration,
    generate_timeout: Duration,
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Reuse an existing [`reqwest::Client`] (and its connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            check_timeout: CHECK_TIMEOUT,
            generate_timeout: GENERATE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, check: Duration, generate: Duration) -> Self {
        self.check_timeout = check;
        self.generate_timeout = generate;
        self
    }

    /// Ask the configured provider for text.
    ///
    /// Fails with [`SuggestError::Disabled`] or [`SuggestError::InvalidUrl`]
    /// before touching the network.
    pub async fn respond(
        &self,
        config: &ProviderConfig,
        purpose: Purpose,
        content: &str,
    ) -> Result<String, SuggestError> {
        if !config.enabled {
            return Err(SuggestError::Disabled);
        }
        validate_server_url(&config.server_url)?;
        self.generate(&config.server_url, &config.model, purpose.preamble(), content)
            .await
    }

    /// `true` only when `/api/tags` answers 2xx with a JSON body. Every
    /// failure, including a malformed URL, is `false`.
    pub async fn check_connection(&self, config: &ProviderConfig) -> bool {
        if let Err(e) = validate_server_url(&config.server_url) {
            tracing::warn!(error = %e, "not checking provider");
            return false;
        }
        match self.list_models(&config.server_url).await {
            Ok(tags) => {
                tracing::debug!(%tags, "provider reachable");
                true
            }
            Err(e) => {
                tracing::warn!(server_url = %config.server_url, error = %e, "provider check failed");
                false
            }
        }
    }

    /// `POST {server_url}/api/generate` with streaming off.
    pub async fn generate(
        &self,
        server_url: &str,
        model: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, SuggestError> {
        tracing::debug!(server_url, model, "sending generate request");
        let body = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };
        let response = self
            .client
            .post(endpoint(server_url, "api/generate"))
            .timeout(self.generate_timeout)
            .json(&body)
            .send()
            .await?;
        let text = Self::ensure_success(response).await?.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| SuggestError::InvalidResponse(e.to_string()))?;
        Ok(parsed.response)
    }

    /// `GET {server_url}/api/tags`, returning the decoded body.
    pub async fn list_models(&self, server_url: &str) -> Result<serde_json::Value, SuggestError> {
        let response = self
            .client
            .get(endpoint(server_url, "api/tags"))
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.check_timeout)
            .send()
            .await?;
        let text = Self::ensure_success(response).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| SuggestError::InvalidResponse(e.to_string()))
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SuggestError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SuggestError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn endpoint(server_url: &str, path: &str) -> String {
    format!("{}/{}", server_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:11434/", "api/tags"),
            "http://localhost:11434/api/tags"
        );
        assert_eq!(
            endpoint("http://localhost:11434", "api/generate"),
            "http://localhost:11434/api/generate"
        );
    }

    #[test]
    fn generate_body_matches_wire_format() {
        let body = GenerateRequest {
            model: "llama3",
            prompt: "A detective",
            system: "sys",
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"model": "llama3", "prompt": "A detective", "system": "sys", "stream": false})
        );
    }

    #[test]
    fn http_error_message_includes_status_and_body() {
        let err = SuggestError::Http {
            status: 404,
            body: "model not found".to_string(),
        };
        assert_eq!(err.to_string(), "Ollama API error (404): model not found");
    }
}
