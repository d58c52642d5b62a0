pub mod engine;
mod prompt;

pub use engine::{OllamaClient, SuggestError, CHECK_TIMEOUT, GENERATE_TIMEOUT};
pub use prompt::{compose_request, Purpose};

use genesis_core::ProviderConfig;

/// Generate text for `purpose` from the writer's `content`.
///
/// Returns the provider's `response` field verbatim. Each call is independent;
/// callers that drive a single control should keep at most one call in flight.
pub async fn get_response(
    config: &ProviderConfig,
    purpose: Purpose,
    content: &str,
) -> Result<String, SuggestError> {
    OllamaClient::new().respond(config, purpose, content).await
}

/// Check the configured server within [`CHECK_TIMEOUT`]. Never fails; any
/// problem is `false`.
pub async fn test_connection(config: &ProviderConfig) -> bool {
    OllamaClient::new().check_connection(config).await
}
