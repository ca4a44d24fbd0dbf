//! The LLM channel: a narrow async transport trait standing in for
//! whatever HTTP provider backs generation, grounded on the teacher's
//! `SyncTransport`/`AdapterError` split (adapters/transport_types.rs)
//! but made async so the controller can await it directly.

use async_trait::async_trait;
use xgen_core::TransportErrorCategory;

/// One call to the model: a rendered prompt plus sampling knobs.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub temperature: f32,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self { prompt: prompt.into(), temperature }
    }
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
}

/// Transport-level failure. Maps onto `xgen_core::TransportErrorCategory`
/// at the retry boundary; never propagated past the orchestrator as-is.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AdapterError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AdapterError {
    pub fn category(&self) -> TransportErrorCategory {
        match self {
            AdapterError::Authentication(_) => TransportErrorCategory::Auth,
            AdapterError::RateLimited(_) => TransportErrorCategory::RateLimit,
            AdapterError::Timeout(_) => TransportErrorCategory::Timeout,
            AdapterError::Network(_) | AdapterError::InvalidResponse(_) => TransportErrorCategory::Other,
        }
    }

    /// Authentication failures are never worth retrying (spec §4.3).
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AdapterError::Authentication(_))
    }
}

/// Provider-agnostic async channel to the model. Production code talks
/// to a real HTTP adapter; tests talk to `FakeLlmChannel`.
#[async_trait]
pub trait LlmChannel: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, AdapterError>;
}
