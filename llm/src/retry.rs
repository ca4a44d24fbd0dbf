//! Exponential backoff around a single `LlmChannel` call (spec §4.3):
//! delays of 1s, 2s, 4s between attempts, maximum 3 attempts total,
//! authentication failures never retried.

use crate::channel::{AdapterError, LlmChannel, LlmRequest, LlmResponse};
use std::time::Duration;
use tracing::warn;
use xgen_core::TransportErrorCategory;

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(2)];

/// Thrown only once every attempt is exhausted; callers map this
/// directly onto `xgen_core::PipelineError::LLMTransportError`.
#[derive(Debug, Clone)]
pub struct ExhaustedRetries {
    pub category: TransportErrorCategory,
    pub attempts: u32,
    pub last_detail: String,
}

pub async fn complete_with_retry(
    channel: &dyn LlmChannel,
    request: &LlmRequest,
) -> Result<LlmResponse, ExhaustedRetries> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match channel.complete(request).await {
            Ok(response) => return Ok(response),
            Err(err) => {
                let retryable = err.is_retryable() && attempt < MAX_ATTEMPTS;
                warn!(attempt, retryable, error = %err, "llm transport call failed");
                if !retryable {
                    return Err(ExhaustedRetries {
                        category: err.category(),
                        attempts: attempt,
                        last_detail: err.to_string(),
                    });
                }
                let delay = BACKOFF[(attempt - 1) as usize];
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_channel::FakeLlmChannel;

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let channel = FakeLlmChannel::scripted(vec![
            Err(AdapterError::Timeout("slow".to_string())),
            Err(AdapterError::Timeout("slow again".to_string())),
            Ok("done".to_string()),
        ]);
        let result = complete_with_retry(&channel, &LlmRequest::new("p", 0.3)).await.unwrap();
        assert_eq!(result.text, "done");
        assert_eq!(channel.call_count(), 3);
    }

    #[tokio::test]
    async fn authentication_failure_is_never_retried() {
        let channel = FakeLlmChannel::scripted(vec![Err(AdapterError::Authentication("bad key".to_string()))]);
        let result = complete_with_retry(&channel, &LlmRequest::new("p", 0.3)).await;
        let err = result.unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(err.category, TransportErrorCategory::Auth);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_max_attempts() {
        let channel = FakeLlmChannel::scripted(vec![
            Err(AdapterError::Network("a".to_string())),
            Err(AdapterError::Network("b".to_string())),
            Err(AdapterError::Network("c".to_string())),
        ]);
        let result = complete_with_retry(&channel, &LlmRequest::new("p", 0.3)).await;
        let err = result.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(channel.call_count(), 3);
    }
}
