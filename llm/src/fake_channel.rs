//! `FakeLlmChannel`: fixture-driven channel for tests, grounded on the
//! teacher's `FakeTransport` (adapters/transport_fake.rs).

use crate::channel::{AdapterError, LlmChannel, LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::sync::Mutex;

enum Scripted {
    Response(String),
    Error(AdapterError),
}

/// Replays a fixed script of responses/errors, one per call, then
/// repeats the last entry for any further calls (mirrors the teacher's
/// single-fixture `FakeTransport` generalized to a sequence so retry
/// and multi-attempt tests can script "fail twice, then succeed").
pub struct FakeLlmChannel {
    script: Mutex<Vec<Scripted>>,
    calls: Mutex<u32>,
}

impl FakeLlmChannel {
    pub fn new(response: impl Into<String>) -> Self {
        Self { script: Mutex::new(vec![Scripted::Response(response.into())]), calls: Mutex::new(0) }
    }

    pub fn scripted(entries: Vec<Result<String, AdapterError>>) -> Self {
        let script = entries
            .into_iter()
            .map(|e| match e {
                Ok(s) => Scripted::Response(s),
                Err(e) => Scripted::Error(e),
            })
            .collect();
        Self { script: Mutex::new(script), calls: Mutex::new(0) }
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(vec![Scripted::Error(AdapterError::Network(message.into()))]),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmChannel for FakeLlmChannel {
    async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, AdapterError> {
        let mut calls = self.calls.lock().unwrap();
        let index = (*calls as usize).min(self.script.lock().unwrap().len().saturating_sub(1));
        *calls += 1;
        let script = self.script.lock().unwrap();
        match &script[index] {
            Scripted::Response(text) => Ok(LlmResponse { text: text.clone() }),
            Scripted::Error(e) => Err(e.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_fixed_response() {
        let channel = FakeLlmChannel::new("hello");
        let response = channel.complete(&LlmRequest::new("p", 0.3)).await.unwrap();
        assert_eq!(response.text, "hello");
    }

    #[tokio::test]
    async fn scripted_sequence_fails_then_succeeds() {
        let channel = FakeLlmChannel::scripted(vec![
            Err(AdapterError::Timeout("slow".to_string())),
            Ok("recovered".to_string()),
        ]);
        let first = channel.complete(&LlmRequest::new("p", 0.3)).await;
        assert!(first.is_err());
        let second = channel.complete(&LlmRequest::new("p", 0.3)).await.unwrap();
        assert_eq!(second.text, "recovered");
    }
}
