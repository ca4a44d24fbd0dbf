//! `xgen-llm`: the LLM channel abstraction, retry policy, response
//! parsers, and orchestrator (C3).

pub mod channel;
pub mod code_response;
pub mod fake_channel;
pub mod orchestrator;
pub mod plan_response;
pub mod retry;

pub use channel::{AdapterError, LlmChannel, LlmRequest, LlmResponse};
pub use code_response::{parse_code_response, CodeParsingError};
pub use fake_channel::FakeLlmChannel;
pub use orchestrator::{CodeOutcome, LlmOrchestrator, PlanOutcome};
pub use plan_response::{parse_plan_response, PlanGenerationError};
pub use retry::{complete_with_retry, ExhaustedRetries};
