//! C3 LLM Orchestrator: wires the channel, retry policy, and response
//! parsers into the two calls the controller needs — `plan()` at
//! temperature 0.3, `code()` at temperature 0.2 (spec §4.3).

use crate::channel::{LlmChannel, LlmRequest};
use crate::code_response::{parse_code_response, CodeParsingError};
use crate::plan_response::{parse_plan_response, PlanGenerationError};
use crate::retry::{complete_with_retry, ExhaustedRetries};
use tracing::instrument;
use xgen_core::{GeneratedCode, Plan};

const PLAN_TEMPERATURE: f32 = 0.3;
const CODE_TEMPERATURE: f32 = 0.2;

pub enum PlanOutcome {
    Plan(Plan),
    ParseFailed { error: PlanGenerationError, response_preview: String },
    TransportExhausted(ExhaustedRetries),
}

pub enum CodeOutcome {
    Code(GeneratedCode),
    ParseFailed(CodeParsingError),
    TransportExhausted(ExhaustedRetries),
}

pub struct LlmOrchestrator<'a> {
    channel: &'a dyn LlmChannel,
}

impl<'a> LlmOrchestrator<'a> {
    pub fn new(channel: &'a dyn LlmChannel) -> Self {
        Self { channel }
    }

    #[instrument(skip(self, prompt))]
    pub async fn plan(&self, prompt: &str) -> PlanOutcome {
        let request = LlmRequest::new(prompt, PLAN_TEMPERATURE);
        match complete_with_retry(self.channel, &request).await {
            Err(exhausted) => PlanOutcome::TransportExhausted(exhausted),
            Ok(response) => match parse_plan_response(&response.text) {
                Ok(plan) => PlanOutcome::Plan(plan),
                Err(error) => PlanOutcome::ParseFailed { error, response_preview: response.text },
            },
        }
    }

    #[instrument(skip(self, prompt))]
    pub async fn code(&self, prompt: &str) -> CodeOutcome {
        let request = LlmRequest::new(prompt, CODE_TEMPERATURE);
        match complete_with_retry(self.channel, &request).await {
            Err(exhausted) => CodeOutcome::TransportExhausted(exhausted),
            Ok(response) => match parse_code_response(&response.text) {
                Ok(code) => CodeOutcome::Code(code),
                Err(error) => CodeOutcome::ParseFailed(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_channel::FakeLlmChannel;

    #[tokio::test]
    async fn plan_success_round_trip() {
        let response = "```json\n{\"strategy_prose\":\"x\",\"classes\":[\"A\"],\"dependencies\":[],\"error_handling_notes\":\"n\",\"test_strategy\":\"t\"}\n```";
        let channel = FakeLlmChannel::new(response);
        let orchestrator = LlmOrchestrator::new(&channel);
        match orchestrator.plan("prompt").await {
            PlanOutcome::Plan(plan) => assert_eq!(plan.classes, vec!["A".to_string()]),
            _ => panic!("expected Plan"),
        }
    }

    #[tokio::test]
    async fn code_parse_failure_is_reported() {
        let channel = FakeLlmChannel::new("no fenced blocks here");
        let orchestrator = LlmOrchestrator::new(&channel);
        match orchestrator.code("prompt").await {
            CodeOutcome::ParseFailed(_) => {}
            _ => panic!("expected ParseFailed"),
        }
    }
}
