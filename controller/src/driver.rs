//! C5 Refinement Controller: `generate(examples, project_config, options) -> GenerationContext`
//! (spec §4.5). Wires C1 (parser) → C2 (prompt renderer) → C3 (LLM
//! orchestrator) → C4 (constraint engine) → C6 (writer), looping back
//! on the refinement edge until the attempt budget is exhausted.

use crate::collaborators::ProjectLifecycle;
use crate::options::GenerationOptions;
use crate::progress::ProgressBus;
use crate::run_state::{CancellationToken, PipelineState, RunState};
use std::collections::HashMap;
use std::time::Instant;
use tracing::instrument;
use xgen_constraints::ConstraintEngine;
use xgen_core::{
    AttemptRecord, Example, GenerationContext, PipelineError, Plan, ProgressEvent, ProjectConfig,
    StepIndex, StepStatus,
};
use xgen_llm::{CodeOutcome, LlmChannel, LlmOrchestrator, PlanOutcome};
use xgen_writer::{CodeWriter, WrittenPaths};

/// The collaborators a run needs: the LLM transport, the constraint
/// engine, the code writer, and the project-lifecycle service. Bundled
/// so `generate` itself stays a plain function, not a struct method
/// pinned to one engine instance (the constraint engine's policy may
/// be shared read-only across runs, spec §5).
pub struct Collaborators<'a> {
    pub llm: &'a dyn LlmChannel,
    pub constraints: &'a ConstraintEngine,
    pub writer: &'a CodeWriter,
    pub project_lifecycle: &'a dyn ProjectLifecycle,
}

fn elapsed_seconds(clock: Instant) -> f64 {
    clock.elapsed().as_secs_f64()
}

fn emit(bus: &ProgressBus, step: StepIndex, status: StepStatus, clock: Instant, message: Option<String>) {
    let mut event = ProgressEvent::new(step, status, elapsed_seconds(clock));
    if let Some(m) = message {
        event = event.with_message(m);
    }
    bus.publish(event);
}

fn written_paths_map(paths: &WrittenPaths) -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("extractor".to_string(), paths.extractor.display().to_string());
    map.insert("models".to_string(), paths.models.display().to_string());
    map.insert("tests".to_string(), paths.tests.display().to_string());
    map.insert("marker".to_string(), paths.marker.display().to_string());
    map
}

fn finish(mut pipeline: PipelineState, progress: &ProgressBus, clock: Instant) -> GenerationContext {
    pipeline.context.duration_seconds = elapsed_seconds(clock);
    pipeline.context.completed = pipeline.state == RunState::Done;
    let status = if pipeline.context.completed { StepStatus::Succeeded } else { StepStatus::Failed };
    emit(progress, StepIndex::Finalize, StepStatus::Pending, clock, None);
    emit(progress, StepIndex::Finalize, StepStatus::Running, clock, None);
    emit(progress, StepIndex::Finalize, status, clock, None);
    pipeline.context
}

/// Drives one pipeline run to completion. Never panics on a component
/// failure — every failure mode in spec §4.8's error taxonomy is
/// captured on `GenerationContext::errors` and the function returns
/// normally.
#[instrument(skip_all, fields(project = %project_config.name))]
pub async fn generate(
    examples: &[Example],
    project_config: &ProjectConfig,
    options: GenerationOptions,
    collaborators: Collaborators<'_>,
    progress: &ProgressBus,
    cancellation: CancellationToken,
) -> GenerationContext {
    let options = options.normalize();
    let run_clock = Instant::now();
    let start = chrono::Utc::now();
    let mut pipeline = PipelineState::new(GenerationContext::new(project_config.name.clone(), start));

    if !collaborators.project_lifecycle.project_exists(&project_config.name).await {
        pipeline.fail(PipelineError::ProjectNotFoundError(project_config.name.clone()));
        return finish(pipeline, progress, run_clock);
    }

    pipeline.state = RunState::Parsing;

    let orchestrator = LlmOrchestrator::new(collaborators.llm);
    let mut parsed_examples = None;
    let mut plan: Option<Plan> = None;
    let mut generated_code = None;

    while !pipeline.state.is_terminal() {
        if cancellation.is_cancelled() {
            pipeline.fail(PipelineError::Cancelled { reason: "cancelled at state boundary".to_string() });
            break;
        }

        match pipeline.state {
            RunState::Init => unreachable!("Init resolves to Parsing before the loop starts"),

            RunState::Parsing => {
                emit(progress, StepIndex::Parse, StepStatus::Pending, run_clock, None);
                emit(progress, StepIndex::Parse, StepStatus::Running, run_clock, None);
                match xgen_parser::parse(examples, project_config) {
                    Ok(parsed) => {
                        emit(progress, StepIndex::Parse, StepStatus::Succeeded, run_clock, None);
                        parsed_examples = Some(parsed);
                        pipeline.state = RunState::Planning;
                    }
                    Err(e) => {
                        emit(progress, StepIndex::Parse, StepStatus::Failed, run_clock, Some(e.to_string()));
                        pipeline.fail(PipelineError::ExampleParsingError { reason: e.reason(), path: None });
                    }
                }
            }

            RunState::Planning => {
                pipeline.attempt += 1;
                pipeline.context.attempt = pipeline.attempt;
                emit(progress, StepIndex::Plan, StepStatus::Pending, run_clock, None);
                emit(progress, StepIndex::Plan, StepStatus::Running, run_clock, None);
                let parsed = parsed_examples.as_ref().expect("parsed examples available by Planning");
                let prompt =
                    xgen_parser::render_plan_prompt(project_config, parsed, pipeline.prior_violations.as_deref());
                match orchestrator.plan(&prompt).await {
                    PlanOutcome::Plan(p) => {
                        emit(progress, StepIndex::Plan, StepStatus::Succeeded, run_clock, None);
                        pipeline.context.plan = Some(p.clone());
                        plan = Some(p);
                        pipeline.state = RunState::Coding;
                    }
                    PlanOutcome::ParseFailed { error, response_preview } => {
                        emit(progress, StepIndex::Plan, StepStatus::Failed, run_clock, Some(error.to_string()));
                        pipeline.fail(PipelineError::PlanGenerationError {
                            reason: error.to_string(),
                            response_preview: Some(response_preview),
                        });
                    }
                    PlanOutcome::TransportExhausted(exhausted) => {
                        emit(progress, StepIndex::Plan, StepStatus::Failed, run_clock, Some(exhausted.last_detail.clone()));
                        pipeline.fail(PipelineError::LLMTransportError {
                            category: exhausted.category,
                            attempts: exhausted.attempts,
                            last_detail: exhausted.last_detail,
                        });
                    }
                }
            }

            RunState::Coding => {
                emit(progress, StepIndex::Code, StepStatus::Pending, run_clock, None);
                emit(progress, StepIndex::Code, StepStatus::Running, run_clock, None);
                let parsed = parsed_examples.as_ref().expect("parsed examples available by Coding");
                let current_plan = plan.as_ref().expect("plan available by Coding");
                let prompt = xgen_parser::render_code_prompt(
                    project_config,
                    parsed,
                    current_plan,
                    pipeline.prior_violations.as_deref(),
                );
                match orchestrator.code(&prompt).await {
                    CodeOutcome::Code(code) => {
                        emit(progress, StepIndex::Code, StepStatus::Succeeded, run_clock, None);
                        pipeline.context.generated_code = Some(code.clone());
                        generated_code = Some(code);
                        pipeline.state =
                            if options.enforce_validation { RunState::Validating } else { RunState::Writing };
                    }
                    CodeOutcome::ParseFailed(error) => {
                        emit(progress, StepIndex::Code, StepStatus::Failed, run_clock, Some(error.to_string()));
                        pipeline.fail(PipelineError::CodeParsingError { reason: error.to_string() });
                    }
                    CodeOutcome::TransportExhausted(exhausted) => {
                        emit(progress, StepIndex::Code, StepStatus::Failed, run_clock, Some(exhausted.last_detail.clone()));
                        pipeline.fail(PipelineError::LLMTransportError {
                            category: exhausted.category,
                            attempts: exhausted.attempts,
                            last_detail: exhausted.last_detail,
                        });
                    }
                }
            }

            RunState::Validating => {
                emit(progress, StepIndex::Validate, StepStatus::Pending, run_clock, None);
                emit(progress, StepIndex::Validate, StepStatus::Running, run_clock, None);
                let code = generated_code.as_ref().expect("generated code available by Validating");
                let result = collaborators.constraints.validate(&code.extractor_source);
                pipeline.context.validation_result = Some(result.clone());
                pipeline.context.attempt_history.push(AttemptRecord {
                    attempt: pipeline.attempt,
                    plan: plan.clone(),
                    validation_result: Some(result.clone()),
                    duration_seconds: elapsed_seconds(run_clock),
                });

                if result.valid {
                    emit(progress, StepIndex::Validate, StepStatus::Succeeded, run_clock, None);
                    pipeline.state = RunState::Writing;
                } else if pipeline.attempt < options.max_retries {
                    emit(
                        progress,
                        StepIndex::Validate,
                        StepStatus::Failed,
                        run_clock,
                        Some(format!("{} violation(s); refining (attempt {})", result.violations.len(), pipeline.attempt)),
                    );
                    pipeline.prior_violations = Some(result.violations.clone());
                    pipeline.state = RunState::Planning;
                } else {
                    emit(
                        progress,
                        StepIndex::Validate,
                        StepStatus::Failed,
                        run_clock,
                        Some(format!("{} violation(s); retries exhausted", result.violations.len())),
                    );
                    pipeline.fail(PipelineError::CodeValidationError {
                        violations: result.violations,
                        attempts: pipeline.attempt,
                    });
                }
            }

            RunState::Writing => {
                emit(progress, StepIndex::Write, StepStatus::Pending, run_clock, None);
                emit(progress, StepIndex::Write, StepStatus::Running, run_clock, None);
                if !options.write_files {
                    emit(
                        progress,
                        StepIndex::Write,
                        StepStatus::Succeeded,
                        run_clock,
                        Some("dry run: write skipped".to_string()),
                    );
                    pipeline.state = RunState::Done;
                    continue;
                }
                let code = generated_code.as_ref().expect("generated code available by Writing");
                match collaborators.writer.write(code, &project_config.name, options.backup) {
                    Ok(outcome) => {
                        emit(progress, StepIndex::Write, StepStatus::Succeeded, run_clock, None);
                        pipeline.context.written_paths = Some(written_paths_map(&outcome.paths));
                        pipeline.state = RunState::Done;
                    }
                    Err(failure) => {
                        emit(progress, StepIndex::Write, StepStatus::Failed, run_clock, Some(failure.error.to_string()));
                        collaborators.writer.rollback(&failure.partial);
                        pipeline.fail(PipelineError::FileWriteError {
                            path: failure.error.path().to_string(),
                            reason: failure.error.reason(),
                        });
                    }
                }
            }

            RunState::Done | RunState::Failed => unreachable!("terminal states exit the loop guard above"),
        }
    }

    finish(pipeline, progress, run_clock)
}
