//! The controller's explicit state machine (spec §4.5), in the idiom
//! of the teacher's `LoopState`/`LoopAction` chat-loop driver: a plain
//! struct carrying `state`, `attempt`, `context`, advanced by a
//! `RunState` enum match — never nested `async` control flow with
//! implicit continuations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use xgen_core::{GenerationContext, PipelineError, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Parsing,
    Planning,
    Coding,
    Validating,
    Writing,
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

/// A single cancellation flag, checked only at state boundaries (spec
/// §4.5, §5) — never mid-retry inside an LLM call.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The controller's mutable working state across one run. Carries
/// everything a retry needs to carry forward: the attempt counter and
/// the prior attempt's violations (spec §4.5's refinement edge).
pub struct PipelineState {
    pub state: RunState,
    pub attempt: u32,
    pub context: GenerationContext,
    pub prior_violations: Option<Vec<Violation>>,
    pub terminal_error: Option<PipelineError>,
}

impl PipelineState {
    pub fn new(context: GenerationContext) -> Self {
        Self {
            state: RunState::Init,
            attempt: 0,
            context,
            prior_violations: None,
            terminal_error: None,
        }
    }

    pub fn fail(&mut self, error: PipelineError) {
        self.context.fail(&error);
        self.terminal_error = Some(error);
        self.state = RunState::Failed;
    }
}
