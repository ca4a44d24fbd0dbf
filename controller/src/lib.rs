//! `xgen-controller`: the refinement controller (C5) and progress bus
//! (C7) — the top-level facade that drives one example-to-extractor
//! generation run end to end.

pub mod collaborators;
pub mod driver;
pub mod options;
pub mod progress;
pub mod run_state;

pub use collaborators::{FakeProjectLifecycle, FsProjectLifecycle, ProjectLifecycle};
pub use driver::{generate, Collaborators};
pub use options::GenerationOptions;
pub use progress::{ProgressBus, ProgressObserver};
pub use run_state::{CancellationToken, PipelineState, RunState};
