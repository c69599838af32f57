//! Search → summarize-each → merge pipeline.
//!
//! - `orchestrator` - run sequencing and the per-video fan-out
//! - `events` - the progress event model
//! - `progress` - consumer-side fold of events
//! - `depth` - depth-to-label policies
//! - `report` - serializable record of a finished run

mod depth;
mod events;
mod orchestrator;
mod progress;
mod report;
mod slots;

pub use depth::{DepthLabel, DepthPolicy, ThresholdTable};
pub use events::{ItemOutcome, ProgressEvent, RunOutcome, Stage, Terminal};
pub use orchestrator::{Orchestrator, RunRequest};
pub use progress::ProgressView;
pub use report::{ReportFormat, RunReport};
pub use slots::OutcomeSlots;
