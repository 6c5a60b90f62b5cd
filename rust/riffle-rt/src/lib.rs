//! Riffle runtime — collective communication, input synthesis, result
//! recording, and the pipeline orchestrator.
//!
//! The core algorithms live in `riffle-core`; this crate supplies the
//! process-group machinery that distributes them: a thread-backed group
//! whose members talk only through collective operations (scatter, gather,
//! barrier), the deterministic data sources the coordinator fills its
//! dataset from, and the per-iteration orchestration and timing.
#![warn(clippy::all)]

pub mod collective;
pub mod group;
pub mod pipeline;
pub mod recorder;
pub mod source;

pub use collective::{Collective, CollectiveError, ROOT};
pub use group::{GroupError, LocalEndpoint, LocalGroup};
pub use pipeline::{run_local, run_member, PipelineError, PipelinePlan, RunReport};
pub use recorder::{record_line, FileRecorder, MemoryRecorder, Recorder, RecorderError};
pub use source::{
    DataSource, InputKind, PartiallySortedSource, ReversedSource, UniformSource,
};

// Re-export the core algorithms so pipeline callers need only this crate
pub use riffle_core::{merge_sections, partition_range, ShellSorter};
