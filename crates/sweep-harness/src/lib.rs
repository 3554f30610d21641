pub mod config;
pub mod corpus;
pub mod invoke;
pub mod orchestrator;
pub mod probe;
pub mod runner;

pub use crate::corpus::{walk_corpus, CacheArtifact, CorpusError, CorpusWalk, FilterSet};
pub use crate::invoke::{CapturedRun, Outcome, ProcessInvoker, StreamedRun, ToolError, ToolInvoker};
pub use crate::orchestrator::{probe_corpus, sweep_corpus, SweepError, SweepStatus};
pub use crate::probe::{probe_cache, ProbeOptions, ProbeOutcome, DEFAULT_IMAGES};
pub use crate::runner::{run_cache, CacheVerdict, SweepOptions};
