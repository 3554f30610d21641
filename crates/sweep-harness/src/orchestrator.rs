use crate::corpus::{walk_corpus, CorpusError, FilterSet};
use crate::invoke::{ToolError, ToolInvoker};
use crate::probe::{probe_cache, ProbeOptions};
use crate::runner::{run_cache, CacheVerdict, SweepOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("read confirmation prompt: {0}")]
    Prompt(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepStatus {
    Completed,
    /// The run stopped at the first cache the controller failed.
    Stopped { cache: PathBuf },
}

/// Drive the execution controller over every non-filtered cache, one at a
/// time. Fail-fast: the first failed cache ends the run with no summary, so
/// the operator can investigate it immediately.
pub fn sweep_corpus(
    invoker: &dyn ToolInvoker,
    options: &SweepOptions,
    corpus_root: &Path,
    filters: FilterSet,
) -> Result<SweepStatus, SweepError> {
    for artifact in walk_corpus(corpus_root, filters)? {
        let artifact = artifact?;
        if options.pause {
            confirm(&artifact.path).map_err(SweepError::Prompt)?;
        }
        match run_cache(invoker, options, &artifact.path)? {
            CacheVerdict::Passed => {}
            CacheVerdict::Failed => {
                return Ok(SweepStatus::Stopped {
                    cache: artifact.path,
                })
            }
        }
    }
    Ok(SweepStatus::Completed)
}

/// Probe every cache in the corpus for at least one extractable image.
/// Fail-soft: walker and probe failures are reported and the run moves on to
/// the next cache regardless.
pub fn probe_corpus(
    invoker: &dyn ToolInvoker,
    options: &ProbeOptions,
    corpus_root: &Path,
) -> Result<(), CorpusError> {
    for artifact in walk_corpus(corpus_root, FilterSet::default())? {
        let artifact = match artifact {
            Ok(artifact) => artifact,
            Err(err) => {
                eprintln!("skipping cache: {err}");
                continue;
            }
        };
        if let Err(err) = probe_cache(invoker, options, &artifact) {
            eprintln!("probe failed for {}: {err}", artifact.label());
        }
    }
    Ok(())
}

fn confirm(cache: &Path) -> Result<(), io::Error> {
    print!("Press enter to process {}", cache.display());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
