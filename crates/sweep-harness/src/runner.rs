use crate::invoke::{Outcome, ToolError, ToolInvoker};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const BASE_FLAGS: [&str; 3] = ["--disable-output", "-v", "-q"];

#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub executable: PathBuf,
    /// Worker count handed to the extractor on the retry, computed once at
    /// startup from the host core count.
    pub retry_jobs: usize,
    pub pause: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheVerdict {
    Passed,
    /// The cache could not be processed; the sweep must stop here.
    Failed,
}

/// Process one cache: invoke the extractor with the base flag set, streaming
/// its diagnostics live, and retry exactly once with a halved worker count
/// when the failure carries the transient allocation signature. A second
/// transient failure, or any failure without the signature, fails the cache.
pub fn run_cache(
    invoker: &dyn ToolInvoker,
    options: &SweepOptions,
    cache: &Path,
) -> Result<CacheVerdict, ToolError> {
    println!("\nRunning {}", cache.display());
    let args = base_args(cache);

    let run = invoker.run_streaming(&options.executable, &args)?;
    match run.outcome() {
        Outcome::Success => Ok(CacheVerdict::Passed),
        Outcome::TransientFailure => {
            println!("Re-processing with lower thread count");
            let mut retry_args = args;
            retry_args.push(OsString::from("-j"));
            retry_args.push(OsString::from(options.retry_jobs.to_string()));
            if invoker.run_inherited(&options.executable, &retry_args)? {
                Ok(CacheVerdict::Passed)
            } else {
                Ok(CacheVerdict::Failed)
            }
        }
        Outcome::HardFailure => Ok(CacheVerdict::Failed),
    }
}

fn base_args(cache: &Path) -> Vec<OsString> {
    let mut args = Vec::with_capacity(BASE_FLAGS.len() + 3);
    args.push(cache.as_os_str().to_os_string());
    args.extend(BASE_FLAGS.iter().copied().map(OsString::from));
    args
}
