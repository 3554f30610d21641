use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Diagnostic substring the extractor emits when its worker pool fails to
/// allocate backing memory; the one failure worth a lower-concurrency retry.
pub const TRANSIENT_SIGNATURE: &str = "The paging file is too small";

const STREAM_CHUNK_BYTES: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("spawn {tool}: {source}")]
    Spawn {
        tool: PathBuf,
        source: std::io::Error,
    },
    #[error("stream tool diagnostics: {0}")]
    Diagnostics(std::io::Error),
    #[error("wait for tool exit: {0}")]
    Wait(std::io::Error),
}

/// One streamed invocation: exit state plus the fully accumulated stderr
/// text, which was already echoed to the operator as it arrived.
#[derive(Debug, Clone)]
pub struct StreamedRun {
    pub success: bool,
    pub diagnostics: String,
}

impl StreamedRun {
    pub fn outcome(&self) -> Outcome {
        if self.success {
            Outcome::Success
        } else if self.diagnostics.contains(TRANSIENT_SIGNATURE) {
            Outcome::TransientFailure
        } else {
            Outcome::HardFailure
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    TransientFailure,
    HardFailure,
}

/// One captured invocation: exit state plus combined stdout and stderr text.
#[derive(Debug, Clone)]
pub struct CapturedRun {
    pub success: bool,
    pub combined: String,
}

/// Seam between the controllers and the external extractor process, so the
/// controllers can be exercised against scripted invokers.
pub trait ToolInvoker {
    /// Run with stderr piped: echo each chunk to the harness stdout the
    /// moment it arrives, accumulate the full text, then observe the exit
    /// status once the stream has ended.
    fn run_streaming(&self, tool: &Path, args: &[OsString]) -> Result<StreamedRun, ToolError>;

    /// Run to completion with all stdio inherited; only the exit state is
    /// observed.
    fn run_inherited(&self, tool: &Path, args: &[OsString]) -> Result<bool, ToolError>;

    /// Run to completion capturing stdout and stderr.
    fn run_captured(&self, tool: &Path, args: &[OsString]) -> Result<CapturedRun, ToolError>;
}

#[derive(Debug, Default)]
pub struct ProcessInvoker;

impl ToolInvoker for ProcessInvoker {
    fn run_streaming(&self, tool: &Path, args: &[OsString]) -> Result<StreamedRun, ToolError> {
        let mut child = Command::new(tool)
            .args(args)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                tool: tool.to_path_buf(),
                source,
            })?;
        let mut stderr = match child.stderr.take() {
            Some(stderr) => stderr,
            None => {
                return Err(ToolError::Diagnostics(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "child stderr was not captured",
                )))
            }
        };

        // Drain incrementally so a chatty child never stalls on a full pipe,
        // and read the exit code only after end-of-stream.
        let mut diagnostics = Vec::new();
        let mut chunk = [0u8; STREAM_CHUNK_BYTES];
        let mut out = io::stdout();
        loop {
            let read = stderr.read(&mut chunk).map_err(ToolError::Diagnostics)?;
            if read == 0 {
                break;
            }
            diagnostics.extend_from_slice(&chunk[..read]);
            out.write_all(&chunk[..read])
                .and_then(|()| out.flush())
                .map_err(ToolError::Diagnostics)?;
        }
        let status = child.wait().map_err(ToolError::Wait)?;

        Ok(StreamedRun {
            success: status.success(),
            diagnostics: String::from_utf8_lossy(&diagnostics).into_owned(),
        })
    }

    fn run_inherited(&self, tool: &Path, args: &[OsString]) -> Result<bool, ToolError> {
        let status = Command::new(tool)
            .args(args)
            .status()
            .map_err(|source| ToolError::Spawn {
                tool: tool.to_path_buf(),
                source,
            })?;
        Ok(status.success())
    }

    fn run_captured(&self, tool: &Path, args: &[OsString]) -> Result<CapturedRun, ToolError> {
        let output = Command::new(tool)
            .args(args)
            .output()
            .map_err(|source| ToolError::Spawn {
                tool: tool.to_path_buf(),
                source,
            })?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CapturedRun {
            success: output.status.success(),
            combined,
        })
    }
}
