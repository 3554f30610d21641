#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use sweep_harness::{CapturedRun, StreamedRun, ToolError, ToolInvoker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Streaming,
    Inherited,
    Captured,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub mode: Mode,
    pub tool: PathBuf,
    pub args: Vec<OsString>,
}

/// Scripted invoker: queued results are handed out in order, and every
/// invocation is recorded. An empty queue answers with a clean success.
#[derive(Default)]
pub struct MockInvoker {
    calls: RefCell<Vec<Call>>,
    streamed: RefCell<VecDeque<StreamedRun>>,
    inherited: RefCell<VecDeque<bool>>,
    captured: RefCell<VecDeque<Result<CapturedRun, ToolError>>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_streamed(&self, success: bool, diagnostics: &str) {
        self.streamed.borrow_mut().push_back(StreamedRun {
            success,
            diagnostics: diagnostics.to_string(),
        });
    }

    pub fn push_inherited(&self, success: bool) {
        self.inherited.borrow_mut().push_back(success);
    }

    pub fn push_captured(&self, success: bool, combined: &str) {
        self.captured.borrow_mut().push_back(Ok(CapturedRun {
            success,
            combined: combined.to_string(),
        }));
    }

    pub fn push_captured_error(&self) {
        self.captured
            .borrow_mut()
            .push_back(Err(ToolError::Spawn {
                tool: PathBuf::from("scripted"),
                source: io::Error::new(io::ErrorKind::Other, "scripted failure"),
            }));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, mode: Mode, tool: &Path, args: &[OsString]) {
        self.calls.borrow_mut().push(Call {
            mode,
            tool: tool.to_path_buf(),
            args: args.to_vec(),
        });
    }
}

impl ToolInvoker for MockInvoker {
    fn run_streaming(&self, tool: &Path, args: &[OsString]) -> Result<StreamedRun, ToolError> {
        self.record(Mode::Streaming, tool, args);
        Ok(self
            .streamed
            .borrow_mut()
            .pop_front()
            .unwrap_or(StreamedRun {
                success: true,
                diagnostics: String::new(),
            }))
    }

    fn run_inherited(&self, tool: &Path, args: &[OsString]) -> Result<bool, ToolError> {
        self.record(Mode::Inherited, tool, args);
        Ok(self.inherited.borrow_mut().pop_front().unwrap_or(true))
    }

    fn run_captured(&self, tool: &Path, args: &[OsString]) -> Result<CapturedRun, ToolError> {
        self.record(Mode::Captured, tool, args);
        self.captured
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(CapturedRun {
                success: true,
                combined: String::new(),
            }))
    }
}
