//! Execution layer for ascode manifest synthesis.
//!
//! This crate wraps everything that touches the outside world during
//! synthesis: the pluggable `ManifestTool` trait with the real `osbuild-mpp`
//! implementation and an in-process mock, the scoped `ScratchDir` that holds
//! the customization overlay, and prerequisite checks for the tool binary.

pub mod mock;
pub mod mpp;
pub mod prereq;
pub mod tool;
pub mod workspace;

pub use mock::{MockOutcome, MockTool, RecordedInvocation};
pub use mpp::{MppTool, DEFAULT_MPP_BINARY, STDOUT_SENTINEL};
pub use prereq::{check_tool_prereqs, format_missing, MissingPrereq};
pub use tool::{select_tool, ManifestTool, ToolInvocation};
pub use workspace::ScratchDir;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{context}: {source}")]
    TempResource {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not run {tool}: {failure}\nstdout: {stdout}")]
    ExternalTool {
        tool: String,
        #[source]
        failure: ToolFailure,
        /// Whatever the tool printed before failing.
        stdout: String,
    },
    #[error("manifest tool backend '{0}' is not available")]
    ToolUnavailable(String),
    #[error("internal runtime error: {0}")]
    Internal(String),
}

/// Why an external tool invocation did not produce a manifest.
#[derive(Debug, Error)]
pub enum ToolFailure {
    #[error("failed to spawn: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("{0}")]
    Exit(String),
}
