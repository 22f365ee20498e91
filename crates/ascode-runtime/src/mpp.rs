use crate::tool::{ManifestTool, ToolInvocation};
use crate::{RuntimeError, ToolFailure};
use std::process::{Command, Stdio};
use tracing::{debug, info};

pub const DEFAULT_MPP_BINARY: &str = "osbuild-mpp";

/// Output path argument that makes `osbuild-mpp` write to standard output.
pub const STDOUT_SENTINEL: &str = "-";

/// Runs the `osbuild-mpp` manifest preprocessor as a child process.
#[derive(Debug, Clone)]
pub struct MppTool {
    binary: String,
}

impl Default for MppTool {
    fn default() -> Self {
        Self::with_binary(DEFAULT_MPP_BINARY)
    }
}

impl MppTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_owned(),
        }
    }

    /// `<binary> -I <dir>... <template> -`
    pub fn command(&self, invocation: &ToolInvocation) -> Command {
        let mut cmd = Command::new(&self.binary);
        for dir in &invocation.include_dirs {
            cmd.arg("-I").arg(dir);
        }
        cmd.arg(&invocation.template).arg(STDOUT_SENTINEL);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl ManifestTool for MppTool {
    fn name(&self) -> &str {
        &self.binary
    }

    fn available(&self) -> bool {
        crate::prereq::check_tool_prereqs(&self.binary).is_empty()
    }

    fn run(&self, invocation: &ToolInvocation) -> Result<Vec<u8>, RuntimeError> {
        let mut cmd = self.command(invocation);
        info!(
            "running {} on {}",
            self.binary,
            invocation.template.display()
        );
        debug!("command: {cmd:?}");

        let output = cmd.output().map_err(|e| RuntimeError::ExternalTool {
            tool: self.binary.clone(),
            failure: ToolFailure::Spawn(e),
            stdout: String::new(),
        })?;

        if !output.status.success() {
            return Err(RuntimeError::ExternalTool {
                tool: self.binary.clone(),
                failure: ToolFailure::Exit(output.status.to_string()),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            });
        }

        debug!("{} produced {} bytes", self.binary, output.stdout.len());
        Ok(output.stdout)
    }
}
