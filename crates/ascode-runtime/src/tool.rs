use crate::RuntimeError;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for one manifest preprocessing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Include search path, in priority order. The first entry is always the
    /// scratch directory holding the customization overlay.
    pub include_dirs: Vec<PathBuf>,
    pub template: PathBuf,
}

/// Capability to turn a manifest template into a final manifest.
///
/// Implementations block until the manifest is produced. Standard error of
/// the underlying process, if any, is passed through to the caller's console.
pub trait ManifestTool: Send + Sync {
    fn name(&self) -> &str;

    fn available(&self) -> bool;

    /// Run the tool and return its standard output on success.
    fn run(&self, invocation: &ToolInvocation) -> Result<Vec<u8>, RuntimeError>;
}

/// Pick a tool backend by name. `binary` only applies to `osbuild-mpp`.
pub fn select_tool(backend: &str, binary: &str) -> Result<Arc<dyn ManifestTool>, RuntimeError> {
    match backend {
        "osbuild-mpp" | "mpp" => Ok(Arc::new(crate::mpp::MppTool::with_binary(binary))),
        "mock" => Ok(Arc::new(crate::mock::MockTool::new())),
        other => Err(RuntimeError::ToolUnavailable(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_valid_tools() {
        assert_eq!(select_tool("osbuild-mpp", "osbuild-mpp").unwrap().name(), "osbuild-mpp");
        assert_eq!(select_tool("mpp", "/opt/bin/mpp").unwrap().name(), "/opt/bin/mpp");
        assert_eq!(select_tool("mock", "ignored").unwrap().name(), "mock");
    }

    #[test]
    fn select_invalid_tool_fails() {
        let err = select_tool("jinja", "jinja").err().unwrap();
        assert!(matches!(err, RuntimeError::ToolUnavailable(ref n) if n == "jinja"));
    }
}
