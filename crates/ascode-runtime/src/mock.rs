use crate::tool::{ManifestTool, ToolInvocation};
use crate::{RuntimeError, ToolFailure};
use ascode_schema::OVERLAY_FILE_NAME;
use std::path::PathBuf;
use std::sync::Mutex;

const MOCK_MANIFEST: &str = r#"{"version":"2","pipelines":[],"sources":{}}"#;

/// What the mock tool does when run.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Succeed(Vec<u8>),
    Fail { code: i32, stdout: Vec<u8> },
}

/// One observed run of the mock tool.
///
/// The overlay is captured at call time because the scratch directory it
/// lives in is gone by the time a test can look at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    pub include_dirs: Vec<PathBuf>,
    pub template: PathBuf,
    pub overlay: Option<String>,
}

pub struct MockTool {
    outcome: MockOutcome,
    calls: Mutex<Vec<RecordedInvocation>>,
}

impl Default for MockTool {
    fn default() -> Self {
        Self::with_outcome(MockOutcome::Succeed(MOCK_MANIFEST.as_bytes().to_vec()))
    }
}

impl MockTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(code: i32, stdout: &str) -> Self {
        Self::with_outcome(MockOutcome::Fail {
            code,
            stdout: stdout.as_bytes().to_vec(),
        })
    }

    pub fn calls(&self) -> Vec<RecordedInvocation> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl ManifestTool for MockTool {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn available(&self) -> bool {
        true
    }

    fn run(&self, invocation: &ToolInvocation) -> Result<Vec<u8>, RuntimeError> {
        let overlay = invocation
            .include_dirs
            .first()
            .and_then(|dir| std::fs::read_to_string(dir.join(OVERLAY_FILE_NAME)).ok());

        self.calls
            .lock()
            .map_err(|e| RuntimeError::Internal(format!("mutex poisoned: {e}")))?
            .push(RecordedInvocation {
                include_dirs: invocation.include_dirs.clone(),
                template: invocation.template.clone(),
                overlay,
            });

        match &self.outcome {
            MockOutcome::Succeed(stdout) => Ok(stdout.clone()),
            MockOutcome::Fail { code, stdout } => Err(RuntimeError::ExternalTool {
                tool: "mock".to_owned(),
                failure: ToolFailure::Exit(format!("exit status: {code}")),
                stdout: String::from_utf8_lossy(stdout).into_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_overlay_from_first_include_dir() {
        let scratch = tempfile::tempdir().unwrap();
        std::fs::write(scratch.path().join(OVERLAY_FILE_NAME), "version: '2'\n").unwrap();

        let tool = MockTool::new();
        let out = tool
            .run(&ToolInvocation {
                include_dirs: vec![scratch.path().to_path_buf(), PathBuf::from("/defs/f39")],
                template: PathBuf::from("/defs/f39/disk.mpp.yaml"),
            })
            .unwrap();
        assert_eq!(out, MOCK_MANIFEST.as_bytes());
        assert!(tool.available());

        let calls = tool.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].include_dirs.len(), 2);
        assert_eq!(calls[0].overlay.as_deref(), Some("version: '2'\n"));
    }

    #[test]
    fn failing_tool_reports_stdout() {
        let tool = MockTool::failing(1, "half a manifest");
        let err = tool
            .run(&ToolInvocation {
                include_dirs: vec![],
                template: PathBuf::from("disk.mpp.yaml"),
            })
            .unwrap_err();
        match err {
            RuntimeError::ExternalTool { stdout, .. } => assert_eq!(stdout, "half a manifest"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(tool.calls()[0].overlay, None);
    }
}
