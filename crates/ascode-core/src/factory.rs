use crate::config::AscodeConfig;
use crate::distro::Distribution;
use crate::CoreError;
use ascode_runtime::{select_tool, ManifestTool, MppTool};
use ascode_schema::DistroName;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Looks up distributions by directory name under a definitions root.
///
/// Nothing is cached: every lookup re-reads the directory and loads the
/// distribution from scratch.
#[derive(Clone)]
pub struct DistroFactory {
    base_dir: PathBuf,
    tool: Arc<dyn ManifestTool>,
}

impl std::fmt::Debug for DistroFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistroFactory")
            .field("base_dir", &self.base_dir)
            .field("tool", &self.tool.name())
            .finish()
    }
}

impl DistroFactory {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            tool: Arc::new(MppTool::new()),
        }
    }

    pub fn from_config(config: &AscodeConfig) -> Result<Self, CoreError> {
        let tool = select_tool(&config.tool.backend, &config.tool.binary)?;
        Ok(Self::new(&config.defs_dir).with_tool(tool))
    }

    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn ManifestTool>) -> Self {
        self.tool = tool;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn tool(&self) -> &dyn ManifestTool {
        self.tool.as_ref()
    }

    /// Load the distribution whose directory is named `id`.
    ///
    /// Returns `Ok(None)` when no such directory exists. An unreadable root
    /// or a distribution that fails to load is an error.
    pub fn by_name(&self, id: &str) -> Result<Option<Distribution>, CoreError> {
        for name in self.list()? {
            if name == id {
                debug!("found distribution {id} under {}", self.base_dir.display());
                return Distribution::load_with_tool(&self.base_dir, id, Arc::clone(&self.tool))
                    .map(Some);
            }
        }
        debug!("no distribution {id} under {}", self.base_dir.display());
        Ok(None)
    }

    /// Names of all distribution directories, sorted.
    pub fn list(&self) -> Result<Vec<DistroName>, CoreError> {
        let unreadable = |source| CoreError::DistroDirUnreadable {
            path: self.base_dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            if !entry.file_type().map_err(unreadable)?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(DistroName::new(name));
            }
        }
        names.sort();
        Ok(names)
    }
}
