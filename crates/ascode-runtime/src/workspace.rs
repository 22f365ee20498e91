use crate::RuntimeError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Private temporary directory scoped to one manifest synthesis.
///
/// Call [`ScratchDir::close`] to remove it and observe removal errors. If the
/// value is dropped instead, removal still happens and failures are logged.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    pub fn create() -> Result<Self, RuntimeError> {
        let dir = tempfile::Builder::new()
            .prefix("ascode-")
            .tempdir()
            .map_err(|source| RuntimeError::TempResource {
                context: "could not create temporary directory".to_owned(),
                source,
            })?;
        let path = dir.path().to_path_buf();
        debug!("created scratch dir {}", path.display());
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a read-only file into the scratch directory.
    pub fn write_file(&self, name: &str, contents: &[u8]) -> Result<PathBuf, RuntimeError> {
        let target = self.path.join(name);
        fs::write(&target, contents).map_err(|source| RuntimeError::TempResource {
            context: format!("could not write {}", target.display()),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(0o444)).map_err(|source| {
                RuntimeError::TempResource {
                    context: format!("could not set permissions on {}", target.display()),
                    source,
                }
            })?;
        }

        Ok(target)
    }

    pub fn close(mut self) -> Result<(), RuntimeError> {
        match self.dir.take() {
            Some(dir) => dir.close().map_err(|source| RuntimeError::TempResource {
                context: format!("could not remove {}", self.path.display()),
                source,
            }),
            None => Ok(()),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                warn!("failed to remove scratch dir {}: {e}", self.path.display());
            }
        }
    }
}
