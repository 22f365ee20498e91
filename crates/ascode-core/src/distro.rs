use crate::arch::ArchitectureView;
use crate::image_type::ImageType;
use crate::CoreError;
use ascode_runtime::{ManifestTool, MppTool};
use ascode_schema::{load_definition, ArchName, DistroName, DEFINITION_SUFFIX};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Where a distribution lives on disk: `<base_dir>/<name>/`.
///
/// Image types loaded as part of a distribution hold a shared reference to
/// this so they can find their manifest template and sibling includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroLocation {
    base_dir: PathBuf,
    name: DistroName,
}

impl DistroLocation {
    pub fn new(base_dir: impl Into<PathBuf>, name: impl Into<DistroName>) -> Self {
        Self {
            base_dir: base_dir.into(),
            name: name.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn name(&self) -> &DistroName {
        &self.name
    }

    pub fn dir(&self) -> PathBuf {
        self.base_dir.join(self.name.as_str())
    }
}

/// All image types declared under one distribution directory.
#[derive(Debug, Clone)]
pub struct Distribution {
    location: Arc<DistroLocation>,
    image_types: Vec<ImageType>,
}

impl Distribution {
    /// Load every `*.imgdef.yaml` under `<base_dir>/<name>/`, binding image
    /// types to the `osbuild-mpp` tool.
    pub fn load(base_dir: impl Into<PathBuf>, name: &str) -> Result<Self, CoreError> {
        Self::load_with_tool(base_dir, name, Arc::new(MppTool::new()))
    }

    /// Like [`Distribution::load`], with image types bound to `tool`.
    ///
    /// Fails on the first definition that cannot be loaded; a distribution is
    /// never returned partially populated.
    pub fn load_with_tool(
        base_dir: impl Into<PathBuf>,
        name: &str,
        tool: Arc<dyn ManifestTool>,
    ) -> Result<Self, CoreError> {
        let location = Arc::new(DistroLocation::new(base_dir, name));
        let dir = location.dir();
        info!("loading distribution {} from {}", name, dir.display());

        let paths = find_definitions(&dir)?;
        if paths.is_empty() {
            return Err(CoreError::NoDefinitionsFound(dir));
        }

        let mut image_types: Vec<ImageType> = Vec::with_capacity(paths.len());
        for path in paths {
            let definition = load_definition(&path)?;
            if image_types.iter().any(|it| {
                it.name() == definition.name.as_str()
                    && it.arch_name() == definition.architecture.as_str()
            }) {
                return Err(CoreError::DuplicateImageType {
                    arch: definition.architecture.into_inner(),
                    name: definition.name.into_inner(),
                    path,
                });
            }
            debug!(
                "loaded image type {}/{} from {}",
                definition.architecture,
                definition.name,
                path.display()
            );
            image_types.push(ImageType::new(
                definition,
                Some(Arc::clone(&location)),
                Arc::clone(&tool),
            ));
        }

        Ok(Self {
            location,
            image_types,
        })
    }

    pub fn name(&self) -> &str {
        self.location.name()
    }

    pub fn location(&self) -> &DistroLocation {
        &self.location
    }

    pub fn dir(&self) -> PathBuf {
        self.location.dir()
    }

    /// Release version, taken as the suffix after the last `-` of the name.
    pub fn releasever(&self) -> &str {
        let name = self.name();
        name.rsplit_once('-').map_or(name, |(_, version)| version)
    }

    /// Architecture labels across all image types, deduplicated, in
    /// first-seen order.
    pub fn list_architectures(&self) -> Vec<ArchName> {
        let mut arches: Vec<ArchName> = Vec::new();
        for it in &self.image_types {
            if !arches.iter().any(|a| a == it.arch_name()) {
                arches.push(ArchName::new(it.arch_name()));
            }
        }
        arches
    }

    /// View of the image types for `arch`. Unknown architectures yield an
    /// empty view.
    pub fn get_architecture<'a>(&'a self, arch: &'a str) -> ArchitectureView<'a> {
        ArchitectureView::new(arch, self)
    }

    pub fn image_types(&self) -> &[ImageType] {
        &self.image_types
    }
}

/// Definition files directly inside `dir`, sorted by file name.
/// A missing directory has no definitions.
fn find_definitions(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let unreadable = |source| CoreError::DistroDirUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(unreadable(e)),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(unreadable)?.path();
        let is_definition = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(DEFINITION_SUFFIX));
        if is_definition && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
