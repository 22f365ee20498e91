use crate::distro::DistroLocation;
use crate::manifest::ManifestSynthesizer;
use crate::CoreError;
use ascode_runtime::{ManifestTool, MppTool};
use ascode_schema::{
    load_definition, Blueprint, BootMode, ImageOptions, ImageTypeDefinition, RepoConfig,
};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MIB: u64 = 1024 * 1024;

/// A loaded image type definition plus the behavior the build system expects
/// from an image type.
///
/// The owning distribution is optional: image types discovered through a
/// [`crate::Distribution`] know where it lives, while ones loaded on their own
/// with [`ImageType::load`] do not.
#[derive(Clone)]
pub struct ImageType {
    definition: ImageTypeDefinition,
    distro: Option<Arc<DistroLocation>>,
    tool: Arc<dyn ManifestTool>,
}

impl fmt::Debug for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageType")
            .field("definition", &self.definition)
            .field("distro", &self.distro)
            .field("tool", &self.tool.name())
            .finish()
    }
}

impl ImageType {
    pub(crate) fn new(
        definition: ImageTypeDefinition,
        distro: Option<Arc<DistroLocation>>,
        tool: Arc<dyn ManifestTool>,
    ) -> Self {
        Self {
            definition,
            distro,
            tool,
        }
    }

    /// Load a single definition file with no owning distribution. Its
    /// manifest template path is used as written.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        Ok(Self::standalone(load_definition(path)?))
    }

    pub fn standalone(definition: ImageTypeDefinition) -> Self {
        Self::new(definition, None, Arc::new(MppTool::new()))
    }

    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn ManifestTool>) -> Self {
        self.tool = tool;
        self
    }

    pub fn definition(&self) -> &ImageTypeDefinition {
        &self.definition
    }

    pub fn distro(&self) -> Option<&DistroLocation> {
        self.distro.as_deref()
    }

    pub fn tool(&self) -> &dyn ManifestTool {
        self.tool.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn arch_name(&self) -> &str {
        &self.definition.architecture
    }

    pub fn filename(&self) -> &str {
        &self.definition.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.definition.mime_type
    }

    pub fn ostree_ref(&self) -> Option<&str> {
        self.definition.ostree_ref.as_deref()
    }

    /// Effective image size for a requested size in bytes. Zero selects the
    /// definition's default; the result is rounded up to whole MiB.
    pub fn size(&self, requested: u64) -> u64 {
        let size = if requested == 0 {
            self.definition.size
        } else {
            requested
        };
        size.div_ceil(MIB)
            .checked_mul(MIB)
            .unwrap_or(u64::MAX / MIB * MIB)
    }

    pub fn partition_type(&self) -> &str {
        &self.definition.partition_type
    }

    pub fn boot_mode(&self) -> Result<BootMode, CoreError> {
        Ok(self.definition.boot_mode.parse::<BootMode>()?)
    }

    pub fn build_pipelines(&self) -> &[String] {
        &self.definition.build_pipelines
    }

    pub fn payload_pipelines(&self) -> &[String] {
        &self.definition.payload_pipelines
    }

    /// Package sets are resolved by the manifest template, not declared here.
    pub fn payload_package_sets(&self) -> Vec<String> {
        Vec::new()
    }

    pub fn package_sets_chains(&self) -> BTreeMap<String, Vec<String>> {
        BTreeMap::new()
    }

    pub fn exports(&self) -> &[String] {
        &self.definition.exports
    }

    /// Template path handed to the tool: joined onto the distribution
    /// directory when there is one, otherwise as declared.
    pub fn template_path(&self) -> PathBuf {
        match &self.distro {
            Some(location) => location.dir().join(&self.definition.manifest),
            None => self.definition.manifest.clone(),
        }
    }

    /// Bind `blueprint` to this image type. No I/O happens until
    /// [`ManifestSynthesizer::serialize`]; the returned package source hints
    /// are always empty because dependency resolution happens elsewhere.
    pub fn manifest(
        &self,
        blueprint: &Blueprint,
        _options: &ImageOptions,
        _repos: &[RepoConfig],
        _seed: i64,
    ) -> (ManifestSynthesizer, Vec<String>) {
        (
            ManifestSynthesizer::bind(blueprint.clone(), self.clone()),
            Vec::new(),
        )
    }
}
