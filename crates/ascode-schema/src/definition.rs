use crate::types::{ArchName, ImageTypeName};
use crate::DefinitionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name suffix that marks a file as an image type definition.
pub const DEFINITION_SUFFIX: &str = ".imgdef.yaml";

/// One buildable output variant as declared in a `*.imgdef.yaml` file.
///
/// Unknown keys are ignored and missing keys fall back to their zero value.
/// Cross-field consistency is not checked here; `boot_mode` in particular is
/// kept as the raw label and only mapped to [`crate::BootMode`] on use.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageTypeDefinition {
    pub name: ImageTypeName,
    pub architecture: ArchName,
    pub filename: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ostree_ref: Option<String>,
    /// Default output size in bytes.
    pub size: u64,
    pub partition_type: String,
    pub boot_mode: String,
    pub build_pipelines: Vec<String>,
    pub payload_pipelines: Vec<String>,
    pub exports: Vec<String>,
    /// Manifest template, relative to the distribution directory.
    pub manifest: PathBuf,
}

pub fn parse_definition_str(input: &str) -> Result<ImageTypeDefinition, serde_yaml::Error> {
    serde_yaml::from_str(input)
}

pub fn load_definition(path: impl AsRef<Path>) -> Result<ImageTypeDefinition, DefinitionError> {
    let path = path.as_ref();
    let content = fs::read(path).map_err(|source| DefinitionError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_slice(&content).map_err(|source| DefinitionError::Schema {
        path: path.to_path_buf(),
        source,
    })
}
