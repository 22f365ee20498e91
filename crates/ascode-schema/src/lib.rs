//! Declarative schema layer for ascode.
//!
//! This crate defines everything that is read from or written to disk as data:
//! image type definition files (`ImageTypeDefinition`, loaded from
//! `*.imgdef.yaml`), the closed `BootMode` enum, the minimal `Blueprint`
//! customization set, the `CustomizationOverlay` handed to the manifest
//! preprocessor, and placeholder types for the build-system contract.

pub mod blueprint;
pub mod boot;
pub mod definition;
pub mod overlay;
pub mod specs;
pub mod types;

pub use blueprint::{parse_blueprint_file, parse_blueprint_str, Blueprint, Customizations, Package};
pub use boot::BootMode;
pub use definition::{
    load_definition, parse_definition_str, ImageTypeDefinition, DEFINITION_SUFFIX,
};
pub use overlay::{CustomizationOverlay, OverlayVars, OVERLAY_FILE_NAME, OVERLAY_VERSION};
pub use specs::{
    ContainerSourceSpec, ContainerSpec, ImageOptions, OstreeCommitSpec, OstreeSourceSpec,
    PackageSet, PackageSpec, PipelineMap, RepoConfig,
};
pub use types::{ArchName, DistroName, ImageTypeName};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("definition file not found or unreadable: {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse definition {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unrecognized boot mode '{0}', expected one of: hybrid, legacy, uefi")]
    UnrecognizedBootMode(String),
    #[error("failed to read blueprint {}: {source}", path.display())]
    BlueprintIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse blueprint: {0}")]
    BlueprintParse(#[from] toml::de::Error),
    #[error("failed to serialize customization overlay: {0}")]
    OverlaySerialize(#[source] serde_yaml::Error),
}
