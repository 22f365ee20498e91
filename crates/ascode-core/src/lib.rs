//! Distro-as-code core for ascode.
//!
//! This crate ties the schema and runtime layers into the lookup chain the
//! wider build system consumes: `DistroFactory` discovers distribution
//! directories, `Distribution` loads every image type definition under one of
//! them, `ArchitectureView` filters by CPU architecture, `ImageType` exposes a
//! definition's metadata, and `ManifestSynthesizer` binds a blueprint to an
//! image type and produces the final manifest through the external tool.

pub mod arch;
pub mod config;
pub mod distro;
pub mod factory;
pub mod image_type;
pub mod lifecycle;
pub mod manifest;

pub use arch::ArchitectureView;
pub use config::{AscodeConfig, ToolConfig};
pub use distro::{DistroLocation, Distribution};
pub use factory::DistroFactory;
pub use image_type::ImageType;
pub use lifecycle::{validate_transition, ManifestPhase};
pub use manifest::{ManifestResult, ManifestSynthesizer};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("definition error: {0}")]
    Definition(#[from] ascode_schema::DefinitionError),
    #[error("runtime error: {0}")]
    Runtime(#[from] ascode_runtime::RuntimeError),
    #[error("no image type definitions found in {}", .0.display())]
    NoDefinitionsFound(PathBuf),
    #[error("image type '{name}' not found for architecture '{arch}'")]
    ImageTypeNotFound { arch: String, name: String },
    #[error("duplicate image type '{name}' for architecture '{arch}' in {}", path.display())]
    DuplicateImageType {
        arch: String,
        name: String,
        path: PathBuf,
    },
    #[error("cannot read distribution directory {}: {source}", path.display())]
    DistroDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{source} (scratch cleanup also failed: {cleanup})")]
    CleanupAfterFailure {
        #[source]
        source: Box<CoreError>,
        cleanup: ascode_runtime::RuntimeError,
    },
}
