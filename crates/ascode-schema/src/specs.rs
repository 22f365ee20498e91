//! Build-system contract types that cross the synthesis boundary.
//!
//! Dependency, container and ostree resolution happen outside this workspace.
//! These records exist so the manifest interface keeps the shape the wider
//! build system expects; nothing here is interpreted by ascode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ImageOptions {
    /// Requested image size in bytes, zero for the image type default.
    /// Synthesis does not read it; resolve it with `ImageType::size`.
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RepoConfig {
    pub name: String,
    #[serde(default)]
    pub base_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PackageSet {
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub repositories: Vec<RepoConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
    pub checksum: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContainerSourceSpec {
    pub source: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContainerSpec {
    pub source: String,
    pub digest: String,
    #[serde(default)]
    pub local_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct OstreeSourceSpec {
    pub url: String,
    pub reference: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct OstreeCommitSpec {
    pub reference: String,
    pub url: String,
    pub checksum: String,
}

/// Resolved inputs keyed by pipeline name, as handed to `serialize`.
pub type PipelineMap<T> = BTreeMap<String, Vec<T>>;
