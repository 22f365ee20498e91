//! The subset of an osbuild blueprint that manifest synthesis consumes.

use crate::DefinitionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Blueprint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub customizations: Option<Customizations>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// `name-version`, or just `name` when the version is unset, empty or `*`.
    pub fn spec(&self) -> String {
        match self.version.as_deref() {
            Some(version) if !version.is_empty() && version != "*" => {
                format!("{}-{version}", self.name)
            }
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Customizations {
    #[serde(default)]
    pub hostname: Option<String>,
}

impl Blueprint {
    /// Package names in blueprint order. Duplicates are kept.
    pub fn package_names(&self) -> Vec<String> {
        self.packages.iter().map(Package::spec).collect()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.customizations
            .as_ref()
            .and_then(|c| c.hostname.as_deref())
    }
}

pub fn parse_blueprint_str(input: &str) -> Result<Blueprint, DefinitionError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_blueprint_file(path: impl AsRef<Path>) -> Result<Blueprint, DefinitionError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DefinitionError::BlueprintIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_blueprint_str(&content)
}
