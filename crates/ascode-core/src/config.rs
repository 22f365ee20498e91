use crate::CoreError;
use ascode_runtime::DEFAULT_MPP_BINARY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_DEFS_DIR: &str = "/usr/share/ascode/defs";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AscodeConfig {
    /// Root directory holding one subdirectory per distribution.
    #[serde(default = "default_defs_dir")]
    pub defs_dir: PathBuf,
    #[serde(default)]
    pub tool: ToolConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// `osbuild-mpp` or `mock`.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for AscodeConfig {
    fn default() -> Self {
        Self {
            defs_dir: default_defs_dir(),
            tool: ToolConfig::default(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            binary: default_binary(),
        }
    }
}

fn default_defs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DEFS_DIR)
}

fn default_backend() -> String {
    "osbuild-mpp".to_owned()
}

fn default_binary() -> String {
    DEFAULT_MPP_BINARY.to_owned()
}

impl AscodeConfig {
    pub fn parse_str(input: &str) -> Result<Self, CoreError> {
        toml::from_str(input).map_err(|e| CoreError::Config(format!("invalid config: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse_str(&content)
    }

    /// Load `~/.config/ascode/config.toml`, falling back to defaults when
    /// `HOME` is unset or the file does not exist.
    pub fn load_default() -> Result<Self, CoreError> {
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/ascode/config.toml"))
}
