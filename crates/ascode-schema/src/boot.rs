use crate::DefinitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Firmware boot strategy an image is built for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BootMode {
    /// Both BIOS and UEFI boot paths are installed.
    Hybrid,
    Legacy,
    Uefi,
}

impl BootMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BootMode::Hybrid => "hybrid",
            BootMode::Legacy => "legacy",
            BootMode::Uefi => "uefi",
        }
    }
}

impl fmt::Display for BootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BootMode {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hybrid" => Ok(BootMode::Hybrid),
            "legacy" => Ok(BootMode::Legacy),
            "uefi" => Ok(BootMode::Uefi),
            other => Err(DefinitionError::UnrecognizedBootMode(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_labels() {
        assert_eq!("hybrid".parse::<BootMode>().unwrap(), BootMode::Hybrid);
        assert_eq!("legacy".parse::<BootMode>().unwrap(), BootMode::Legacy);
        assert_eq!("uefi".parse::<BootMode>().unwrap(), BootMode::Uefi);
    }

    #[test]
    fn rejects_unknown_label() {
        let err = "bios".parse::<BootMode>().unwrap_err();
        assert!(matches!(err, DefinitionError::UnrecognizedBootMode(ref l) if l == "bios"));
        assert!(err.to_string().contains("bios"));
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!("UEFI".parse::<BootMode>().is_err());
        assert!("".parse::<BootMode>().is_err());
    }

    #[test]
    fn display_matches_label() {
        for mode in [BootMode::Hybrid, BootMode::Legacy, BootMode::Uefi] {
            assert_eq!(mode.to_string().parse::<BootMode>().unwrap(), mode);
        }
    }
}
