use crate::blueprint::Blueprint;
use crate::DefinitionError;
use serde::{Deserialize, Serialize};

/// Name under which the overlay is written into the scratch include directory.
/// Manifest templates import it by this name.
pub const OVERLAY_FILE_NAME: &str = "customizations.ipp.yaml";

pub const OVERLAY_VERSION: &str = "2";

/// Per-synthesis customization variables handed to the manifest preprocessor.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CustomizationOverlay {
    pub version: String,
    #[serde(rename = "mpp-vars")]
    pub vars: OverlayVars,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct OverlayVars {
    #[serde(default)]
    pub extra_packages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl CustomizationOverlay {
    pub fn from_blueprint(bp: &Blueprint) -> Self {
        Self {
            version: OVERLAY_VERSION.to_owned(),
            vars: OverlayVars {
                extra_packages: bp.package_names(),
                hostname: bp.hostname().map(str::to_owned),
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String, DefinitionError> {
        serde_yaml::to_string(self).map_err(DefinitionError::OverlaySerialize)
    }

    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{Customizations, Package};

    fn smurf_blueprint() -> Blueprint {
        Blueprint {
            packages: vec![Package::new("0ad")],
            customizations: Some(Customizations {
                hostname: Some("smurf.machine".to_owned()),
            }),
            ..Blueprint::default()
        }
    }

    #[test]
    fn built_from_blueprint() {
        let overlay = CustomizationOverlay::from_blueprint(&smurf_blueprint());
        assert_eq!(overlay.version, "2");
        assert_eq!(overlay.vars.extra_packages, vec!["0ad"]);
        assert_eq!(overlay.vars.hostname.as_deref(), Some("smurf.machine"));
    }

    #[test]
    fn yaml_uses_mpp_vars_key() {
        let yaml = CustomizationOverlay::from_blueprint(&smurf_blueprint())
            .to_yaml()
            .unwrap();
        assert!(yaml.contains("mpp-vars:"), "{yaml}");
        assert!(yaml.contains("extra_packages:"), "{yaml}");
        assert!(yaml.contains("hostname: smurf.machine"), "{yaml}");
        assert!(yaml.contains("version: '2'") || yaml.contains("version: \"2\""), "{yaml}");
    }

    #[test]
    fn reparse_yields_same_values() {
        let overlay = CustomizationOverlay::from_blueprint(&smurf_blueprint());
        let back = CustomizationOverlay::from_yaml(&overlay.to_yaml().unwrap()).unwrap();
        assert_eq!(back, overlay);
    }

    #[test]
    fn versioned_package_reaches_overlay() {
        let bp = Blueprint {
            packages: vec![Package {
                name: "tmux".to_owned(),
                version: Some("3.3a".to_owned()),
            }],
            ..Blueprint::default()
        };
        let overlay = CustomizationOverlay::from_blueprint(&bp);
        assert_eq!(overlay.vars.extra_packages, vec!["tmux-3.3a"]);
    }

    #[test]
    fn hostname_omitted_when_unset() {
        let overlay = CustomizationOverlay::from_blueprint(&Blueprint::default());
        let yaml = overlay.to_yaml().unwrap();
        assert!(!yaml.contains("hostname"), "{yaml}");
        assert!(overlay.vars.extra_packages.is_empty());
    }
}
