use crate::CoreError;
use std::fmt;

/// Where a [`crate::ManifestSynthesizer`] is in its one-shot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestPhase {
    /// Blueprint and image type attached, nothing executed yet.
    Bound,
    Serializing,
    Complete,
    Failed,
}

impl fmt::Display for ManifestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestPhase::Bound => write!(f, "bound"),
            ManifestPhase::Serializing => write!(f, "serializing"),
            ManifestPhase::Complete => write!(f, "complete"),
            ManifestPhase::Failed => write!(f, "failed"),
        }
    }
}

pub fn validate_transition(from: ManifestPhase, to: ManifestPhase) -> Result<(), CoreError> {
    let valid = matches!(
        (from, to),
        (ManifestPhase::Bound, ManifestPhase::Serializing)
            | (
                ManifestPhase::Serializing,
                ManifestPhase::Complete | ManifestPhase::Failed
            )
    );

    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
