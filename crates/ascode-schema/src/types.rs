//! Newtype wrappers for the identifiers that key the distro lookup chain.
//!
//! All newtypes serialize/deserialize as plain strings so definition files
//! stay free-form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Directory name of a distribution under the definitions root, e.g. `fedorang-39`.
    DistroName
);

string_newtype!(
    /// CPU architecture label, e.g. `x86_64` or `aarch64`.
    ArchName
);

string_newtype!(
    /// Image type name, unique per architecture within a distribution.
    ImageTypeName
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtypes_compare_against_str() {
        let arch = ArchName::new("x86_64");
        assert_eq!(arch, "x86_64");
        assert_eq!(arch.as_str(), "x86_64");
        assert_eq!(arch.to_string(), "x86_64");
    }

    #[test]
    fn newtypes_serialize_transparently() {
        let name = ImageTypeName::new("disk");
        let yaml = serde_yaml::to_string(&name).unwrap();
        assert_eq!(yaml.trim(), "disk");
        let back: ImageTypeName = serde_yaml::from_str("disk").unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn default_is_empty() {
        assert!(DistroName::default().is_empty());
    }
}
