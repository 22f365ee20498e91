use std::fmt;
use std::path::Path;
use std::process::Command;

/// A missing prerequisite with actionable install instructions.
#[derive(Debug)]
pub struct MissingPrereq {
    pub name: String,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

impl fmt::Display for MissingPrereq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  - {}: {} (install: {})",
            self.name, self.purpose, self.install_hint
        )
    }
}

fn command_exists(name: &str) -> bool {
    if name.contains('/') {
        return Path::new(name).is_file();
    }
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check that the manifest preprocessor binary can be found.
/// Returns a list of missing items. Empty list means all prerequisites are met.
pub fn check_tool_prereqs(binary: &str) -> Vec<MissingPrereq> {
    let mut missing = Vec::new();

    if !command_exists(binary) {
        missing.push(MissingPrereq {
            name: binary.to_owned(),
            purpose: "manifest template preprocessing",
            install_hint: "dnf install osbuild-tools | apt install osbuild | pip install osbuild",
        });
    }

    missing
}

/// Format a list of missing prerequisites into a user-friendly error message.
pub fn format_missing(missing: &[MissingPrereq]) -> String {
    use std::fmt::Write as _;
    let mut msg = String::from("missing prerequisites:\n");
    for m in missing {
        let _ = writeln!(msg, "{m}");
    }
    msg.push_str("\nascode requires these tools to synthesize manifests.");
    msg
}
