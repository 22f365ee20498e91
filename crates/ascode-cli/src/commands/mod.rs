pub mod arches;
pub mod completions;
pub mod distros;
pub mod doctor;
pub mod image_types;
pub mod inspect;
pub mod manifest;

use ascode_core::{DistroFactory, Distribution};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_DEFINITION_ERROR: u8 = 2;
pub const EXIT_TOOL_ERROR: u8 = 3;

/// Map an error message to the process exit code.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("definition error:")
        || msg.starts_with("no image type definitions found")
        || msg.starts_with("duplicate image type")
    {
        EXIT_DEFINITION_ERROR
    } else if msg.starts_with("runtime error: could not run") {
        EXIT_TOOL_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn load_distro(factory: &DistroFactory, name: &str) -> Result<Distribution, String> {
    factory
        .by_name(name)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| {
            format!(
                "no distribution '{name}' under {}",
                factory.base_dir().display()
            )
        })
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn finish(pb: &ProgressBar, line: String) {
    if let Ok(style) = ProgressStyle::with_template("{msg}") {
        pb.set_style(style);
    }
    pb.finish_with_message(line);
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("✗ {msg}"));
}

pub fn colorize_boot_mode(mode: &str) -> String {
    use console::Style;
    match mode {
        "hybrid" => Style::new().cyan().apply_to(mode).to_string(),
        "uefi" => Style::new().green().apply_to(mode).to_string(),
        "legacy" => Style::new().yellow().apply_to(mode).to_string(),
        other => Style::new().red().apply_to(other).to_string(),
    }
}
