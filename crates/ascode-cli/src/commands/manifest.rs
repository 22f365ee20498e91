use super::{json_pretty, load_distro, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use ascode_core::{CoreError, DistroFactory};
use ascode_schema::{parse_blueprint_file, Blueprint, ImageOptions, PipelineMap};
use std::io::Write;
use std::path::Path;

/// The image type a manifest is requested for.
pub struct Target<'a> {
    pub distro: &'a str,
    pub arch: &'a str,
    pub image_type: &'a str,
}

pub fn run(
    factory: &DistroFactory,
    target: &Target<'_>,
    blueprint: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> Result<u8, String> {
    let blueprint = match blueprint {
        Some(path) => parse_blueprint_file(path).map_err(|e| CoreError::from(e).to_string())?,
        None => Blueprint::default(),
    };

    let distro = load_distro(factory, target.distro)?;
    let it = distro
        .get_architecture(target.arch)
        .get_image_type(target.image_type)
        .map_err(|e| e.to_string())?;

    let (mut synth, warnings) = it.manifest(&blueprint, &ImageOptions::default(), &[], 0);
    for w in &warnings {
        eprintln!("warning: {w}");
    }

    let pb = if json { None } else { Some(spinner("synthesizing manifest...")) };
    let result = match synth.serialize(&PipelineMap::new(), &PipelineMap::new(), &PipelineMap::new())
    {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "manifest synthesized");
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "synthesis failed");
            }
            return Err(e.to_string());
        }
    };
    if let Some(cleanup) = &result.cleanup_error {
        eprintln!("warning: scratch directory not removed: {cleanup}");
    }

    match output {
        Some(path) => {
            std::fs::write(path, &result.bytes)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            if json {
                let payload = serde_json::json!({
                    "distro": distro.name(),
                    "arch": it.arch_name(),
                    "image_type": it.name(),
                    "exports": result.exports,
                    "output": path,
                    "bytes": result.bytes.len(),
                });
                println!("{}", json_pretty(&payload)?);
            } else {
                println!(
                    "wrote {} bytes to {} (exports: {})",
                    result.bytes.len(),
                    path.display(),
                    result.exports.join(", ")
                );
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&result.bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("failed to write manifest: {e}"))?;
        }
    }
    Ok(EXIT_SUCCESS)
}
