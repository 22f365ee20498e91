use super::{colorize_boot_mode, json_pretty, load_distro, EXIT_SUCCESS};
use ascode_core::DistroFactory;

pub fn run(
    factory: &DistroFactory,
    distro: &str,
    arch: &str,
    image_type: &str,
    json: bool,
) -> Result<u8, String> {
    let distro = load_distro(factory, distro)?;
    let it = distro
        .get_architecture(arch)
        .get_image_type(image_type)
        .map_err(|e| e.to_string())?;
    let boot_mode = it.boot_mode().map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "distro": distro.name(),
            "releasever": distro.releasever(),
            "name": it.name(),
            "arch": it.arch_name(),
            "filename": it.filename(),
            "mime_type": it.mime_type(),
            "ostree_ref": it.ostree_ref(),
            "size": it.size(0),
            "partition_type": it.partition_type(),
            "boot_mode": boot_mode,
            "build_pipelines": it.build_pipelines(),
            "payload_pipelines": it.payload_pipelines(),
            "exports": it.exports(),
            "template": it.template_path(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("distro:            {} (releasever {})", distro.name(), distro.releasever());
        println!("name:              {}", it.name());
        println!("arch:              {}", it.arch_name());
        println!("filename:          {}", it.filename());
        println!("mime_type:         {}", it.mime_type());
        println!("ostree_ref:        {}", it.ostree_ref().unwrap_or("(none)"));
        println!("size:              {}", it.size(0));
        println!("partition_type:    {}", it.partition_type());
        println!("boot_mode:         {}", colorize_boot_mode(boot_mode.as_str()));
        println!("build_pipelines:   {}", it.build_pipelines().join(", "));
        println!("payload_pipelines: {}", it.payload_pipelines().join(", "));
        println!("exports:           {}", it.exports().join(", "));
        println!("template:          {}", it.template_path().display());
    }
    Ok(EXIT_SUCCESS)
}
