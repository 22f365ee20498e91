use super::{json_pretty, load_distro, EXIT_SUCCESS};
use ascode_core::DistroFactory;

pub fn run(factory: &DistroFactory, distro: &str, arch: &str, json: bool) -> Result<u8, String> {
    let distro = load_distro(factory, distro)?;
    let view = distro.get_architecture(arch);
    if json {
        println!("{}", json_pretty(&view.list_image_types())?);
        return Ok(EXIT_SUCCESS);
    }

    let types: Vec<_> = view.image_types().collect();
    if types.is_empty() {
        println!("no image types for {arch} in {}", distro.name());
    } else {
        println!("{:<20} {:<28} EXPORTS", "NAME", "FILENAME");
        for it in types {
            println!(
                "{:<20} {:<28} {}",
                it.name(),
                it.filename(),
                it.exports().join(",")
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
