use super::{json_pretty, load_distro, EXIT_SUCCESS};
use ascode_core::DistroFactory;

pub fn run(factory: &DistroFactory, distro: &str, json: bool) -> Result<u8, String> {
    let distro = load_distro(factory, distro)?;
    let arches = distro.list_architectures();
    if json {
        println!("{}", json_pretty(&arches)?);
    } else {
        for arch in &arches {
            println!("{arch}");
        }
    }
    Ok(EXIT_SUCCESS)
}
