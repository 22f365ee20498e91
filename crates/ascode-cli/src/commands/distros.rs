use super::{json_pretty, EXIT_SUCCESS};
use ascode_core::DistroFactory;

pub fn run(factory: &DistroFactory, json: bool) -> Result<u8, String> {
    let names = factory.list().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&names)?);
    } else if names.is_empty() {
        println!("no distributions under {}", factory.base_dir().display());
    } else {
        for name in &names {
            println!("{name}");
        }
    }
    Ok(EXIT_SUCCESS)
}
