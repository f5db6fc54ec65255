use super::{describe, json_pretty, EXIT_SUCCESS};
use trellis_core::{catalog_set, write_manifests};
use trellis_manifest::ManifestDescriptor;

pub fn run(json: bool) -> Result<u8, String> {
    let set = catalog_set().map_err(|e| describe(&e))?;
    if json {
        let bindings: Vec<&ManifestDescriptor> = set.iter().collect();
        println!("{}", json_pretty(&bindings)?);
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write_manifests(set, &mut out).map_err(|e| describe(&e))?;
    }
    Ok(EXIT_SUCCESS)
}
