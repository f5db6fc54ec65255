use super::{describe, json_pretty, ok_mark, EXIT_SUCCESS};
use clap::Subcommand;
use std::path::PathBuf;
use tracing::debug;
use trellis_core::{convert_devfile, validate_devfile};
use trellis_devfile::SchemaRegistry;

#[derive(Debug, Subcommand)]
pub enum DevfileCommand {
    /// Validate a devfile against the schema of its apiVersion.
    Validate {
        /// Path to a YAML or JSON devfile.
        file: PathBuf,
    },
    /// Validate a devfile and write it back as devfile.json and devfile.yaml.
    Convert {
        /// Path to a YAML or JSON devfile.
        file: PathBuf,
        /// Output directory [default: the devfile's directory].
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

pub fn run(command: DevfileCommand, json: bool) -> Result<u8, String> {
    let registry = SchemaRegistry::new().map_err(|e| e.to_string())?;
    debug!(
        "devfile schemas loaded for versions {:?}",
        registry.supported_versions()
    );
    match command {
        DevfileCommand::Validate { file } => {
            let report = validate_devfile(&registry, &file).map_err(|e| describe(&e))?;
            if json {
                println!("{}", json_pretty(&report)?);
            } else {
                println!(
                    "{} {} is a valid {} devfile ({})",
                    ok_mark(),
                    report.path.display(),
                    report.version,
                    report.name
                );
            }
        }
        DevfileCommand::Convert { file, dir } => {
            let outputs =
                convert_devfile(&registry, &file, dir.as_deref()).map_err(|e| describe(&e))?;
            if json {
                println!("{}", json_pretty(&outputs)?);
            } else {
                println!("{} wrote {}", ok_mark(), outputs.json.display());
                println!("{} wrote {}", ok_mark(), outputs.yaml.display());
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
