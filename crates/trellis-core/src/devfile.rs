use crate::CoreError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use trellis_devfile::{parse_devfile, DevfileObj, SchemaRegistry};

/// Result of checking a devfile against its version's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevfileReport {
    pub path: PathBuf,
    pub version: String,
    pub name: String,
}

/// Files produced by a devfile conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevfileOutputs {
    pub json: PathBuf,
    pub yaml: PathBuf,
}

fn report(path: &Path, obj: &DevfileObj) -> DevfileReport {
    let version = obj.data().version();
    DevfileReport {
        path: path.to_path_buf(),
        version: version.to_string(),
        name: obj.data().name().to_owned(),
    }
}

pub fn validate_devfile(registry: &SchemaRegistry, path: &Path) -> Result<DevfileReport, CoreError> {
    let obj = parse_devfile(registry, path)?;
    Ok(report(path, &obj))
}

/// Validate `path` and write it back as `devfile.json` and `devfile.yaml`,
/// next to the source or into `target_dir`.
pub fn convert_devfile(
    registry: &SchemaRegistry,
    path: &Path,
    target_dir: Option<&Path>,
) -> Result<DevfileOutputs, CoreError> {
    let mut obj = parse_devfile(registry, path)?;
    if let Some(dir) = target_dir {
        obj = DevfileObj::new(dir, obj.data().clone());
    }
    let outputs = DevfileOutputs {
        json: obj.write_json()?,
        yaml: obj.write_yaml()?,
    };
    info!(
        "converted devfile {} into {}",
        path.display(),
        obj.working_dir().display()
    );
    Ok(outputs)
}
