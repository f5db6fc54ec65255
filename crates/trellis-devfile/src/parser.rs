use crate::registry::SchemaRegistry;
use crate::writer::DevfileObj;
use crate::DevfileError;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Read, validate, and decode the devfile at `path`.
///
/// The parsed object writes back into the directory containing `path`.
pub fn parse_devfile(registry: &SchemaRegistry, path: &Path) -> Result<DevfileObj, DevfileError> {
    let raw = std::fs::read_to_string(path)?;
    let working_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    parse_devfile_str(registry, &raw, working_dir)
}

/// Validate and decode a raw YAML or JSON devfile.
pub fn parse_devfile_str(
    registry: &SchemaRegistry,
    raw: &str,
    working_dir: &Path,
) -> Result<DevfileObj, DevfileError> {
    // YAML is a superset of JSON, so one decoder covers both encodings.
    let document: Value =
        serde_yaml::from_str(raw).map_err(|e| DevfileError::Parse(e.to_string()))?;

    let api_version = document
        .get("apiVersion")
        .and_then(Value::as_str)
        .ok_or(DevfileError::MissingApiVersion)?;
    let schema = registry.resolve_schema(api_version)?;

    schema.validate(&document).into_result()?;
    debug!("validated devfile schema for apiVersion {}", schema.version());

    let data = schema.version().decode(document)?;
    Ok(DevfileObj::new(working_dir, data))
}
