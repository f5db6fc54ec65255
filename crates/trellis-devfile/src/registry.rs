use crate::versions::DevfileVersion;
use crate::DevfileError;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::fmt;

/// A supported version's JSON schema, compiled once.
pub struct SchemaDocument {
    version: DevfileVersion,
    compiled: JSONSchema,
}

impl fmt::Debug for SchemaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDocument")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl SchemaDocument {
    fn compile(version: DevfileVersion) -> Result<Self, DevfileError> {
        let schema_error = |reason: String| DevfileError::Schema {
            version: version.to_string(),
            reason,
        };
        let value: Value = serde_json::from_str(version.schema_source())
            .map_err(|e| schema_error(format!("invalid schema JSON: {e}")))?;
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&value)
            .map_err(|e| schema_error(e.to_string()))?;
        Ok(Self { version, compiled })
    }

    pub fn version(&self) -> DevfileVersion {
        self.version
    }

    pub fn validate(&self, document: &Value) -> ValidationResult {
        match self.compiled.validate(document) {
            Ok(()) => ValidationResult::default(),
            Err(errors) => ValidationResult {
                violations: errors
                    .map(|error| {
                        let path = error.instance_path.to_string();
                        if path.is_empty() {
                            format!("(root): {error}")
                        } else {
                            format!("{path}: {error}")
                        }
                    })
                    .collect(),
            },
        }
    }
}

/// Outcome of validating one document: valid, or an ordered list of
/// human-readable violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn into_result(self) -> Result<(), DevfileError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DevfileError::Validation {
                violations: self.violations,
            })
        }
    }
}

/// Validate `document` against `schema`.
pub fn validate(document: &Value, schema: &SchemaDocument) -> ValidationResult {
    schema.validate(document)
}

/// Immutable map from supported devfile version to its compiled schema.
///
/// Build one at startup and share it by reference.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDocument>,
}

impl SchemaRegistry {
    pub fn new() -> Result<Self, DevfileError> {
        let schemas = DevfileVersion::SUPPORTED
            .iter()
            .map(|v| SchemaDocument::compile(*v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { schemas })
    }

    pub fn resolve_schema(&self, version_tag: &str) -> Result<&SchemaDocument, DevfileError> {
        let version: DevfileVersion = version_tag.parse()?;
        self.resolve(version)
            .ok_or_else(|| DevfileError::UnsupportedVersion(version_tag.to_owned()))
    }

    pub fn resolve(&self, version: DevfileVersion) -> Option<&SchemaDocument> {
        self.schemas.iter().find(|s| s.version == version)
    }

    pub fn supported_versions(&self) -> Vec<DevfileVersion> {
        self.schemas.iter().map(SchemaDocument::version).collect()
    }
}
