//! Devfile schema registry, parsing, and persistence for Trellis.
//!
//! Supported devfile API versions form a closed set (`DevfileVersion`). Each
//! version carries its JSON schema and a strongly-typed document
//! (`DevfileData`). `SchemaRegistry` compiles every schema once and is passed by
//! reference to the parser, which validates raw YAML/JSON documents before
//! decoding them. `DevfileObj` writes a parsed devfile back out as
//! `devfile.json` and `devfile.yaml`.

pub mod parser;
pub mod registry;
pub mod v100;
pub mod versions;
pub mod writer;

pub use parser::{parse_devfile, parse_devfile_str};
pub use registry::{validate, SchemaDocument, SchemaRegistry, ValidationResult};
pub use versions::{DevfileData, DevfileVersion};
pub use writer::{DevfileObj, OUTPUT_DEVFILE_JSON_PATH, OUTPUT_DEVFILE_YAML_PATH};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevfileError {
    #[error("failed to read devfile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse devfile: {0}")]
    Parse(String),
    #[error("devfile has no apiVersion")]
    MissingApiVersion,
    #[error("unsupported devfile apiVersion '{0}'")]
    UnsupportedVersion(String),
    #[error("failed to compile devfile schema {version}: {reason}")]
    Schema { version: String, reason: String },
    #[error("invalid devfile schema. errors:\n{}", format_violations(.violations))]
    Validation { violations: Vec<String> },
    #[error("failed to marshal devfile object into {format}: {reason}")]
    Marshal { format: &'static str, reason: String },
    #[error("failed to create devfile file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn format_violations(violations: &[String]) -> String {
    violations
        .iter()
        .map(|v| format!("- {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
