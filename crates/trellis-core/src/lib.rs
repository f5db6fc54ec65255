//! Bootstrap orchestration for Trellis.
//!
//! This crate ties the manifest builders to the outside world: it reads local
//! credential files into Secrets (`secrets`), validates and normalizes the
//! parameters of a bootstrap or init run (`params`), decides which manifests
//! to build and in what order (`assemble`), and renders the resulting
//! `ManifestSet` as a `---`-separated YAML stream (`writer`). `devfile` wraps
//! devfile validation and conversion for the command line.

pub mod assemble;
pub mod devfile;
pub mod init;
pub mod params;
pub mod secrets;
pub mod writer;

pub use assemble::{assemble_bootstrap, assemble_init, catalog_set, cicd_namespace, preflight};
pub use devfile::{convert_devfile, validate_devfile, DevfileOutputs, DevfileReport};
pub use init::{run_bootstrap, run_init, InitOutcome, PIPELINES_FILE};
pub use params::{normalize_prefix, BootstrapParameters, InitParameters};
pub use secrets::{default_credentials_dir, materialize, CredentialPaths};
pub use writer::{render, write_manifests, write_manifests_to_path, WriteSummary};

use std::path::PathBuf;
use thiserror::Error;
use trellis_devfile::DevfileError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("repo must be org/repo: {0}")]
    InvalidRepoFormat(String),
    #[error("flag --{0} is required to initialize application")]
    MissingParameter(String),
    #[error("credential file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to marshal {name}: {reason}")]
    Marshal { name: String, reason: String },
    #[error("manifest error: {0}")]
    Manifest(#[from] trellis_manifest::ManifestError),
    #[error(transparent)]
    Devfile(#[from] DevfileError),
    #[error("invalid parameter file {}: {reason}", .path.display())]
    Params { path: PathBuf, reason: String },
    #[error("pre-flight check failed: {0}")]
    Preflight(String),
    #[error("failed to write manifests: {0}")]
    Write(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the error stems from user input (flags, parameter files,
    /// devfile contents) rather than the environment.
    pub fn is_parameter_error(&self) -> bool {
        match self {
            Self::InvalidRepoFormat(_)
            | Self::MissingParameter(_)
            | Self::Params { .. }
            | Self::Preflight(_) => true,
            Self::Devfile(e) => matches!(
                e,
                DevfileError::Parse(_)
                    | DevfileError::MissingApiVersion
                    | DevfileError::UnsupportedVersion(_)
                    | DevfileError::Validation { .. }
            ),
            _ => false,
        }
    }

    pub fn is_io_error(&self) -> bool {
        match self {
            Self::FileNotFound { .. } | Self::Io { .. } | Self::Write(_) => true,
            Self::Devfile(e) => matches!(e, DevfileError::Io(_) | DevfileError::Write { .. }),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_repo_message_names_value() {
        let e = CoreError::InvalidRepoFormat("org_repo".to_owned());
        assert_eq!(e.to_string(), "repo must be org/repo: org_repo");
    }

    #[test]
    fn missing_parameter_message_names_flag() {
        let e = CoreError::MissingParameter("app-git-repo".to_owned());
        assert!(e.to_string().contains("--app-git-repo"));
    }

    #[test]
    fn parameter_errors_are_classified() {
        assert!(CoreError::MissingParameter("env-name".to_owned()).is_parameter_error());
        assert!(!CoreError::FileNotFound {
            path: PathBuf::from("/nope")
        }
        .is_parameter_error());
        assert!(CoreError::Devfile(DevfileError::MissingApiVersion).is_parameter_error());
    }

    #[test]
    fn io_errors_are_classified() {
        assert!(CoreError::FileNotFound {
            path: PathBuf::from("/nope")
        }
        .is_io_error());
        assert!(!CoreError::InvalidRepoFormat("x".to_owned()).is_io_error());
        assert!(!CoreError::Marshal {
            name: "regcred".to_owned(),
            reason: "bad".to_owned()
        }
        .is_io_error());
    }
}
