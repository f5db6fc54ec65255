use crate::CoreError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use trellis_manifest::{Secret, SecretKind};

pub const CREDENTIALS_DIR_ENV: &str = "TRELLIS_CREDENTIALS_DIR";
pub const TOKEN_FILE: &str = "token";

/// Conventional locations of the credential files a bootstrap consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
    dir: PathBuf,
}

impl CredentialPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The OAuth/webhook token file.
    pub fn token(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    /// The registry auth document downloaded for `registry_user`.
    pub fn registry_auth(&self, registry_user: &str) -> PathBuf {
        self.dir.join(format!("{registry_user}-auth.json"))
    }
}

/// `$TRELLIS_CREDENTIALS_DIR`, falling back to `~/Downloads`.
pub fn default_credentials_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CREDENTIALS_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    std::env::var("HOME").map_or_else(
        |_| PathBuf::from("Downloads"),
        |home| PathBuf::from(home).join("Downloads"),
    )
}

/// Read the credential file at `source` into a Secret of the given kind.
///
/// The file handle lives only for the duration of the read. A registry auth
/// document must be valid JSON; its bytes are still stored unmodified.
pub fn materialize(kind: SecretKind, name: &str, source: &Path) -> Result<Secret, CoreError> {
    let content = read_credential(source)?;
    if kind == SecretKind::DockerConfigJson {
        serde_json::from_slice::<serde_json::Value>(&content).map_err(|e| {
            CoreError::Marshal {
                name: name.to_owned(),
                reason: format!("{} is not a JSON document: {e}", source.display()),
            }
        })?;
    }
    debug!(
        "materialized secret {name} from {} ({} bytes)",
        source.display(),
        content.len()
    );
    Ok(Secret::new(kind, name, content))
}

fn read_credential(path: &Path) -> Result<Vec<u8>, CoreError> {
    let mut file = File::open(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            CoreError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(content)
}
