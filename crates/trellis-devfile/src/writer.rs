use crate::versions::DevfileData;
use crate::DevfileError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const OUTPUT_DEVFILE_JSON_PATH: &str = "devfile.json";
pub const OUTPUT_DEVFILE_YAML_PATH: &str = "devfile.yaml";

/// A validated devfile bound to the directory it is written back into.
#[derive(Debug, Clone, PartialEq)]
pub struct DevfileObj {
    working_dir: PathBuf,
    data: DevfileData,
}

impl DevfileObj {
    pub fn new(working_dir: impl Into<PathBuf>, data: DevfileData) -> Self {
        Self {
            working_dir: working_dir.into(),
            data,
        }
    }

    pub fn data(&self) -> &DevfileData {
        &self.data
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Write `devfile.json`, indented by two spaces.
    pub fn write_json(&self) -> Result<PathBuf, DevfileError> {
        let json = serde_json::to_vec_pretty(&self.data).map_err(|e| DevfileError::Marshal {
            format: "json",
            reason: e.to_string(),
        })?;
        let dest = self.working_dir.join(OUTPUT_DEVFILE_JSON_PATH);
        write_atomic(&dest, &json)?;
        debug!("devfile json created at: '{}'", dest.display());
        Ok(dest)
    }

    pub fn write_yaml(&self) -> Result<PathBuf, DevfileError> {
        let yaml = serde_yaml::to_string(&self.data).map_err(|e| DevfileError::Marshal {
            format: "yaml",
            reason: e.to_string(),
        })?;
        let dest = self.working_dir.join(OUTPUT_DEVFILE_YAML_PATH);
        write_atomic(&dest, yaml.as_bytes())?;
        debug!("devfile yaml created at: '{}'", dest.display());
        Ok(dest)
    }
}

fn write_atomic(dest: &Path, content: &[u8]) -> Result<(), DevfileError> {
    let write_err = |source: std::io::Error| DevfileError::Write {
        path: dest.to_path_buf(),
        source,
    };
    let dir = dest
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(content).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(dest).map_err(|e| write_err(e.error))?;
    Ok(())
}
