use crate::assemble::{assemble_bootstrap, assemble_init, preflight};
use crate::params::{BootstrapParameters, InitParameters};
use crate::writer::{write_manifests, write_manifests_to_path, WriteSummary};
use crate::CoreError;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

pub const PIPELINES_FILE: &str = "pipelines.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub summary: WriteSummary,
}

/// Complete, validate, assemble, and write a bootstrap set to `sink`.
pub fn run_bootstrap<W: Write>(
    mut params: BootstrapParameters,
    sink: &mut W,
) -> Result<WriteSummary, CoreError> {
    params.complete();
    params.validate()?;
    let set = assemble_bootstrap(&params)?;
    let summary = write_manifests(set, sink)?;
    info!(
        "bootstrap produced {} manifests (digest {})",
        summary.manifests, summary.digest
    );
    Ok(summary)
}

/// Complete, validate, check, assemble, and write `<output>/pipelines.yaml`.
pub fn run_init(mut params: InitParameters) -> Result<InitOutcome, CoreError> {
    params.complete();
    params.validate()?;
    if params.skip_checks {
        debug!("skipping pre-flight checks");
    } else {
        preflight(&params)?;
    }

    let set = assemble_init(&params)?;
    let path = params.output.join(PIPELINES_FILE);
    let summary = write_manifests_to_path(set, &path)?;
    info!(
        "init wrote {} manifests to {}",
        summary.manifests,
        path.display()
    );
    Ok(InitOutcome { path, summary })
}
