use super::{describe, expand_tilde, json_pretty, EXIT_SUCCESS};
use clap::Args;
use std::path::PathBuf;
use trellis_core::{run_bootstrap, BootstrapParameters, CoreError};

#[derive(Debug, Args)]
pub struct BootstrapArgs {
    /// Image registry user; selects `<user>-auth.json` in the credentials directory.
    #[arg(long)]
    pub registry_user: Option<String>,
    /// Repository the event listener watches (org/repo or clone URL).
    #[arg(long)]
    pub base_repo: Option<String>,
    /// Namespace prefix; a trailing '-' is added when missing.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Directory holding `token` and the registry auth file [default: $TRELLIS_CREDENTIALS_DIR or ~/Downloads].
    #[arg(long)]
    pub credentials_dir: Option<String>,
    /// Registry auth file to use instead of `<user>-auth.json`.
    #[arg(long)]
    pub docker_config_json_path: Option<PathBuf>,
    /// TOML file with default values for the flags above.
    #[arg(long)]
    pub params: Option<PathBuf>,
}

impl BootstrapArgs {
    fn into_parameters(self) -> Result<BootstrapParameters, CoreError> {
        let mut params = match &self.params {
            Some(path) => BootstrapParameters::load(path)?,
            None => BootstrapParameters::default(),
        };
        if let Some(user) = self.registry_user {
            params.registry_user = user;
        }
        if let Some(repo) = self.base_repo {
            params.base_repo = repo;
        }
        if let Some(prefix) = self.prefix {
            params.prefix = prefix;
        }
        if let Some(dir) = self.credentials_dir {
            params.credentials_dir = Some(expand_tilde(&dir));
        }
        if let Some(path) = self.docker_config_json_path {
            params.docker_config_json_path = Some(path);
        }
        Ok(params)
    }
}

pub fn run(args: BootstrapArgs, json: bool) -> Result<u8, String> {
    let params = args.into_parameters().map_err(|e| describe(&e))?;
    if json {
        let mut stream = Vec::new();
        let summary = run_bootstrap(params, &mut stream).map_err(|e| describe(&e))?;
        let payload = serde_json::json!({
            "manifests": summary.manifests,
            "bytes": summary.bytes,
            "digest": summary.digest,
            "stream": String::from_utf8_lossy(&stream),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run_bootstrap(params, &mut out).map_err(|e| describe(&e))?;
    }
    Ok(EXIT_SUCCESS)
}
