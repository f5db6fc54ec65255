use super::{describe, expand_tilde, json_pretty, ok_mark, EXIT_SUCCESS};
use clap::Args;
use std::path::PathBuf;
use trellis_core::{run_init, CoreError, InitParameters};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// GitOps repository, as org/repo.
    #[arg(long)]
    pub gitops_repo: Option<String>,
    /// Shared secret for the GitOps repository webhook.
    #[arg(long)]
    pub gitops_webhook_secret: Option<String>,
    /// Directory receiving pipelines.yaml [default: .].
    #[arg(long)]
    pub output: Option<String>,
    /// Namespace prefix; a trailing '-' is added when missing.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Skip the local pre-flight checks.
    #[arg(long, default_value_t = false)]
    pub skip_checks: bool,
    /// Application repository, as org/repo.
    #[arg(long)]
    pub app_git_repo: Option<String>,
    /// Shared secret for the application repository webhook.
    #[arg(long)]
    pub app_webhook_secret: Option<String>,
    /// Image repository the application is pushed to.
    #[arg(long)]
    pub app_image_repo: Option<String>,
    /// Environment the application deploys into.
    #[arg(long)]
    pub env_name: Option<String>,
    /// Registry auth file to add as the `regcred` secret.
    #[arg(long)]
    pub docker_config_json_path: Option<PathBuf>,
    /// TOML file with default values for the flags above.
    #[arg(long)]
    pub params: Option<PathBuf>,
}

impl InitArgs {
    fn into_parameters(self) -> Result<InitParameters, CoreError> {
        let mut params = match &self.params {
            Some(path) => InitParameters::load(path)?,
            None => InitParameters::default(),
        };
        if let Some(repo) = self.gitops_repo {
            params.gitops_repo = repo;
        }
        if let Some(secret) = self.gitops_webhook_secret {
            params.gitops_webhook_secret = secret;
        }
        if let Some(output) = self.output {
            params.output = expand_tilde(&output);
        }
        if let Some(prefix) = self.prefix {
            params.prefix = prefix;
        }
        params.skip_checks |= self.skip_checks;
        for (flag, slot) in [
            (self.app_git_repo, &mut params.app_git_repo),
            (self.app_webhook_secret, &mut params.app_webhook_secret),
            (self.app_image_repo, &mut params.app_image_repo),
            (self.env_name, &mut params.env_name),
        ] {
            if flag.is_some() {
                *slot = flag;
            }
        }
        if let Some(path) = self.docker_config_json_path {
            params.docker_config_json_path = Some(path);
        }
        Ok(params)
    }
}

pub fn run(args: InitArgs, json: bool) -> Result<u8, String> {
    let params = args.into_parameters().map_err(|e| describe(&e))?;
    let outcome = run_init(params).map_err(|e| describe(&e))?;
    if json {
        println!("{}", json_pretty(&outcome)?);
    } else {
        println!(
            "{} wrote {} manifests to {}",
            ok_mark(),
            outcome.summary.manifests,
            outcome.path.display()
        );
        println!("  digest: {}", outcome.summary.digest);
    }
    Ok(EXIT_SUCCESS)
}
