use crate::secrets::{default_credentials_dir, CredentialPaths};
use crate::CoreError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use trellis_manifest::repo_full_name;

/// Append a trailing `-` to a non-empty prefix that lacks one.
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('-') {
        prefix.to_owned()
    } else {
        format!("{prefix}-")
    }
}

/// A repo slug must be exactly two non-empty `/`-separated segments.
pub fn check_repo_format(repo: &str) -> Result<(), CoreError> {
    let segments: Vec<&str> = repo.split('/').collect();
    if segments.len() == 2 && segments.iter().all(|s| !s.is_empty()) {
        Ok(())
    } else {
        Err(CoreError::InvalidRepoFormat(repo.to_owned()))
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn load_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, CoreError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let params = toml::from_str(&raw).map_err(|e| CoreError::Params {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!("loaded parameters from {}", path.display());
    Ok(params)
}

/// Inputs of a `bootstrap` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct BootstrapParameters {
    pub registry_user: String,
    pub base_repo: String,
    pub prefix: String,
    pub credentials_dir: Option<PathBuf>,
    pub docker_config_json_path: Option<PathBuf>,
}

impl BootstrapParameters {
    pub fn new(registry_user: &str, base_repo: &str) -> Self {
        Self {
            registry_user: registry_user.to_owned(),
            base_repo: base_repo.to_owned(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        load_toml(path)
    }

    pub fn complete(&mut self) {
        self.prefix = normalize_prefix(&self.prefix);
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.registry_user.is_empty() {
            return Err(CoreError::MissingParameter("registry-user".to_owned()));
        }
        if self.base_repo.is_empty() {
            return Err(CoreError::MissingParameter("base-repo".to_owned()));
        }
        check_repo_format(&repo_full_name(&self.base_repo))
    }

    pub fn credentials(&self) -> CredentialPaths {
        CredentialPaths::new(
            self.credentials_dir
                .clone()
                .unwrap_or_else(default_credentials_dir),
        )
    }

    /// The registry auth document, unless overridden, `<dir>/<user>-auth.json`.
    pub fn registry_auth_path(&self) -> PathBuf {
        self.docker_config_json_path
            .clone()
            .unwrap_or_else(|| self.credentials().registry_auth(&self.registry_user))
    }
}

/// Inputs of an `init` run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct InitParameters {
    pub gitops_repo: String,
    pub gitops_webhook_secret: String,
    pub output: PathBuf,
    pub prefix: String,
    pub skip_checks: bool,
    pub app_git_repo: Option<String>,
    pub app_webhook_secret: Option<String>,
    pub app_image_repo: Option<String>,
    pub env_name: Option<String>,
    pub docker_config_json_path: Option<PathBuf>,
}

impl Default for InitParameters {
    fn default() -> Self {
        Self {
            gitops_repo: String::new(),
            gitops_webhook_secret: String::new(),
            output: PathBuf::from("."),
            prefix: String::new(),
            skip_checks: false,
            app_git_repo: None,
            app_webhook_secret: None,
            app_image_repo: None,
            env_name: None,
            docker_config_json_path: None,
        }
    }
}

impl InitParameters {
    pub fn new(gitops_repo: &str, gitops_webhook_secret: &str) -> Self {
        Self {
            gitops_repo: gitops_repo.to_owned(),
            gitops_webhook_secret: gitops_webhook_secret.to_owned(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        load_toml(path)
    }

    pub fn complete(&mut self) {
        self.prefix = normalize_prefix(&self.prefix);
    }

    /// Check parameter consistency, reporting only the first problem found.
    ///
    /// The application parameters are all-or-nothing: `app-git-repo` pulls in
    /// `app-webhook-secret`, `app-image-repo`, and `env-name`, and none of those
    /// may appear without it.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_repo_format(&self.gitops_repo)?;
        if self.gitops_webhook_secret.is_empty() {
            return Err(CoreError::MissingParameter(
                "gitops-webhook-secret".to_owned(),
            ));
        }

        if let Some(app_repo) = self.app_git_repo() {
            check_repo_format(app_repo)?;
            let required = [
                ("app-webhook-secret", self.app_webhook_secret()),
                ("app-image-repo", self.app_image_repo()),
                ("env-name", self.env_name()),
            ];
            if let Some((flag, _)) = required.iter().find(|(_, value)| value.is_none()) {
                return Err(CoreError::MissingParameter((*flag).to_owned()));
            }
        } else if self.app_webhook_secret().is_some()
            || self.app_image_repo().is_some()
            || self.env_name().is_some()
        {
            return Err(CoreError::MissingParameter("app-git-repo".to_owned()));
        }
        Ok(())
    }

    pub fn app_git_repo(&self) -> Option<&str> {
        present(self.app_git_repo.as_ref())
    }

    pub fn app_webhook_secret(&self) -> Option<&str> {
        present(self.app_webhook_secret.as_ref())
    }

    pub fn app_image_repo(&self) -> Option<&str> {
        present(self.app_image_repo.as_ref())
    }

    pub fn env_name(&self) -> Option<&str> {
        present(self.env_name.as_ref())
    }

    pub fn has_application(&self) -> bool {
        self.app_git_repo().is_some()
    }
}
