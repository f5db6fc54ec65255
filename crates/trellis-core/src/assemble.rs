use crate::params::{BootstrapParameters, InitParameters};
use crate::secrets::materialize;
use crate::CoreError;
use tracing::{debug, info};
use trellis_manifest::{
    binding_catalog, deploy_from_source_task, event_listener, route_for, ManifestDescriptor,
    ManifestSet, Secret, SecretKind,
};

pub const GITHUB_AUTH_SECRET: &str = "github-auth";
pub const REGISTRY_SECRET: &str = "regcred";
pub const GITOPS_WEBHOOK_SECRET: &str = "gitops-webhook-secret";
pub const APP_WEBHOOK_SECRET: &str = "app-webhook-secret";

/// Namespace holding the CI/CD machinery for a given (normalized) prefix.
pub fn cicd_namespace(prefix: &str) -> String {
    format!("{prefix}cicd-environment")
}

/// Build the bootstrap set: GitHub token, registry credential, event listener,
/// and its route, in that order.
///
/// Both credential files are read before any manifest is built, so a missing
/// file aborts the run with nothing assembled.
pub fn assemble_bootstrap(params: &BootstrapParameters) -> Result<ManifestSet, CoreError> {
    let namespace = cicd_namespace(&params.prefix);
    let credentials = params.credentials();
    info!(
        "assembling bootstrap manifests for {} into namespace {namespace}",
        params.base_repo
    );

    let token = materialize(SecretKind::Opaque, GITHUB_AUTH_SECRET, &credentials.token())?;
    let regcred = materialize(
        SecretKind::DockerConfigJson,
        REGISTRY_SECRET,
        &params.registry_auth_path(),
    )?;

    let mut listener = event_listener(&params.base_repo);
    listener.metadata.namespace = Some(namespace.clone());
    let route = route_for(&listener);

    let manifests = in_namespace(
        &namespace,
        vec![token.into(), regcred.into(), listener.into(), route.into()],
    );
    Ok(ManifestSet::new(manifests)?)
}

/// Build the init set for a GitOps repo and, optionally, one application.
///
/// Parameters are validated here as well, so an inconsistent set never
/// produces manifests.
pub fn assemble_init(params: &InitParameters) -> Result<ManifestSet, CoreError> {
    params.validate()?;
    let namespace = cicd_namespace(&params.prefix);
    info!(
        "assembling init manifests for {} into namespace {namespace}",
        params.gitops_repo
    );

    let mut manifests: Vec<ManifestDescriptor> = vec![Secret::opaque(
        GITOPS_WEBHOOK_SECRET,
        params.gitops_webhook_secret.as_bytes().to_vec(),
    )
    .into()];

    if let Some(path) = &params.docker_config_json_path {
        manifests.push(materialize(SecretKind::DockerConfigJson, REGISTRY_SECRET, path)?.into());
    }

    manifests.extend(binding_catalog().into_iter().map(ManifestDescriptor::from));
    manifests.push(deploy_from_source_task().into());

    let mut listener = event_listener(&params.gitops_repo);
    listener.metadata.namespace = Some(namespace.clone());
    let route = route_for(&listener);
    manifests.push(listener.into());
    manifests.push(route.into());

    let mut manifests = in_namespace(&namespace, manifests);

    if let (Some(secret), Some(env)) = (params.app_webhook_secret(), params.env_name()) {
        let env_namespace = format!("{}{env}", params.prefix);
        debug!("adding application webhook secret to namespace {env_namespace}");
        let app_secret: ManifestDescriptor =
            Secret::opaque(APP_WEBHOOK_SECRET, secret.as_bytes().to_vec()).into();
        manifests.push(app_secret.with_namespace(&env_namespace));
    }

    Ok(ManifestSet::new(manifests)?)
}

/// The four trigger bindings in catalog order, without a namespace.
pub fn catalog_set() -> Result<ManifestSet, CoreError> {
    let manifests = binding_catalog()
        .into_iter()
        .map(ManifestDescriptor::from)
        .collect();
    Ok(ManifestSet::new(manifests)?)
}

/// Local environment checks for `init`: the output directory must exist, and a
/// docker config file, if given, must be present.
pub fn preflight(params: &InitParameters) -> Result<(), CoreError> {
    if !params.output.is_dir() {
        return Err(CoreError::Preflight(format!(
            "output directory {} does not exist",
            params.output.display()
        )));
    }
    if let Some(path) = &params.docker_config_json_path {
        if !path.is_file() {
            return Err(CoreError::FileNotFound { path: path.clone() });
        }
    }
    debug!("pre-flight checks passed");
    Ok(())
}

fn in_namespace(namespace: &str, manifests: Vec<ManifestDescriptor>) -> Vec<ManifestDescriptor> {
    manifests
        .into_iter()
        .map(|m| m.with_namespace(namespace))
        .collect()
}
