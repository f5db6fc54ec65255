//! Manifest data model and resource builders for Trellis.
//!
//! This crate defines the manifest layer: the `ManifestDescriptor` union over
//! the resource kinds a pipeline bootstrap emits (secrets, trigger bindings,
//! tasks, event listeners, routes), the `ManifestSet` ordered collection, and
//! the pure builders that produce each resource from fixed templates.
//! Builders never fail and never touch the filesystem; identical inputs yield
//! identical values.

pub mod bindings;
pub mod descriptor;
pub mod listener;
pub mod meta;
pub mod route;
pub mod secret;
pub mod task;
pub mod types;

pub use bindings::{
    binding_catalog, dev_cd_deploy_binding, dev_ci_build_binding, stage_cd_deploy_binding,
    stage_ci_dry_run_binding, Param, TriggerBinding, TriggerBindingSpec, WebhookFlow,
};
pub use descriptor::{ManifestDescriptor, ManifestKind, ManifestSet};
pub use listener::{event_listener, repo_full_name, EventListener, EventListenerTrigger};
pub use meta::{ObjectMeta, TypeMeta};
pub use route::{route_for, Route};
pub use secret::{Secret, SecretKind};
pub use task::{deploy_from_source_task, ParamSpec, Step, Task, TaskResource};
pub use types::ResourceName;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("duplicate manifest name '{0}' in output set")]
    DuplicateName(String),
    #[error("{0} manifest has an empty name")]
    EmptyName(ManifestKind),
    #[error("secret '{0}' carries no data")]
    EmptySecretData(String),
    #[error("task '{task}' references undeclared params: {}", .params.join(", "))]
    UndeclaredTaskParams { task: String, params: Vec<String> },
    #[error("event listener '{0}' declares no triggers")]
    NoTriggers(String),
    #[error("route '{0}' has no target service")]
    EmptyRouteTarget(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_params_message_lists_names() {
        let e = ManifestError::UndeclaredTaskParams {
            task: "deploy".to_owned(),
            params: vec!["A".to_owned(), "B".to_owned()],
        };
        assert_eq!(
            e.to_string(),
            "task 'deploy' references undeclared params: A, B"
        );
    }

    #[test]
    fn empty_name_mentions_kind() {
        let e = ManifestError::EmptyName(ManifestKind::Route);
        assert!(e.to_string().contains("Route"));
    }
}
