//! Fixed catalog of webhook trigger bindings.
//!
//! Each binding maps fields of a GitHub webhook payload to named params. The
//! value expressions are passed through verbatim; Trellis never evaluates them.
//! Param order is part of each binding's contract with the trigger templates
//! that consume it.

use crate::meta::{ObjectMeta, TypeMeta, TEKTON_API_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerBinding {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: TriggerBindingSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerBindingSpec {
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl TriggerBinding {
    pub fn param_names(&self) -> Vec<&str> {
        self.spec.params.iter().map(|p| p.name.as_str()).collect()
    }
}

/// The webhook-triggered workflows a pipeline installation wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookFlow {
    /// Deploy to dev on every push to master.
    DevCdDeploy,
    /// Build and test pull requests against dev.
    DevCiBuild,
    /// Deploy to stage on push to the stage config repository.
    StageCdDeploy,
    /// Server-side dry run of pull requests against stage.
    StageCiDryRun,
}

impl WebhookFlow {
    /// Catalog order.
    pub const ALL: [Self; 4] = [
        Self::DevCdDeploy,
        Self::DevCiBuild,
        Self::StageCdDeploy,
        Self::StageCiDryRun,
    ];

    pub fn trigger_name(self) -> &'static str {
        match self {
            Self::DevCdDeploy => "dev-cd-deploy-from-master",
            Self::DevCiBuild => "dev-ci-build-from-pr",
            Self::StageCdDeploy => "stage-cd-deploy-from-push",
            Self::StageCiDryRun => "stage-ci-dryrun-from-pr",
        }
    }

    pub fn binding_name(self) -> String {
        format!("{}-binding", self.trigger_name())
    }

    pub fn template_name(self) -> String {
        format!("{}-template", self.trigger_name())
    }

    pub fn is_pull_request(self) -> bool {
        matches!(self, Self::DevCiBuild | Self::StageCiDryRun)
    }

    pub fn is_stage(self) -> bool {
        matches!(self, Self::StageCdDeploy | Self::StageCiDryRun)
    }

    pub fn binding(self) -> TriggerBinding {
        match self {
            Self::DevCdDeploy => dev_cd_deploy_binding(),
            Self::DevCiBuild => dev_ci_build_binding(),
            Self::StageCdDeploy => stage_cd_deploy_binding(),
            Self::StageCiDryRun => stage_ci_dry_run_binding(),
        }
    }
}

impl fmt::Display for WebhookFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trigger_name())
    }
}

/// All four bindings, in catalog order.
pub fn binding_catalog() -> Vec<TriggerBinding> {
    WebhookFlow::ALL.iter().map(|flow| flow.binding()).collect()
}

pub fn dev_cd_deploy_binding() -> TriggerBinding {
    binding(
        WebhookFlow::DevCdDeploy,
        &[
            ("gitref", "$(body.head_commit.id)"),
            ("gitrepositoryurl", "$(body.repository.clone_url)"),
        ],
    )
}

pub fn dev_ci_build_binding() -> TriggerBinding {
    binding(
        WebhookFlow::DevCiBuild,
        &[
            ("gitref", "$(body.pull_request.head.ref)"),
            ("gitsha", "$(body.pull_request.head.sha)"),
            ("gitrepositoryurl", "$(body.repository.clone_url)"),
            ("fullname", "$(body.repository.full_name)"),
        ],
    )
}

pub fn stage_cd_deploy_binding() -> TriggerBinding {
    binding(
        WebhookFlow::StageCdDeploy,
        &[
            ("gitref", "$(body.ref)"),
            ("gitsha", "$(body.commits.0.id)"),
            ("gitrepositoryurl", "$(body.repository.clone_url)"),
        ],
    )
}

pub fn stage_ci_dry_run_binding() -> TriggerBinding {
    binding(
        WebhookFlow::StageCiDryRun,
        &[
            ("gitref", "$(body.pull_request.head.ref)"),
            ("gitrepositoryurl", "$(body.repository.clone_url)"),
        ],
    )
}

fn binding(flow: WebhookFlow, params: &[(&str, &str)]) -> TriggerBinding {
    TriggerBinding {
        type_meta: TypeMeta::new(TEKTON_API_VERSION, "TriggerBinding"),
        metadata: ObjectMeta::named(&flow.binding_name()),
        spec: TriggerBindingSpec {
            params: params
                .iter()
                .map(|(name, value)| Param {
                    name: (*name).to_owned(),
                    value: (*value).to_owned(),
                })
                .collect(),
        },
    }
}
