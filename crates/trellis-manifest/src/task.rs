use crate::meta::{ObjectMeta, TypeMeta, TEKTON_API_VERSION};
use serde::{Deserialize, Serialize};

const PARAM_REF_PREFIX: &str = "$(inputs.params.";

const KUBECTL_IMAGE: &str = "quay.io/kmcdermo/k8s-kubectl:latest";
const SOURCE_DIR: &str = "/workspace/source";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: TaskSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSpec {
    pub inputs: Inputs,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inputs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<TaskResource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParamSpec {
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            param_type: "string".to_owned(),
            description: description.to_owned(),
            default: None,
        }
    }

    pub fn with_default(name: &str, description: &str, default: &str) -> Self {
        Self {
            default: Some(default.to_owned()),
            ..Self::required(name, description)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub name: String,
    pub image: String,
    pub working_dir: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
}

impl Task {
    /// Names referenced as `$(inputs.params.X)` in any step but not declared
    /// in `spec.inputs.params`, in order of first appearance.
    pub fn undeclared_params(&self) -> Vec<String> {
        let declared: Vec<&str> = self
            .spec
            .inputs
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let mut missing: Vec<String> = Vec::new();
        for step in &self.spec.steps {
            let fields = std::iter::once(&step.working_dir)
                .chain(&step.command)
                .chain(&step.args);
            for field in fields {
                for name in param_references(field) {
                    if !declared.contains(&name) && !missing.iter().any(|m| m == name) {
                        missing.push(name.to_owned());
                    }
                }
            }
        }
        missing
    }
}

fn param_references(text: &str) -> Vec<&str> {
    let mut refs = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(PARAM_REF_PREFIX) {
        let after = &rest[start + PARAM_REF_PREFIX.len()..];
        let Some(end) = after.find(')') else {
            break;
        };
        refs.push(&after[..end]);
        rest = &after[end + 1..];
    }
    refs
}

/// Task that applies a kustomization from the checked-out source with kubectl.
pub fn deploy_from_source_task() -> Task {
    Task {
        type_meta: TypeMeta::new(TEKTON_API_VERSION, "Task"),
        metadata: ObjectMeta::named("deploy-from-source-task"),
        spec: TaskSpec {
            inputs: Inputs {
                resources: vec![TaskResource {
                    name: "source".to_owned(),
                    resource_type: "git".to_owned(),
                }],
                params: vec![
                    ParamSpec::with_default(
                        "PATHTODEPLOYMENT",
                        "Path to the manifest to apply",
                        "deploy",
                    ),
                    ParamSpec::required("NAMESPACE", "Namespace to deploy into"),
                    ParamSpec::with_default("DRYRUN", "If true run a server-side dryrun.", "false"),
                ],
            },
            steps: vec![Step {
                name: "run-kubectl".to_owned(),
                image: KUBECTL_IMAGE.to_owned(),
                working_dir: SOURCE_DIR.to_owned(),
                command: vec!["kubectl".to_owned()],
                args: [
                    "apply",
                    "--dry-run=$(inputs.params.DRYRUN)",
                    "-n",
                    "$(inputs.params.NAMESPACE)",
                    "-k",
                    "$(inputs.params.PATHTODEPLOYMENT)",
                ]
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            }],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_task_declares_git_source() {
        let task = deploy_from_source_task();
        assert_eq!(task.metadata.name, "deploy-from-source-task");
        assert_eq!(task.spec.inputs.resources.len(), 1);
        assert_eq!(task.spec.inputs.resources[0].name, "source");
        assert_eq!(task.spec.inputs.resources[0].resource_type, "git");
    }

    #[test]
    fn deploy_task_params_and_defaults() {
        let task = deploy_from_source_task();
        let params: Vec<(&str, Option<&str>)> = task
            .spec
            .inputs
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.default.as_deref()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("PATHTODEPLOYMENT", Some("deploy")),
                ("NAMESPACE", None),
                ("DRYRUN", Some("false")),
            ]
        );
    }

    #[test]
    fn deploy_task_has_single_kubectl_step() {
        let task = deploy_from_source_task();
        assert_eq!(task.spec.steps.len(), 1);
        let step = &task.spec.steps[0];
        assert_eq!(step.image, "quay.io/kmcdermo/k8s-kubectl:latest");
        assert_eq!(step.working_dir, "/workspace/source");
        assert_eq!(step.command, vec!["kubectl"]);
        assert_eq!(
            step.args,
            vec![
                "apply",
                "--dry-run=$(inputs.params.DRYRUN)",
                "-n",
                "$(inputs.params.NAMESPACE)",
                "-k",
                "$(inputs.params.PATHTODEPLOYMENT)",
            ]
        );
    }

    #[test]
    fn deploy_task_references_only_declared_params() {
        assert!(deploy_from_source_task().undeclared_params().is_empty());
    }

    #[test]
    fn undeclared_params_are_reported_once() {
        let mut task = deploy_from_source_task();
        task.spec.steps[0]
            .args
            .push("$(inputs.params.TIMEOUT)/$(inputs.params.TIMEOUT)".to_owned());
        task.spec.inputs.params.retain(|p| p.name != "NAMESPACE");
        assert_eq!(task.undeclared_params(), vec!["NAMESPACE", "TIMEOUT"]);
    }

    #[test]
    fn param_references_handles_unterminated_placeholder() {
        assert_eq!(param_references("$(inputs.params.A) $(inputs.params.B"), vec!["A"]);
        assert!(param_references("no placeholders").is_empty());
    }

    #[test]
    fn serializes_camel_case_working_dir() {
        let yaml = serde_yaml::to_string(&deploy_from_source_task()).unwrap();
        assert!(yaml.contains("workingDir: /workspace/source"));
        assert!(yaml.contains("kind: Task"));
        assert!(!yaml.contains("working_dir"));
    }
}
