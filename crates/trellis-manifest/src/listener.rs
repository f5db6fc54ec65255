use crate::bindings::WebhookFlow;
use crate::meta::{ObjectMeta, TypeMeta, TEKTON_API_VERSION};
use serde::{Deserialize, Serialize};

pub const EVENT_LISTENER_NAME: &str = "cicd-event-listener";
const SERVICE_ACCOUNT: &str = "demo-sa";
const STAGE_REPO_SUFFIX: &str = "-stage-config";

const PULL_REQUEST_EVENT: &str = "(header.match('X-GitHub-Event', 'pull_request') && (body.action == 'opened' || body.action == 'synchronize'))";
const PUSH_EVENT: &str = "header.match('X-GitHub-Event', 'push')";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventListener {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: EventListenerSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventListenerSpec {
    pub service_account_name: String,
    pub triggers: Vec<EventListenerTrigger>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventListenerTrigger {
    pub name: String,
    pub interceptors: Vec<Interceptor>,
    pub bindings: Vec<NamedRef>,
    pub template: NamedRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interceptor {
    pub cel: CelInterceptor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CelInterceptor {
    pub filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedRef {
    pub name: String,
}

/// Reduce a repository reference to its `owner/repo` full name.
///
/// Accepts `owner/repo`, `https://host/owner/repo(.git)` and
/// `git@host:owner/repo(.git)`.
pub fn repo_full_name(repo: &str) -> String {
    let trimmed = repo.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let path = if let Some((_, rest)) = trimmed.split_once("://") {
        rest.split_once('/').map_or("", |(_, path)| path)
    } else if let Some((_, path)) = trimmed
        .strip_prefix("git@")
        .and_then(|rest| rest.split_once(':'))
    {
        path
    } else {
        trimmed
    };
    path.to_owned()
}

/// Event listener with one trigger per [`WebhookFlow`], filtered to `repo`.
///
/// Dev flows match the repository itself, stage flows match its
/// `-stage-config` companion.
pub fn event_listener(repo: &str) -> EventListener {
    let full_name = repo_full_name(repo);
    EventListener {
        type_meta: TypeMeta::new(TEKTON_API_VERSION, "EventListener"),
        metadata: ObjectMeta::named(EVENT_LISTENER_NAME),
        spec: EventListenerSpec {
            service_account_name: SERVICE_ACCOUNT.to_owned(),
            triggers: WebhookFlow::ALL
                .iter()
                .map(|flow| trigger(*flow, &full_name))
                .collect(),
        },
    }
}

fn trigger(flow: WebhookFlow, full_name: &str) -> EventListenerTrigger {
    EventListenerTrigger {
        name: flow.trigger_name().to_owned(),
        interceptors: vec![Interceptor {
            cel: CelInterceptor {
                filter: filter_for(flow, full_name),
            },
        }],
        bindings: vec![NamedRef {
            name: flow.binding_name(),
        }],
        template: NamedRef {
            name: flow.template_name(),
        },
    }
}

fn filter_for(flow: WebhookFlow, full_name: &str) -> String {
    let target = if flow.is_stage() {
        format!("{full_name}{STAGE_REPO_SUFFIX}")
    } else {
        full_name.to_owned()
    };
    if flow.is_pull_request() {
        format!("{PULL_REQUEST_EVENT} && body.pull_request.head.repo.full_name == '{target}'")
    } else {
        format!(
            "({PUSH_EVENT} && body.repository.full_name == '{target}') && body.ref.startsWith('refs/heads/master')"
        )
    }
}
