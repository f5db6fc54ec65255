use crate::listener::EventListener;
use crate::meta::{ObjectMeta, TypeMeta};
use serde::{Deserialize, Serialize};

const ROUTE_NAME: &str = "github-webhook-event-listener";
const LISTENER_PORT: u16 = 8080;

/// OpenShift route exposing the event listener service to webhook callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Route {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: RouteSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteSpec {
    pub port: RoutePort,
    pub to: RouteTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteTarget {
    pub kind: String,
    pub name: String,
    pub weight: u32,
}

/// Route to the `el-<name>` service the triggers controller creates for `listener`.
///
/// The route lands in the listener's namespace.
pub fn route_for(listener: &EventListener) -> Route {
    Route {
        type_meta: TypeMeta::new("route.openshift.io/v1", "Route"),
        metadata: ObjectMeta {
            namespace: listener.metadata.namespace.clone(),
            ..ObjectMeta::named(ROUTE_NAME)
        },
        spec: RouteSpec {
            port: RoutePort {
                target_port: LISTENER_PORT,
            },
            to: RouteTarget {
                kind: "Service".to_owned(),
                name: format!("el-{}", listener.metadata.name),
                weight: 100,
            },
        },
    }
}
