//! Typed devfile document for API version 1.0.0.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devfile100 {
    pub api_version: String,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub source: ProjectSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_checkout_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentType {
    CheEditor,
    ChePlugin,
    #[serde(rename = "dockerimage")]
    DockerImage,
    Kubernetes,
    Openshift,
}

/// A workspace component. Type-specific fields this struct does not model
/// are kept in `extra` so they survive a parse/write cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_sources: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    #[serde(deserialize_with = "integral_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    pub container_path: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Draft 7 counts `3000.0` as an integer, so accept any integral number
/// that fits a port.
fn integral_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let number = Number::deserialize(deserializer)?;
    let port = match number.as_u64() {
        Some(n) => u16::try_from(n).ok(),
        None => number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(f))
            .map(|f| f as u16),
    };
    port.ok_or_else(|| D::Error::custom(format!("invalid port {number}, expected 0-65535")))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_dockerimage_component() {
        let doc: Devfile100 = serde_json::from_value(serde_json::json!({
            "apiVersion": "1.0.0",
            "metadata": { "name": "nodejs" },
            "components": [{
                "type": "dockerimage",
                "alias": "runtime",
                "image": "node:12",
                "memoryLimit": "512Mi",
                "mountSources": true,
                "endpoints": [{ "name": "http", "port": 3000 }],
                "command": ["tail"]
            }]
        }))
        .unwrap();
        let component = &doc.components[0];
        assert_eq!(component.component_type, ComponentType::DockerImage);
        assert_eq!(component.memory_limit.as_deref(), Some("512Mi"));
        assert_eq!(component.endpoints[0].port, 3000);
        assert_eq!(component.extra["command"], serde_json::json!(["tail"]));
    }

    #[test]
    fn integral_float_port_is_accepted() {
        let endpoint: Endpoint =
            serde_json::from_value(serde_json::json!({ "name": "http", "port": 3000.0 })).unwrap();
        assert_eq!(endpoint.port, 3000);
        assert_eq!(serde_json::to_value(&endpoint).unwrap()["port"], 3000);
    }

    #[test]
    fn fractional_or_out_of_range_port_is_rejected() {
        for port in [serde_json::json!(80.5), serde_json::json!(70000), serde_json::json!(-1)] {
            let input = serde_json::json!({ "name": "p", "port": port });
            let err = serde_json::from_value::<Endpoint>(input).unwrap_err();
            assert!(err.to_string().contains("invalid port"), "{err}");
        }
    }

    #[test]
    fn nested_items_keep_unmodelled_keys() {
        let input = serde_json::json!({
            "name": "http",
            "port": 8080,
            "protocol": "https",
            "secure": true
        });
        let endpoint: Endpoint = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(endpoint.extra["protocol"], "https");
        assert_eq!(serde_json::to_value(&endpoint).unwrap(), input);

        let volume: Volume = serde_json::from_value(
            serde_json::json!({ "name": "m2", "containerPath": "/m2", "size": "1Gi" }),
        )
        .unwrap();
        assert_eq!(volume.extra["size"], "1Gi");
    }

    #[test]
    fn omits_empty_sections_when_serialized() {
        let doc = Devfile100 {
            api_version: "1.0.0".to_owned(),
            metadata: Metadata {
                name: "empty".to_owned(),
                version: None,
            },
            attributes: BTreeMap::new(),
            projects: Vec::new(),
            components: Vec::new(),
            commands: Vec::new(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "apiVersion": "1.0.0", "metadata": { "name": "empty" } })
        );
    }
}
