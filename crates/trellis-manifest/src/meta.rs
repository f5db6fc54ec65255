use crate::types::ResourceName;
use serde::{Deserialize, Serialize};

pub(crate) const TEKTON_API_VERSION: &str = "tekton.dev/v1alpha1";

/// `apiVersion` and `kind` header shared by every manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    pub fn new(api_version: &str, kind: &str) -> Self {
        Self {
            api_version: api_version.to_owned(),
            kind: kind.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMeta {
    pub name: ResourceName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectMeta {
    pub fn named(name: &str) -> Self {
        Self {
            name: ResourceName::new(name),
            namespace: None,
        }
    }
}
