use crate::meta::{ObjectMeta, TypeMeta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Encoding of a Secret, which also fixes the key its content is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretKind {
    /// Opaque token, stored under `token`.
    #[serde(rename = "Opaque")]
    Opaque,
    /// Container-registry auth document, stored under `.dockerconfigjson`.
    #[serde(rename = "kubernetes.io/dockerconfigjson")]
    DockerConfigJson,
}

impl SecretKind {
    pub fn data_key(self) -> &'static str {
        match self {
            Self::Opaque => "token",
            Self::DockerConfigJson => ".dockerconfigjson",
        }
    }
}

/// A Kubernetes Secret.
///
/// `data` holds the raw bytes exactly as read from the credential source.
/// Base64 encoding happens only when the secret is serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    #[serde(rename = "type")]
    pub secret_type: SecretKind,
    #[serde(with = "base64_data")]
    pub data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    pub fn new(kind: SecretKind, name: &str, content: Vec<u8>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(kind.data_key().to_owned(), content);
        Self {
            type_meta: TypeMeta::new("v1", "Secret"),
            metadata: ObjectMeta::named(name),
            secret_type: kind,
            data,
        }
    }

    pub fn opaque(name: &str, content: Vec<u8>) -> Self {
        Self::new(SecretKind::Opaque, name, content)
    }

    pub fn docker_config(name: &str, content: Vec<u8>) -> Self {
        Self::new(SecretKind::DockerConfigJson, name, content)
    }

    /// Raw bytes stored under the kind's well-known key.
    pub fn content(&self) -> Option<&[u8]> {
        self.data
            .get(self.secret_type.data_key())
            .map(Vec::as_slice)
    }
}

mod base64_data {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        data: &BTreeMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(data.len()))?;
        for (key, bytes) in data {
            map.serialize_entry(key, &STANDARD.encode(bytes))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(key, value)| {
                STANDARD
                    .decode(value.as_bytes())
                    .map(|bytes| (key.clone(), bytes))
                    .map_err(|e| D::Error::custom(format!("invalid base64 under '{key}': {e}")))
            })
            .collect()
    }
}
