use crate::v100::Devfile100;
use crate::DevfileError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Devfile API versions Trellis understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DevfileVersion {
    V100,
}

impl DevfileVersion {
    pub const SUPPORTED: &'static [Self] = &[Self::V100];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V100 => "1.0.0",
        }
    }

    pub(crate) fn schema_source(self) -> &'static str {
        match self {
            Self::V100 => include_str!("schemas/devfile-1.0.0.json"),
        }
    }

    /// Decode an already-validated document into this version's typed form.
    pub fn decode(self, document: Value) -> Result<DevfileData, DevfileError> {
        match self {
            Self::V100 => serde_json::from_value(document)
                .map(DevfileData::V100)
                .map_err(|e| DevfileError::Parse(e.to_string())),
        }
    }
}

impl FromStr for DevfileVersion {
    type Err = DevfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| DevfileError::UnsupportedVersion(s.to_owned()))
    }
}

impl fmt::Display for DevfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed devfile, tagged by the API version it was validated against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DevfileData {
    V100(Devfile100),
}

impl DevfileData {
    pub fn version(&self) -> DevfileVersion {
        match self {
            Self::V100(_) => DevfileVersion::V100,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::V100(d) => &d.metadata.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_tag() {
        assert_eq!("1.0.0".parse::<DevfileVersion>().unwrap(), DevfileVersion::V100);
        assert_eq!(DevfileVersion::V100.to_string(), "1.0.0");
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "2.0.0".parse::<DevfileVersion>().unwrap_err();
        assert!(matches!(err, DevfileError::UnsupportedVersion(ref v) if v == "2.0.0"));
    }

    #[test]
    fn every_supported_version_has_json_schema() {
        for v in DevfileVersion::SUPPORTED {
            let schema: Value = serde_json::from_str(v.schema_source()).unwrap();
            assert_eq!(schema["properties"]["apiVersion"]["const"], v.as_str());
        }
    }
}
