use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

/// A vendor-defined `{code, value}` pair: one reported or controllable attribute.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub code: String,
    pub value: Value,
}

impl DataPoint {
    #[must_use]
    pub fn new<S: Into<String>>(code: S, value: Value) -> Self {
        Self {
            code: code.into(),
            value,
        }
    }
}

/// A named sub-unit of a multi-gang device.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub identifier: String,
    pub name: String,
}

#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "status", default)]
    pub status_points: Vec<DataPoint>,
    /// Filled in by enrichment for multi-gang switches and outlets only.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "code_name_mapping", default)]
    pub channel_mapping: Vec<Channel>,
}
