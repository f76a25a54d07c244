use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attributes of an effect.
///
/// Effect parameters are effect-specific and untyped on the wire (strings,
/// numbers, booleans, nested maps, lists), so they are kept as raw JSON
/// values keyed by parameter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub developer_effect: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub uses_audio: bool,
    #[serde(default)]
    pub uses_input: bool,
    #[serde(default)]
    pub uses_meters: bool,
    #[serde(default)]
    pub uses_video: bool,
}

/// Action links attached to an effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub apply: Option<String>,
    /// Serialized as `self` on the wire.
    #[serde(default, rename = "self")]
    pub self_link: Option<String>,
}

/// A single effect, identified by a server-assigned id.
///
/// Ids are stable across requests; names are not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub attributes: Attributes,
    #[serde(default)]
    pub links: Links,
}

/// The canvas's live settings. There is exactly one per service instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub global_brightness: u8,
}

/// Wraps [`CurrentState`] with the id and links of the active effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStateHolder {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub attributes: CurrentState,
    #[serde(default)]
    pub links: Links,
}

/// A list of effects, as carried in the `data` payload of a list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectList {
    #[serde(default)]
    pub items: Option<Vec<Effect>>,
}

/// A physical device arrangement. Exactly one layout is current at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutList {
    #[serde(default)]
    pub items: Option<Vec<Layout>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentLayoutHolder {
    #[serde(default)]
    pub current_layout: Option<Layout>,
}

/// A preset scoped to a single parent effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectPreset {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectPresetList {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<EffectPreset>>,
}

/// A structured error as reported by the API.
///
/// `code` is used for programmatic dispatch (e.g. `not_found`, or an HTTP
/// status rendered as a string such as `409`); `detail` is human text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub title: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorDetail {
    pub fn from_title(title: impl Into<String>) -> Self {
        ErrorDetail {
            title: title.into(),
            code: None,
            detail: None,
        }
    }
}

/// The uniform envelope around every server reply.
///
/// The metadata fields are lenient: minimal error bodies such as
/// `{"status":"error","errors":[...]}` still decode, and anything other than
/// `status == "ok"` is treated as a failed request downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub params: HashMap<String, Value>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
    #[serde(default)]
    pub data: Option<T>,
}
