//! Fragment update records.
//!
//! A [`FragmentUpdate`] is one incremental, path-addressed change to a
//! document under construction. Producers emit them in depth-first pre-order;
//! the rebuilder consumes each one exactly once.
//!
//! Wire form (as decoded from a transport chunk):
//!
//! ```json
//! {"path": "root.items[0].name", "type": "CompleteString", "textValue": "\"apple\""}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FragmentKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Key,
    StartString,
    PartialString,
    CompleteString,
    CompleteNumber,
    CompleteBoolean,
    CompleteNull,
    JsonComplete,
}

impl FragmentKind {
    /// Kinds that only mark structure for producers and never touch the tree.
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            FragmentKind::EndObject
                | FragmentKind::EndArray
                | FragmentKind::Key
                | FragmentKind::StartString
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentUpdate {
    /// Target location, rooted at the `root` sentinel.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FragmentKind,
    /// Literal payload. Quoted JSON for `CompleteString`, a raw chunk for
    /// `PartialString`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    /// Pre-decoded payload, used when `text_value` is absent. A JSON `null`
    /// here decodes as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FragmentUpdate {
    pub fn new(kind: FragmentKind, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            text_value: None,
            value: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_value = Some(text.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn start_object(path: impl Into<String>) -> Self {
        Self::new(FragmentKind::StartObject, path)
    }

    pub fn end_object(path: impl Into<String>) -> Self {
        Self::new(FragmentKind::EndObject, path)
    }

    pub fn start_array(path: impl Into<String>) -> Self {
        Self::new(FragmentKind::StartArray, path)
    }

    pub fn end_array(path: impl Into<String>) -> Self {
        Self::new(FragmentKind::EndArray, path)
    }

    pub fn partial_string(path: impl Into<String>, chunk: impl Into<String>) -> Self {
        Self::new(FragmentKind::PartialString, path).with_text(chunk)
    }

    /// `literal` is the quoted JSON form, e.g. `"\"Hello\""`.
    pub fn complete_string(path: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::new(FragmentKind::CompleteString, path).with_text(literal)
    }

    pub fn complete_number(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(FragmentKind::CompleteNumber, path).with_text(text)
    }

    pub fn complete_boolean(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(FragmentKind::CompleteBoolean, path).with_text(text)
    }

    pub fn complete_null(path: impl Into<String>) -> Self {
        Self::new(FragmentKind::CompleteNull, path).with_text("null")
    }

    pub fn json_complete() -> Self {
        Self::new(FragmentKind::JsonComplete, json_stitch_path::ROOT)
    }
}
