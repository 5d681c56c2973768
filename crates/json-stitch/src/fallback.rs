//! Fallback for streams that carry raw argument text instead of fragment
//! updates: accumulate the text and parse it whenever it happens to be a
//! complete JSON document.

use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct RawArguments {
    text: String,
    parsed: Option<Value>,
}

impl RawArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `delta` and return the latest successfully parsed value.
    ///
    /// Keeps the previous parse while the text is mid-token, so readers never
    /// see the value disappear.
    pub fn push(&mut self, delta: &str) -> Option<&Value> {
        self.text.push_str(delta);
        if let Ok(value) = serde_json::from_str::<Value>(&self.text) {
            self.parsed = Some(value);
        }
        self.parsed.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.parsed
    }
}
