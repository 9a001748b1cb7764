//! Raw-JSON editor buffer.

use cimi_browser_domain::error::CimiError;
use serde_json::Value;

/// Initial contents when composing a new resource.
pub const ADD_TEMPLATE: &str = "{\"key\": \"value\"}\n";

/// Text being viewed or edited in the JSON panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    text: String,
}

impl EditorBuffer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Buffer holding [`ADD_TEMPLATE`].
    #[must_use]
    pub fn add_template() -> Self {
        Self::new(ADD_TEMPLATE)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Parse the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::InvalidJson`] when the text is not valid JSON.
    pub fn validate(&self) -> Result<Value, CimiError> {
        serde_json::from_str(&self.text).map_err(CimiError::InvalidJson)
    }

    /// Re-indent the buffer with two spaces.
    ///
    /// Invalid text is left untouched; returns whether the buffer changed.
    pub fn format(&mut self) -> bool {
        let Ok(value) = self.validate() else {
            return false;
        };
        let Ok(pretty) = serde_json::to_string_pretty(&value) else {
            return false;
        };
        if pretty == self.text {
            return false;
        }
        self.text = pretty;
        true
    }
}
