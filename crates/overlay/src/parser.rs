//! Page configuration JSON parsing

use crate::schema::TextSpecification;
use crate::session::{EditorSession, GlobalDefaults};
use crate::{OverlayError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parse a single text specification from JSON
pub fn parse_text_spec(json: &str) -> Result<TextSpecification> {
    serde_json::from_str(json).map_err(|e| OverlayError::ParseError(e.to_string()))
}

/// Parse a story's page configuration from JSON
pub fn parse_page_config(json: &str) -> Result<PageConfig> {
    serde_json::from_str(json).map_err(|e| OverlayError::ParseError(e.to_string()))
}

/// Story page configuration: optional global style plus one entry per page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_defaults: Option<GlobalDefaults>,

    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

/// One page of the story
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    pub page_number: u32,

    /// Page type in story vocabulary
    #[serde(rename = "type", default = "default_page_type")]
    pub page_type: String,

    /// Pages without text are kept so numbering stays intact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSpecification>,
}

fn default_page_type() -> String {
    "single".to_string()
}

impl PageConfig {
    /// Load pages that carry text into an editor session
    ///
    /// Global defaults, when present, replace the session's. Returns the
    /// number of pages loaded.
    pub fn load_into(&self, session: &mut EditorSession) -> usize {
        if let Some(globals) = &self.global_defaults {
            *session.globals_mut() = globals.clone();
        }

        let mut loaded = 0;
        for entry in &self.pages {
            if let Some(text) = &entry.text {
                session.set_page_text(entry.page_number, &entry.page_type, text.clone());
                loaded += 1;
            }
        }

        debug!("Loaded {} of {} page(s) into session", loaded, self.pages.len());
        loaded
    }

    /// Build a fresh session from this configuration
    pub fn to_session(&self) -> EditorSession {
        let mut session = EditorSession::new();
        self.load_into(&mut session);
        session
    }
}
