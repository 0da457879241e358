//! The message surface between the panel UI and the plugin core.
//!
//! Messages arrive as JSON with a `type` tag in kebab-case and camelCase
//! fields, e.g. `{"type": "create-content", "text": "...", "html": "..."}`.

use serde::{Deserialize, Serialize};

/// Panel-to-plugin messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum PluginMessage {
    /// Close the plugin.
    Cancel,
    /// Onboarding questionnaire finished; payload is opaque to the core.
    QuestionnaireComplete { data: serde_json::Value },
    /// A chat message was sent from the panel.
    ChatMessage { message: String },
    /// A suggested prompt chip was clicked.
    PromptSelected { prompt_title: String },
    /// Panel collapsed or expanded.
    ToggleCollapse { collapsed: bool },
    /// Ask for the host document's name.
    GetProjectName,
    /// Add an assistant response to the canvas. `html` is the rendered
    /// chat HTML when available; without it the text renders plain.
    CreateContent { text: String, html: Option<String> },
}

/// Plugin-to-panel replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum PluginReply {
    ProjectName { name: String },
}
