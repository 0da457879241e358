//! Message dispatch and top-level error containment.

use tracing::{debug, error, info};

use easel_canvas::Canvas;
use easel_chat::ChatStream;
use easel_config::{EaselConfig, UiConfig};
use easel_transcode::{render_html, render_plain, ParserHandle, TranscodeError, TranscodeOptions};

use crate::message::{PluginMessage, PluginReply};

fn transcode_options(config: &EaselConfig) -> TranscodeOptions {
    TranscodeOptions {
        frame_width: config.transcode.frame_width,
        padding: config.transcode.padding,
        default_font: config.transcode.default_font.clone(),
        monospace_fallback: config.transcode.monospace_fallback.clone(),
    }
}

/// The plugin core. Owns the canvas handle and handles one message at a
/// time; a failed render notifies the user and leaves the document as it
/// was.
pub struct Plugin<C: Canvas> {
    canvas: C,
    parser: ParserHandle,
    options: TranscodeOptions,
    ui: UiConfig,
    chat: ChatStream,
    project_name: String,
    collapsed: bool,
    closed: bool,
}

impl<C: Canvas> Plugin<C> {
    pub fn new(canvas: C, parser: ParserHandle, config: &EaselConfig) -> Self {
        Self {
            canvas,
            parser,
            options: transcode_options(config),
            ui: config.ui.clone(),
            chat: ChatStream::new(),
            project_name: "Untitled".to_string(),
            collapsed: false,
            closed: false,
        }
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Panel dimensions the host should resize to, honoring collapse.
    pub fn panel_size(&self) -> (u32, u32) {
        if self.collapsed {
            (self.ui.width, self.ui.collapsed_height)
        } else {
            (self.ui.width, self.ui.height)
        }
    }

    /// The chat transcript rendered as display HTML.
    pub fn chat_html(&self) -> String {
        self.chat.html()
    }

    /// True after the panel asked to close; callers should tear down.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub async fn handle(&mut self, message: PluginMessage) -> Option<PluginReply> {
        match message {
            PluginMessage::Cancel => {
                self.closed = true;
                None
            }
            PluginMessage::QuestionnaireComplete { .. } => {
                self.canvas.notify("API verified!");
                None
            }
            PluginMessage::ChatMessage { message } => {
                let html = self.chat.push(&message);
                debug!(rendered = html.len(), "chat transcript updated");
                self.canvas.notify("Message received!");
                None
            }
            PluginMessage::PromptSelected { prompt_title } => {
                self.canvas
                    .notify(&format!("Prompt \"{prompt_title}\" selected!"));
                None
            }
            PluginMessage::ToggleCollapse { collapsed } => {
                self.collapsed = collapsed;
                None
            }
            PluginMessage::GetProjectName => Some(PluginReply::ProjectName {
                name: self.project_name.clone(),
            }),
            PluginMessage::CreateContent { text, html } => {
                self.create_content(&text, html.as_deref()).await;
                None
            }
        }
    }

    /// Render failures stop here: log, notify, keep the document intact.
    async fn create_content(&mut self, text: &str, html: Option<&str>) {
        info!(chars = text.len(), has_html = html.is_some(), "adding content to canvas");
        if let Err(err) = self.render(text, html).await {
            error!(%err, "failed to add content");
            self.canvas
                .notify("Couldn't add the response to the canvas");
        }
    }

    async fn render(&mut self, text: &str, html: Option<&str>) -> Result<(), TranscodeError> {
        match html {
            Some(html) if !html.trim().is_empty() => {
                let elements = self.parser.parse(html).await?;
                render_html(&mut self.canvas, text, html, &elements, &self.options).await
            }
            _ => render_plain(&mut self.canvas, text, &self.options).await,
        }
    }
}
