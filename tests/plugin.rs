//! Plugin dispatch against the headless canvas, parse round-trip included.

use std::time::Duration;

use easel::{Plugin, PluginMessage, PluginReply};
use easel_canvas::HeadlessCanvas;
use easel_config::EaselConfig;
use easel_transcode::bridge;

fn plugin(canvas: HeadlessCanvas) -> Plugin<HeadlessCanvas> {
    plugin_with_config(canvas, &EaselConfig::default())
}

fn plugin_with_config(canvas: HeadlessCanvas, config: &EaselConfig) -> Plugin<HeadlessCanvas> {
    let parser = bridge::in_process(Duration::from_millis(config.transcode.parse_timeout_ms));
    Plugin::new(canvas, parser, config)
}

#[tokio::test]
async fn create_content_commits_a_frame() {
    let mut plugin = plugin(HeadlessCanvas::new());
    plugin
        .handle(PluginMessage::CreateContent {
            text: "Here is your style guide.".to_string(),
            html: Some("<h1>Style Guide</h1><p>Body</p>".to_string()),
        })
        .await;
    let canvas = plugin.canvas();
    assert_eq!(canvas.committed.len(), 1);
    assert_eq!(canvas.committed[0].name, "Style Guide");
    assert_eq!(canvas.notices, vec!["Style guide added to the canvas!"]);
}

#[tokio::test]
async fn create_content_without_html_renders_plain() {
    let mut plugin = plugin(HeadlessCanvas::new());
    plugin
        .handle(PluginMessage::CreateContent {
            text: "Short answer.".to_string(),
            html: None,
        })
        .await;
    let canvas = plugin.canvas();
    assert_eq!(canvas.committed.len(), 1);
    assert_eq!(canvas.committed[0].name, "AI Response");
    assert_eq!(canvas.notices, vec!["Text added to the canvas!"]);
}

#[tokio::test]
async fn render_failure_notifies_and_commits_nothing() {
    // Default font that cannot load makes the whole render fail.
    let mut config = EaselConfig::default();
    config.transcode.default_font = "Missing Family".to_string();
    let mut plugin = plugin_with_config(HeadlessCanvas::new(), &config);
    plugin
        .handle(PluginMessage::CreateContent {
            text: "anything".to_string(),
            html: Some("<p>anything</p>".to_string()),
        })
        .await;
    let canvas = plugin.canvas();
    assert!(canvas.committed.is_empty());
    assert_eq!(
        canvas.notices,
        vec!["Couldn't add the response to the canvas"]
    );
}

#[tokio::test]
async fn acknowledgment_messages_notify() {
    let mut plugin = plugin(HeadlessCanvas::new());
    plugin
        .handle(PluginMessage::QuestionnaireComplete {
            data: serde_json::json!({"role": "designer"}),
        })
        .await;
    plugin
        .handle(PluginMessage::ChatMessage {
            message: "hi".to_string(),
        })
        .await;
    plugin
        .handle(PluginMessage::PromptSelected {
            prompt_title: "Create a persona".to_string(),
        })
        .await;
    assert_eq!(
        plugin.canvas().notices,
        vec![
            "API verified!",
            "Message received!",
            "Prompt \"Create a persona\" selected!",
        ]
    );
}

#[tokio::test]
async fn chat_messages_accumulate_into_a_rendered_transcript() {
    let mut plugin = plugin(HeadlessCanvas::new());
    assert_eq!(plugin.chat_html(), "");
    plugin
        .handle(PluginMessage::ChatMessage {
            message: "## Plan\n".to_string(),
        })
        .await;
    plugin
        .handle(PluginMessage::ChatMessage {
            message: "Use **Montserrat** for headings.".to_string(),
        })
        .await;
    assert_eq!(
        plugin.chat_html(),
        "<h2>Plan</h2>\n<p>Use <strong>Montserrat</strong> for headings.</p>"
    );
}

#[tokio::test]
async fn panel_size_follows_collapse_state() {
    let mut config = EaselConfig::default();
    config.ui.width = 420;
    config.ui.height = 640;
    config.ui.collapsed_height = 48;
    let mut plugin = plugin_with_config(HeadlessCanvas::new(), &config);
    assert_eq!(plugin.panel_size(), (420, 640));
    plugin
        .handle(PluginMessage::ToggleCollapse { collapsed: true })
        .await;
    assert_eq!(plugin.panel_size(), (420, 48));
}

#[tokio::test]
async fn project_name_and_panel_state() {
    let mut plugin = plugin(HeadlessCanvas::new());
    plugin.set_project_name("Homepage redesign");
    let reply = plugin.handle(PluginMessage::GetProjectName).await;
    assert_eq!(
        reply,
        Some(PluginReply::ProjectName {
            name: "Homepage redesign".to_string()
        })
    );

    assert!(!plugin.is_collapsed());
    plugin
        .handle(PluginMessage::ToggleCollapse { collapsed: true })
        .await;
    assert!(plugin.is_collapsed());

    assert!(!plugin.is_closed());
    plugin.handle(PluginMessage::Cancel).await;
    assert!(plugin.is_closed());
}
