//! End-to-end runs: HTML in, committed frame out, against the headless
//! canvas.

use anyhow::Result;

use easel_canvas::{FontStyle, HeadlessCanvas, Point, VisualNode};
use easel_transcode::{parser, render_html, render_plain, TranscodeOptions};

fn render(canvas: &mut HeadlessCanvas, text: &str, html: &str) -> Result<()> {
    let elements = parser::parse_content(html);
    pollster::block_on(render_html(
        canvas,
        text,
        html,
        &elements,
        &TranscodeOptions::default(),
    ))?;
    Ok(())
}

#[test]
fn style_guide_commits_a_named_frame_with_swatches() -> Result<()> {
    let mut canvas = HeadlessCanvas::new();
    let html = "<h1>Brand Style Guide</h1>\
                <h2>Primary Colors:</h2>\
                <p>- Crimson: #FF0000 (bold and energetic)</p>";
    render(&mut canvas, "Here is your style guide.", html)?;

    let frame = canvas.last_committed().expect("no frame committed");
    assert_eq!(frame.name, "Style Guide");
    assert!(frame.clips_content);
    assert_eq!(frame.corner_radius, 20.0);
    assert_eq!(frame.width, 800.0);

    let cell = frame
        .children
        .iter()
        .filter_map(VisualNode::as_frame)
        .find(|f| f.name == "Color: #FF0000")
        .expect("no swatch cell");
    let labels: Vec<_> = cell.texts().iter().map(|t| t.text.clone()).collect();
    assert!(labels.contains(&"#FF0000".to_string()));
    assert!(labels.contains(&"Crimson".to_string()));

    assert_eq!(canvas.notices, vec!["Style guide added to the canvas!"]);
    Ok(())
}

#[test]
fn ordered_list_renders_one_node_per_item() -> Result<()> {
    let mut canvas = HeadlessCanvas::new();
    render(
        &mut canvas,
        "Some steps",
        "<ol><li>Logo: keep clear space</li><li>Second</li></ol>",
    )?;
    let frame = canvas.last_committed().expect("no frame committed");
    let texts = frame.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0].text, "1. Logo: keep clear space");
    assert_eq!(texts[0].size, 16.0);
    assert_eq!(texts[0].ranges.len(), 1);
    assert_eq!(texts[1].text, "2. Second");
    assert!(texts[1].ranges.is_empty());
    Ok(())
}

#[test]
fn persona_document_uses_the_persona_frame_name() -> Result<()> {
    let mut canvas = HeadlessCanvas::new();
    render(
        &mut canvas,
        "Here is the user persona you asked for.",
        "<p>Name: Maya</p><p>Age: 34</p>",
    )?;
    let frame = canvas.last_committed().expect("no frame committed");
    assert_eq!(frame.name, "Persona");
    let texts = frame.texts();
    assert_eq!(texts[0].text, "Name:");
    assert_eq!(texts[0].style, FontStyle::Bold);
    assert_eq!(texts[1].text, "Maya");
    assert_eq!(canvas.notices, vec!["Persona added to the canvas!"]);
    Ok(())
}

#[test]
fn colors_without_a_section_get_a_trailing_palette() -> Result<()> {
    let mut canvas = HeadlessCanvas::new();
    render(
        &mut canvas,
        "Notes",
        "<p>We settled on #112233 for links.</p>",
    )?;
    let frame = canvas.last_committed().expect("no frame committed");
    assert!(frame
        .children
        .iter()
        .any(|n| matches!(n, VisualNode::Line(_))));
    assert!(frame.texts().iter().any(|t| t.text == "Color Palette"));
    assert!(frame
        .children
        .iter()
        .filter_map(VisualNode::as_frame)
        .any(|f| f.name == "Color: #112233"));
    Ok(())
}

#[test]
fn frame_is_centered_on_the_viewport() -> Result<()> {
    let mut canvas = HeadlessCanvas::new().with_viewport_center(Point::new(500.0, 400.0));
    render(&mut canvas, "Hello", "<p>Hello</p>")?;
    let frame = canvas.last_committed().expect("no frame committed");
    assert_eq!(frame.bounds().center(), Point::new(500.0, 400.0));
    Ok(())
}

#[test]
fn plain_text_falls_back_to_a_single_node() -> Result<()> {
    let mut canvas = HeadlessCanvas::new();
    pollster::block_on(render_plain(
        &mut canvas,
        "Just a short answer with no markup.",
        &TranscodeOptions::default(),
    ))?;
    let frame = canvas.last_committed().expect("no frame committed");
    assert_eq!(frame.name, "AI Response");
    let texts = frame.texts();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].x, 40.0);
    assert_eq!(texts[0].width, 720.0);
    assert_eq!(frame.height, texts[0].height + 80.0);
    assert_eq!(canvas.notices, vec!["Text added to the canvas!"]);
    Ok(())
}

#[test]
fn mentioned_font_becomes_the_primary_family() -> Result<()> {
    let mut canvas = HeadlessCanvas::new().with_font("Montserrat");
    render(
        &mut canvas,
        "A style guide built around Montserrat.",
        "<h1>Style Guide</h1><p>Body text uses Montserrat throughout.</p>",
    )?;
    let frame = canvas.last_committed().expect("no frame committed");
    let body = frame
        .texts()
        .into_iter()
        .find(|t| t.text.contains("Body text"))
        .expect("no body node");
    assert_eq!(body.family, "Montserrat");
    Ok(())
}
