// End-to-end tests over the public API: markup in, draw calls out.
//
// Covers:
// - full parse -> layout -> paint runs on a realistic page
// - structural recovery (implied end tags, void tags) surviving to paint
// - inherited styling reaching the draw calls
// - document reflow at a different width and pixel ratio

use minnow_engine::layout::LayoutEngine;
use minnow_engine::paint::{DrawSurface, FontSpec, PaintEngine, TextMeasurer};
use minnow_engine::parser::html::HtmlParser;
use minnow_engine::style::{Color, FontWeight, BLUE};

const CHAR_WIDTH: f32 = 8.0;

/// Canvas that records text draws and ignores everything else;
/// advances are a fixed width per character.
#[derive(Default)]
struct ScriptedCanvas {
    texts: Vec<(String, f32, f32)>,
    underlines: Vec<(f32, f32, f32)>,
    colors: Vec<Color>,
    fonts: Vec<FontSpec>,
}

impl TextMeasurer for ScriptedCanvas {
    fn measure(&mut self, text: &str, _font: &FontSpec) -> f32 {
        text.chars().count() as f32 * CHAR_WIDTH
    }
}

impl DrawSurface for ScriptedCanvas {
    fn set_font(&mut self, font: &FontSpec) {
        self.fonts.push(*font);
    }
    fn set_color(&mut self, color: Color) {
        self.colors.push(color);
    }
    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.texts.push((text.to_string(), x, y));
    }
    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, _y2: f32, _line_width: f32) {
        self.underlines.push((x1, x2, y1));
    }
}

fn render(markup: &str, width: f32, ratio: f32) -> (ScriptedCanvas, f32) {
    let dom = HtmlParser::new(markup).parse();
    let root = dom.find_element("body").unwrap_or_else(|| dom.root());
    let blocks = LayoutEngine::new().generate_blocks(&dom, root);
    let mut canvas = ScriptedCanvas::default();
    let height = PaintEngine::new(width, ratio).paint(&blocks, &mut canvas);
    (canvas, height)
}

const PAGE: &str = "\
<!DOCTYPE html>
<html>
<head><title>Field Notes</title></head>
<body>
<h1>Field Notes</h1>
<p>First <b>observation</b> of the season.
<p>See <a href=\"/archive\">the archive</a> for more.
<dl>
  <dt>wingspan
  <dd>about two meters
</dl>
</body>
</html>";

#[test]
fn full_page_renders_in_document_order() {
    let (canvas, height) = render(PAGE, 800.0, 1.0);
    let drawn: String = canvas
        .texts
        .iter()
        .map(|(t, _, _)| t.as_str())
        .collect::<Vec<_>>()
        .join("");
    assert_eq!(
        drawn,
        "Field NotesFirst observation of the season.See the archive for more.wingspanabout two meters"
    );
    assert!(height > 0.0);
}

#[test]
fn title_text_never_reaches_the_canvas_twice() {
    // "Field Notes" appears once for the <h1>; the <title> copy is
    // display: none.
    let (canvas, _) = render(PAGE, 800.0, 1.0);
    let count = canvas
        .texts
        .iter()
        .filter(|(t, _, _)| t.contains("Field"))
        .count();
    assert_eq!(count, 1);
}

#[test]
fn heading_paints_larger_and_bold() {
    let (canvas, _) = render(PAGE, 800.0, 1.0);
    assert!(canvas.fonts.contains(&FontSpec {
        size: 32.0,
        weight: FontWeight::Bold,
    }));
}

#[test]
fn anchor_text_paints_blue_and_underlined() {
    let (canvas, _) = render(PAGE, 800.0, 1.0);
    assert!(canvas.colors.contains(&BLUE));
    assert!(!canvas.underlines.is_empty());
}

#[test]
fn description_entries_paint_on_separate_lines() {
    let (canvas, _) = render(PAGE, 800.0, 1.0);
    let term = canvas
        .texts
        .iter()
        .find(|(t, _, _)| t.starts_with("wingspan"))
        .unwrap();
    let meaning = canvas
        .texts
        .iter()
        .find(|(t, _, _)| t.starts_with("about"))
        .unwrap();
    assert!(meaning.2 > term.2);
    // dd is indented 40 units further than dt.
    assert_eq!(meaning.1 - term.1, 40.0);
}

#[test]
fn narrow_viewport_wraps_and_grows_the_document() {
    let (_, wide) = render(PAGE, 800.0, 1.0);
    let (canvas, narrow) = render(PAGE, 120.0, 1.0);
    assert!(narrow > wide);
    // Wrapped chunks restart at the block's left edge.
    let left_starts = canvas.texts.iter().filter(|(_, x, _)| *x == 8.0).count();
    assert!(left_starts > 4);
}

#[test]
fn pixel_ratio_scales_positions_and_fonts() {
    let (one, _) = render("<p>hello</p>", 800.0, 1.0);
    let (two, _) = render("<p>hello</p>", 800.0, 2.0);
    assert_eq!(one.texts[0].1 * 2.0, two.texts[0].1);
    assert_eq!(one.fonts[0].size * 2.0, two.fonts[0].size);
}

#[test]
fn void_tags_do_not_swallow_following_text() {
    let (canvas, _) = render("<p>before<img src=\"x.png\">after</p>", 800.0, 1.0);
    let drawn: String = canvas
        .texts
        .iter()
        .map(|(t, _, _)| t.as_str())
        .collect::<Vec<_>>()
        .join("");
    assert_eq!(drawn, "beforeafter");
}

#[test]
fn serialization_round_trips_the_recovered_structure() {
    let dom = HtmlParser::new("<p>one<p>two").parse();
    assert_eq!(dom.to_markup(), "<p>\n  one\n</p>\n<p>\n  two\n</p>");
}
