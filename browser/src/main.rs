use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};
use pixels::{Pixels, SurfaceTexture};
use rusttype::{point, Scale};

use engine::dom::{Dom, NodeType};
use engine::font::FontManager;
use engine::layout::LayoutEngine;
use engine::net::fetch_markup;
use engine::paint::{DrawSurface, FontSpec, PaintEngine, TextMeasurer};
use engine::parser::html::HtmlParser;
use engine::style::{Color, FontWeight, BLACK};

const DEFAULT_ADDRESS: &str = "https://example.com";

const FALLBACK_PAGE: &str = r#"
    <title>Minnow</title>
    <h1>Failed to Load Page</h1>
    <p>Could not fetch the requested address.</p>
"#;

fn main() {
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    let markup = match fetch_markup(&address) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to fetch {}: {}", address, e);
            eprintln!("Rendering fallback page");
            FALLBACK_PAGE.to_string()
        }
    };

    let dom = HtmlParser::new(&markup).parse();
    println!("{}", dom.to_markup());

    let window_title = match page_title(&dom) {
        Some(title) => format!("Minnow - {}", title),
        None => "Minnow".to_string(),
    };

    // Lay out from the body when the page has one; bare fragments
    // render from the root.
    let body = dom.find_element("body").unwrap_or_else(|| dom.root());

    let layout_engine = LayoutEngine::new();
    let mut font_manager = FontManager::new();

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(&window_title)
        .with_inner_size(winit::dpi::LogicalSize::new(800, 600))
        .build(&event_loop)
        .unwrap();

    let mut pixels = {
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        Pixels::new(size.width, size.height, surface_texture).unwrap()
    };

    let mut viewport_width = window.inner_size().width;
    let mut viewport_height = window.inner_size().height;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => *control_flow = ControlFlow::Exit,
            Event::WindowEvent {
                event: WindowEvent::Resized(new_size),
                ..
            } => {
                viewport_width = new_size.width;
                viewport_height = new_size.height;
                let surface_texture = SurfaceTexture::new(new_size.width, new_size.height, &window);
                pixels = Pixels::new(new_size.width, new_size.height, surface_texture).unwrap();
                window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                let blocks = layout_engine.generate_blocks(&dom, body);
                let ratio = window.scale_factor() as f32;

                {
                    let frame = pixels.frame_mut();
                    for px in frame.chunks_exact_mut(4) {
                        px.copy_from_slice(&[255, 255, 255, 255]);
                    }

                    let mut canvas = Canvas {
                        frame,
                        fonts: &mut font_manager,
                        width: viewport_width as usize,
                        height: viewport_height as usize,
                        font: FontSpec {
                            size: 16.0 * ratio,
                            weight: FontWeight::Normal,
                        },
                        color: BLACK,
                    };

                    let painter = PaintEngine::new(viewport_width as f32, ratio);
                    painter.paint(&blocks, &mut canvas);
                }

                pixels.render().unwrap();
            }
            _ => {
                window.request_redraw();
            }
        }
    });
}

fn page_title(dom: &Dom) -> Option<String> {
    let title = dom.find_element("title")?;
    for &child in &dom.nodes[title].children {
        if let NodeType::Text(text) = &dom.nodes[child].node_type {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Software canvas over the pixels frame buffer. Text is rasterized
/// with rusttype and alpha-blended against whatever is already in the
/// frame.
struct Canvas<'a> {
    frame: &'a mut [u8],
    fonts: &'a mut FontManager,
    width: usize,
    height: usize,
    font: FontSpec,
    color: Color,
}

const FONT_FAMILY: &str = "serif";

impl<'a> Canvas<'a> {
    fn put_pixel(&mut self, x: usize, y: usize, color: Color, coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * 4;
        if idx + 3 >= self.frame.len() {
            return;
        }
        let cov = (coverage * 255.0) as u32;
        let blend = |bg: u8, fg: u8| ((bg as u32 * (255 - cov) + fg as u32 * cov) / 255) as u8;
        self.frame[idx] = blend(self.frame[idx], color.0);
        self.frame[idx + 1] = blend(self.frame[idx + 1], color.1);
        self.frame[idx + 2] = blend(self.frame[idx + 2], color.2);
        self.frame[idx + 3] = 255;
    }
}

impl<'a> TextMeasurer for Canvas<'a> {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        match self.fonts.load_system_font(FONT_FAMILY, font.weight) {
            Some(f) => {
                let scale = Scale::uniform(font.size);
                text.chars()
                    .map(|c| f.glyph(c).scaled(scale).h_metrics().advance_width)
                    .sum()
            }
            // No usable font on this system: approximate so layout
            // still produces sensible line breaks.
            None => text.chars().count() as f32 * font.size * 0.6,
        }
    }
}

impl<'a> DrawSurface for Canvas<'a> {
    fn set_font(&mut self, font: &FontSpec) {
        self.font = *font;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let font = self.font;
        let color = self.color;
        let Some(f) = self.fonts.load_system_font(FONT_FAMILY, font.weight) else {
            return;
        };
        let scale = Scale::uniform(font.size);

        let mut pen_x = x;
        let mut pixels: Vec<(usize, usize, f32)> = Vec::new();
        for c in text.chars() {
            let glyph = f.glyph(c).scaled(scale).positioned(point(pen_x, y));
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = gx as i32 + bb.min.x;
                    let py = gy as i32 + bb.min.y;
                    if px >= 0 && py >= 0 {
                        pixels.push((px as usize, py as usize, v));
                    }
                });
            }
            pen_x += glyph.unpositioned().h_metrics().advance_width;
        }

        for (px, py, v) in pixels {
            self.put_pixel(px, py, color, v);
        }
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, _y2: f32, line_width: f32) {
        // Only horizontal rules are ever requested.
        let color = self.color;
        let x_start = x1.max(0.0) as usize;
        let x_end = x2.max(0.0) as usize;
        let y_start = y1.max(0.0) as usize;
        let rows = (line_width.round() as usize).max(1);
        for py in y_start..y_start + rows {
            for px in x_start..x_end {
                self.put_pixel(px, py, color, 1.0);
            }
        }
    }
}
