// Line-wrapping painter. Blocks are stacked vertically with collapsed
// margins; runs inside a block flow left to right and wrap greedily at
// word boundaries. All drawing goes through the two traits below so
// the engine never touches a pixel buffer or a font file itself.

use crate::layout::Block;
use crate::style::{Color, FontWeight, BLACK};

/// Page margin in unscaled units, applied on the left and as the
/// starting bottom margin above the first block.
pub const GLOBAL_MARGIN: f32 = 8.0;

/// Font size for text no ancestor styled.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// A fully resolved font request; `size` is already scaled to device
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub weight: FontWeight,
}

/// Horizontal advance of a piece of text in the given font, in device
/// pixels.
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32;
}

/// The drawing half of a canvas. `fill_text` takes the baseline y, not
/// the top of the line.
pub trait DrawSurface {
    fn set_font(&mut self, font: &FontSpec);
    fn set_color(&mut self, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, line_width: f32);
}

pub struct PaintEngine {
    /// Usable width in device pixels; lines wrap at this edge.
    width: f32,
    /// Device pixel ratio. Margins and font sizes are authored in
    /// logical units and multiplied by this before use.
    ratio: f32,
}

impl PaintEngine {
    pub fn new(width: f32, ratio: f32) -> Self {
        Self { width, ratio }
    }

    /// Paint the block sequence top to bottom and return the total
    /// painted height in device pixels.
    pub fn paint<C>(&self, blocks: &[Block], canvas: &mut C) -> f32
    where
        C: TextMeasurer + DrawSurface,
    {
        let mut top = 0.0f32;
        let mut previous_margin_bottom = GLOBAL_MARGIN;

        for block in blocks {
            let style = &block.style;
            let margin_top = style.margin_top.unwrap_or(0.0);
            // Adjacent vertical margins collapse to the larger one.
            top += margin_top.max(previous_margin_bottom) * self.ratio;

            let left = (GLOBAL_MARGIN + style.margin_left.unwrap_or(0.0)) * self.ratio;
            let mut x = left;
            let mut line_height = 0.0f32;

            for run in &block.runs {
                let size = run.size.unwrap_or(DEFAULT_FONT_SIZE) * self.ratio;
                let font = FontSpec {
                    size,
                    weight: run.weight.unwrap_or_default(),
                };
                canvas.set_font(&font);
                canvas.set_color(run.color.unwrap_or(BLACK));

                let mut rest = run.text.as_str();
                while !rest.is_empty() {
                    // Keep the trailing space with its word so advance
                    // widths account for it.
                    let chunk = match rest.find(' ') {
                        Some(i) => {
                            let (chunk, tail) = rest.split_at(i + 1);
                            rest = tail;
                            chunk
                        }
                        None => {
                            let chunk = rest;
                            rest = "";
                            chunk
                        }
                    };

                    let advance = canvas.measure(chunk, &font);
                    if x + advance > self.width && x > left {
                        top += line_height;
                        x = left;
                        line_height = 0.0;
                    }

                    canvas.fill_text(chunk, x, top + size * 0.75);
                    if run.underline {
                        let y = top + size * 0.9;
                        canvas.stroke_line(x, y, x + advance, y, self.ratio);
                    }

                    x += advance;
                    line_height = line_height.max(size);
                }
            }

            top += line_height;
            previous_margin_bottom = style.margin_bottom.unwrap_or(0.0);
        }

        top
    }
}
