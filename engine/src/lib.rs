pub mod dom;
pub mod font;
pub mod layout;
pub mod net;
pub mod paint;
pub mod parser;
pub mod style;

pub use dom::{Dom, NodeId};
pub use layout::{Block, LayoutEngine, RenderRun};
pub use net::{fetch_markup, FetchError};
pub use paint::{DrawSurface, FontSpec, PaintEngine, TextMeasurer, DEFAULT_FONT_SIZE, GLOBAL_MARGIN};
pub use parser::html::HtmlParser;
pub use style::{Color, Display, FontWeight, Style};
