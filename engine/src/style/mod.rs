// Static, hand-authored per-tag styles. Resolution is an exact match
// on the tag name with a wildcard fallback of `display: block`; there
// is no cascade. Inheritance of the inheritable properties happens in
// the layout engine, not here.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

pub const BLACK: Color = Color(0, 0, 0);
pub const BLUE: Color = Color(0, 0, 255);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub display: Display,
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub text_decoration: Option<&'static str>,
    pub margin_top: Option<f32>,
    pub margin_bottom: Option<f32>,
    pub margin_left: Option<f32>,
}

impl Style {
    const fn block() -> Self {
        Self {
            display: Display::Block,
            color: None,
            font_size: None,
            font_weight: None,
            text_decoration: None,
            margin_top: None,
            margin_bottom: None,
            margin_left: None,
        }
    }

    const fn inline() -> Self {
        Self {
            display: Display::Inline,
            ..Self::block()
        }
    }

    pub fn has_underline(&self) -> bool {
        self.text_decoration
            .map(|d| d.contains("underline"))
            .unwrap_or(false)
    }
}

/// Wildcard entry: anything unknown lays out as an unstyled block.
const WILDCARD: Style = Style::block();

const TITLE: Style = Style {
    display: Display::None,
    ..Style::block()
};

const H1: Style = Style {
    font_size: Some(32.0),
    font_weight: Some(FontWeight::Bold),
    margin_top: Some(22.0),
    margin_bottom: Some(22.0),
    ..Style::block()
};

const H2: Style = Style {
    font_size: Some(24.0),
    font_weight: Some(FontWeight::Bold),
    margin_top: Some(20.0),
    margin_bottom: Some(20.0),
    ..Style::block()
};

const ANCHOR: Style = Style {
    color: Some(BLUE),
    text_decoration: Some("underline"),
    ..Style::inline()
};

const P: Style = Style {
    margin_top: Some(16.0),
    margin_bottom: Some(16.0),
    ..Style::block()
};

const DL: Style = Style {
    margin_top: Some(16.0),
    margin_bottom: Some(16.0),
    ..Style::block()
};

const DT: Style = Style::block();

const DD: Style = Style {
    margin_left: Some(40.0),
    ..Style::block()
};

const BOLD: Style = Style {
    font_weight: Some(FontWeight::Bold),
    ..Style::inline()
};

const UNDERLINE: Style = Style {
    text_decoration: Some("underline"),
    ..Style::inline()
};

const INLINE: Style = Style::inline();

/// Resolve a tag name to its style record.
pub fn style_of(tag: &str) -> &'static Style {
    match tag {
        "title" => &TITLE,
        "h1" => &H1,
        "h2" => &H2,
        "a" => &ANCHOR,
        "p" => &P,
        "dl" => &DL,
        "dt" => &DT,
        "dd" => &DD,
        "b" | "strong" => &BOLD,
        "u" => &UNDERLINE,
        "i" | "em" | "span" | "code" | "small" => &INLINE,
        _ => &WILDCARD,
    }
}
