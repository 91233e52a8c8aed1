use crate::fonts::BuiltinFont;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFamily {
    Helvetica,
    Courier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// Font, size (points) and gray level (0 = black, 255 = white) applied to
/// every primitive drawn until the next change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleContext {
    pub family: FontFamily,
    pub weight: FontWeight,
    pub size: f32,
    pub gray: u8,
}

pub const BLACK: u8 = 0;
pub const GRAY: u8 = 100;

impl Default for StyleContext {
    fn default() -> Self {
        Self::body()
    }
}

impl StyleContext {
    pub const fn body() -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Normal,
            size: 11.0,
            gray: BLACK,
        }
    }

    pub const fn title() -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Bold,
            size: 22.0,
            gray: BLACK,
        }
    }

    /// The "Source:" line keeps the title's weight.
    pub const fn source_line() -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Bold,
            size: 14.0,
            gray: GRAY,
        }
    }

    pub const fn heading1() -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Bold,
            size: 18.0,
            gray: BLACK,
        }
    }

    pub const fn heading2() -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Bold,
            size: 14.0,
            gray: BLACK,
        }
    }

    pub const fn caption() -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Italic,
            size: 9.0,
            gray: GRAY,
        }
    }

    pub const fn missing_image() -> Self {
        Self {
            family: FontFamily::Courier,
            weight: FontWeight::Normal,
            size: 9.0,
            gray: BLACK,
        }
    }

    pub const fn placeholder() -> Self {
        Self {
            family: FontFamily::Courier,
            weight: FontWeight::Normal,
            size: 9.0,
            gray: GRAY,
        }
    }

    pub fn font(&self) -> BuiltinFont {
        match (self.family, self.weight) {
            (FontFamily::Helvetica, FontWeight::Normal) => BuiltinFont::Helvetica,
            (FontFamily::Helvetica, FontWeight::Bold) => BuiltinFont::HelveticaBold,
            (FontFamily::Helvetica, FontWeight::Italic) => BuiltinFont::HelveticaOblique,
            (FontFamily::Helvetica, FontWeight::BoldItalic) => BuiltinFont::HelveticaBoldOblique,
            (FontFamily::Courier, FontWeight::Normal) => BuiltinFont::Courier,
            (FontFamily::Courier, FontWeight::Bold) => BuiltinFont::CourierBold,
            (FontFamily::Courier, FontWeight::Italic) => BuiltinFont::CourierOblique,
            (FontFamily::Courier, FontWeight::BoldItalic) => BuiltinFont::CourierBoldOblique,
        }
    }
}
