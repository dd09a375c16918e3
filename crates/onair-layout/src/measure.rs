//! Text width measurement

/// Font style of a label
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    /// Value of the CSS/SVG `font-style` property
    pub const fn css(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// Measures rendered text width in pixels
pub trait TextMeasure {
    /// Width of `text` set at `font_px` pixels
    fn text_width(&self, text: &str, font_px: f64, style: FontStyle) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, font_px: f64, style: FontStyle) -> f64 {
        (**self).text_width(text, font_px, style)
    }
}

/// Font-independent width estimate from character classes
///
/// Full-width (CJK, kana, hangul, full-width forms) characters count as one
/// em, everything else as `narrow_em`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimatedMetrics {
    pub narrow_em: f64,
    pub wide_em: f64,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            narrow_em: 0.6,
            wide_em: 1.0,
        }
    }
}

impl EstimatedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of a single character in em units
    pub fn char_em(&self, c: char) -> f64 {
        if is_wide(c) {
            self.wide_em
        } else {
            self.narrow_em
        }
    }
}

impl TextMeasure for EstimatedMetrics {
    fn text_width(&self, text: &str, font_px: f64, _style: FontStyle) -> f64 {
        text.chars().map(|c| self.char_em(c)).sum::<f64>() * font_px
    }
}

/// East Asian wide and full-width ranges
pub fn is_wide(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD
    )
}
