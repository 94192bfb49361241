//! Text measurement seam
//!
//! Layout only needs widths and a line height, so any font backend can be
//! plugged in behind [`TextMeasure`].

/// Measures text in pixels for a single fixed font.
pub trait TextMeasure {
    /// Advance width of `text`
    fn text_width(&self, text: &str) -> f32;

    /// Height of one line of text (ascent + descent)
    fn line_height(&self) -> f32;
}

/// Fixed-advance metrics, roughly bold Consolas at 12pt on a 96 DPI display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub line_height: f32,
}

impl MonospaceMetrics {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(9.0, 19.0)
    }
}

impl TextMeasure for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str) -> f32 {
        (**self).text_width(text)
    }

    fn line_height(&self) -> f32 {
        (**self).line_height()
    }
}
