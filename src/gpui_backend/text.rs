use gpui::{Hsla, ShapedLine, TextRun, Window, font, px};

use crate::layout::TextMeasurer;

const LABEL_FONT: &str = ".SystemUIFont";

/// Shape a single line of label text in the label font.
pub(super) fn shape_label(window: &Window, text: &str, size: f32, color: Hsla) -> ShapedLine {
    let run = TextRun {
        len: text.len(),
        font: font(LABEL_FONT),
        color,
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    window
        .text_system()
        .shape_line(text.to_string().into(), px(size), &[run], None)
}

/// Measures tick labels with the window's text system.
pub struct GpuiTextMeasurer<'a> {
    window: &'a Window,
}

impl<'a> GpuiTextMeasurer<'a> {
    /// Create a measurer for `window`.
    pub fn new(window: &'a Window) -> Self {
        Self { window }
    }
}

impl TextMeasurer for GpuiTextMeasurer<'_> {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let line = shape_label(self.window, text, size, gpui::black());
        let height = f32::from(line.ascent + line.descent);
        // Line height never drops below the monospace fallback's.
        (f32::from(line.width), height.max(size * 1.2))
    }
}
