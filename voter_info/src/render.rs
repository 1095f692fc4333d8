//! Rendering of a popup layout.
//!
//! The layout is independent from any UI toolkit. A toolkit plugs in by
//! implementing `PopupRenderer`.

use crate::popup::*;

pub trait PopupRenderer {
    type Output;

    fn render(&self, layout: &PopupLayout) -> Self::Output;
}

/// Draws a popup as a box of characters, one line of text per row.
///
/// One body glyph maps to one character cell.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct TextRenderer {
    pub metrics: PopupMetrics,
}

impl Default for TextRenderer {
    fn default() -> Self {
        TextRenderer {
            metrics: PopupMetrics::DEFAULT,
        }
    }
}

impl TextRenderer {
    fn inner_columns(&self, layout: &PopupLayout) -> usize {
        let inner = layout.frame.width - 2.0 * self.metrics.padding;
        if inner <= 0.0 || self.metrics.body_glyph_width <= 0.0 {
            1
        } else {
            ((inner / self.metrics.body_glyph_width).floor() as usize).max(1)
        }
    }
}

impl PopupRenderer for TextRenderer {
    type Output = String;

    fn render(&self, layout: &PopupLayout) -> String {
        let cols = self.inner_columns(layout);
        let border = format!("+{}+\n", "-".repeat(cols + 2));
        let mut out = border.clone();
        for line in layout.lines.iter() {
            let text: String = if line.text.chars().count() > cols {
                let mut s: String = line.text.chars().take(cols - 1).collect();
                s.push(ELLIPSIS);
                s
            } else {
                line.text.clone()
            };
            out.push_str(&format!("| {:<width$} |\n", text, width = cols));
        }
        if layout.lines.is_empty() {
            out.push_str(&format!("| {} |\n", " ".repeat(cols)));
        }
        out.push_str(&border);
        out
    }
}
