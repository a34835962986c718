// Colors of the "+N" overflow indicator.

use mosaic_core::Color;
use mosaic_tile::TextTile;

/// Default indicator background: near-black.
const DEFAULT_MORE_COLOR: u32 = 0xff111111;

/// Share of the background mixed into the text color for the pressed highlight.
const HIGHLIGHT_BLEND: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverflowStyle {
    more_color: Color,
    text_color: Color,
}

impl OverflowStyle {
    pub fn new(more_color: Color) -> Self {
        let white = Color::WHITE.contrast_ratio(more_color);
        let black = Color::BLACK.contrast_ratio(more_color);
        let text_color = if white >= black { Color::WHITE } else { Color::BLACK };
        Self {
            more_color,
            text_color,
        }
    }

    pub fn more_color(&self) -> Color {
        self.more_color
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    /// Overlay color for hosts that draw a pressed state on the indicator.
    pub fn highlight_color(&self) -> Color {
        self.text_color.blend(self.more_color, HIGHLIGHT_BLEND)
    }

    /// Label for `extra` hidden images.
    pub fn label(extra: usize) -> String {
        format!("+{}", extra)
    }

    pub(crate) fn tile(&self, extra: usize) -> TextTile {
        let mut tile = TextTile::with_text(Self::label(extra));
        tile.set_text_color(self.text_color).set_background(self.more_color);
        tile
    }
}

impl Default for OverflowStyle {
    fn default() -> Self {
        Self::new(Color::from_argb(DEFAULT_MORE_COLOR))
    }
}
