// Placeholder tile: a solid background with one line of centred text.
// Implements mosaic_core::Tile; stands in for an image until one is loaded,
// and doubles as the grid's "+N" overflow indicator.

use mosaic_core::{Color, GridError, GridResult, Rect, Tile, TileSurface};

/// Smallest automatic text size, in surface units.
const MIN_AUTO_TEXT_SIZE: f32 = 5.0;

/// Automatic sizing lets glyphs run slightly wider than `width / len`.
const AUTO_WIDTH_FACTOR: f32 = 1.15;

/// Automatic sizing never exceeds half the tile height.
const AUTO_HEIGHT_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct TextTile {
    text: Option<String>,
    text_color: Color,
    background: Color,
    /// Fixed text size; `None` fits the text to the tile.
    text_size: Option<f32>,
    image_width: Option<u32>,
    image_height: Option<u32>,
}

impl TextTile {
    pub fn new() -> Self {
        Self {
            text: None,
            text_color: Color::from_argb(0xff000000),
            background: Color::from_argb(0xffcccccc),
            text_size: None,
            image_width: None,
            image_height: None,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut tile = Self::new();
        tile.text = Some(text.into());
        tile
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.text_color = color;
        self
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) -> &mut Self {
        self.background = color;
        self
    }

    pub fn text_size(&self) -> Option<f32> {
        self.text_size
    }

    pub fn set_text_size(&mut self, size: f32) -> GridResult<&mut Self> {
        if size.is_nan() || size <= 0.0 {
            return Err(GridError::InvalidArgument(
                "text size has to be greater than 0".to_string(),
            ));
        }
        self.text_size = Some(size);
        Ok(self)
    }

    /// Go back to fitting the text to the tile.
    pub fn clear_text_size(&mut self) -> &mut Self {
        self.text_size = None;
        self
    }

    pub fn set_image_width(&mut self, width: u32) -> GridResult<&mut Self> {
        if width <= 1 {
            return Err(GridError::InvalidArgument(
                "width has to be greater than 1".to_string(),
            ));
        }
        self.image_width = Some(width);
        Ok(self)
    }

    pub fn set_image_height(&mut self, height: u32) -> GridResult<&mut Self> {
        if height <= 1 {
            return Err(GridError::InvalidArgument(
                "height has to be greater than 1".to_string(),
            ));
        }
        self.image_height = Some(height);
        Ok(self)
    }

    /// The text to draw: the configured text, or the tile dimensions as `W×H`.
    pub fn display_text(&self, rect: Rect) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => format!("{}×{}", rect.width as u32, rect.height as u32),
        }
    }

    /// Text size for `text` inside `rect`, fitted to the tile unless fixed.
    pub fn effective_text_size(&self, text: &str, rect: Rect) -> f32 {
        if let Some(size) = self.text_size {
            return size;
        }
        let len = text.chars().count().max(1) as u32;
        let per_char = (rect.width as u32 / len) as f32;
        (per_char * AUTO_WIDTH_FACTOR)
            .min(rect.height * AUTO_HEIGHT_FACTOR)
            .max(MIN_AUTO_TEXT_SIZE)
    }
}

impl Default for TextTile {
    fn default() -> Self {
        Self::new()
    }
}

impl Tile for TextTile {
    fn requested_size(&self) -> (Option<u32>, Option<u32>) {
        (self.image_width, self.image_height)
    }

    fn render(&self, rect: Rect, surface: &mut dyn TileSurface) {
        surface.fill_rect(rect, self.background);

        let text = self.display_text(rect);
        let size = self.effective_text_size(&text, rect);
        let metrics = surface.font_metrics(size);

        // Vertically centre the glyph box rather than the baseline.
        let center_x = rect.x + (rect.width / 2.0).floor();
        let baseline_y =
            rect.y + ((rect.height / 2.0).floor() - (metrics.descent + metrics.ascent) / 2.0).trunc();

        log::trace!("text tile {:?} at {:?}, size {}", text, rect, size);
        surface.draw_text(&text, center_x, baseline_y, size, self.text_color, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::{FontMetrics, Size};

    #[derive(Debug, PartialEq)]
    enum Op {
        Fill(Rect, Color),
        Text {
            text: String,
            x: f32,
            y: f32,
            size: f32,
        },
    }

    struct RecordingSurface {
        ops: Vec<Op>,
    }

    impl TileSurface for RecordingSurface {
        fn begin_frame(&mut self, _size: Size) {}

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(Op::Fill(rect, color));
        }

        fn draw_text(
            &mut self,
            text: &str,
            center_x: f32,
            baseline_y: f32,
            text_size: f32,
            _color: Color,
            _clip: Rect,
        ) {
            self.ops.push(Op::Text {
                text: text.to_string(),
                x: center_x,
                y: baseline_y,
                size: text_size,
            });
        }

        fn font_metrics(&self, text_size: f32) -> FontMetrics {
            FontMetrics {
                ascent: -(text_size * 4.0) / 5.0,
                descent: text_size / 5.0,
            }
        }

        fn end_frame(&mut self) {}
    }

    #[test]
    fn test_default_text_is_dimensions() {
        let tile = TextTile::new();
        assert_eq!(tile.display_text(Rect::new(0.0, 0.0, 320.0, 240.0)), "320×240");
    }

    #[test]
    fn test_auto_size_limited_by_width() {
        let tile = TextTile::with_text("+12");
        // 100 / 3 = 33 (integer), * 1.15 = 37.95; height cap is 100.
        let size = tile.effective_text_size("+12", Rect::new(0.0, 0.0, 100.0, 200.0));
        assert!((size - 37.95).abs() < 0.001);
    }

    #[test]
    fn test_auto_size_limited_by_height() {
        let tile = TextTile::with_text("7");
        let size = tile.effective_text_size("7", Rect::new(0.0, 0.0, 400.0, 60.0));
        assert_eq!(size, 30.0);
    }

    #[test]
    fn test_auto_size_has_floor() {
        let tile = TextTile::with_text("a very long caption");
        let size = tile.effective_text_size("a very long caption", Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(size, MIN_AUTO_TEXT_SIZE);
    }

    #[test]
    fn test_fixed_size_wins() {
        let mut tile = TextTile::with_text("x");
        tile.set_text_size(14.0).unwrap();
        assert_eq!(tile.effective_text_size("x", Rect::new(0.0, 0.0, 400.0, 400.0)), 14.0);
        tile.clear_text_size();
        assert_eq!(tile.text_size(), None);
    }

    #[test]
    fn test_invalid_setters_have_no_effect() {
        let mut tile = TextTile::new();
        assert!(matches!(tile.set_text_size(0.0), Err(GridError::InvalidArgument(_))));
        assert!(matches!(tile.set_text_size(f32::NAN), Err(GridError::InvalidArgument(_))));
        assert!(matches!(tile.set_image_width(1), Err(GridError::InvalidArgument(_))));
        assert!(matches!(tile.set_image_height(0), Err(GridError::InvalidArgument(_))));
        assert_eq!(tile, TextTile::new());

        tile.set_image_width(2).unwrap();
        assert_eq!(tile.requested_size(), (Some(2), None));
    }

    #[test]
    fn test_setters_chain() {
        let mut tile = TextTile::new();
        tile.set_text_color(Color::WHITE).set_background(Color::BLACK).set_text("+3");
        assert_eq!(tile.text(), Some("+3"));
        assert_eq!(tile.text_color(), Color::WHITE);
        assert_eq!(tile.background(), Color::BLACK);
    }

    #[test]
    fn test_render_centres_text() {
        let mut tile = TextTile::with_text("7");
        tile.set_text_size(20.0).unwrap();
        let mut surface = RecordingSurface { ops: Vec::new() };
        let rect = Rect::new(10.0, 20.0, 101.0, 60.0);
        tile.render(rect, &mut surface);

        assert_eq!(surface.ops.len(), 2);
        assert_eq!(surface.ops[0], Op::Fill(rect, tile.background()));
        // ascent -16, descent 4: baseline = 30 - (-12 / 2) = 36.
        assert_eq!(
            surface.ops[1],
            Op::Text {
                text: "7".to_string(),
                x: 60.0,
                y: 56.0,
                size: 20.0,
            }
        );
    }
}
