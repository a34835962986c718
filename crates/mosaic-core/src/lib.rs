use thiserror::Error;

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Shrink the rect by `margin` on every side. Never produces a negative size.
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            width: (self.width - 2.0 * margin).max(0.0),
            height: (self.height - 2.0 * margin).max(0.0),
        }
    }

    /// Shrink to at most `width` x `height`, keeping the top-left corner.
    pub fn clamp_size(&self, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: width.map_or(self.width, |w| self.width.min(w as f32)),
            height: height.map_or(self.height, |h| self.height.min(h as f32)),
            ..*self
        }
    }
}

/// Container size in whole pixels, as handed over by the host's measure pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

/// Stable index of a partition node; equal to the order in which it was split off.
pub type SlotIndex = usize;

// ──────────────────────────────────────────────
// Colors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Decode a packed `0xAARRGGBB` value.
    pub fn from_argb(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0), channel(24))
    }

    /// Encode as packed `0xAARRGGBB`, rounding each channel to the nearest byte.
    pub fn to_argb(self) -> u32 {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (byte(self.a) << 24) | (byte(self.r) << 16) | (byte(self.g) << 8) | byte(self.b)
    }

    /// WCAG relative luminance of the opaque color.
    pub fn relative_luminance(self) -> f32 {
        fn linear(c: f32) -> f32 {
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// WCAG contrast ratio between two colors, in `[1, 21]`. Order does not matter.
    pub fn contrast_ratio(self, other: Color) -> f32 {
        let l1 = self.relative_luminance() + 0.05;
        let l2 = other.relative_luminance() + 0.05;
        l1.max(l2) / l1.min(l2)
    }

    /// Linear per-channel blend; `ratio == 0` yields `self`, `ratio == 1` yields `other`.
    pub fn blend(self, other: Color, ratio: f32) -> Color {
        let inverse = 1.0 - ratio;
        Color::new(
            self.r * inverse + other.r * ratio,
            self.g * inverse + other.g * ratio,
            self.b * inverse + other.b * ratio,
            self.a * inverse + other.a * ratio,
        )
    }
}

// ──────────────────────────────────────────────
// Grid types
// ──────────────────────────────────────────────

/// Integer placement of one slot on the host's grid tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpec {
    pub column_start: u32,
    pub column_span: u32,
    pub row_start: u32,
    pub row_span: u32,
}

/// What a slot displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// The n-th image, in image order.
    Image(usize),
    /// The "+N" indicator standing in for hidden images.
    Overflow,
}

/// Geometry of one slot, ready for the host to place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPlacement {
    pub index: SlotIndex,
    pub kind: SlotKind,
    pub cell: CellSpec,
    /// Unmargined pixel box inside the container.
    pub rect: Rect,
}

/// Vertical font metrics in the host's convention: `ascent` is negative
/// (above the baseline), `descent` is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A setter received a degenerate value; nothing was changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Insertion or removal outside the current image range; nothing was changed.
    #[error("index {index} out of range for {len} images")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type GridResult<T> = Result<T, GridError>;

// ──────────────────────────────────────────────
// Trait: TileSurface
// ──────────────────────────────────────────────

/// The drawing surface tiles render into.
/// All visual output goes through this trait.
pub trait TileSurface {
    fn begin_frame(&mut self, size: Size);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Draw `text` horizontally centred on `center_x`, with its baseline at `baseline_y`.
    fn draw_text(
        &mut self,
        text: &str,
        center_x: f32,
        baseline_y: f32,
        text_size: f32,
        color: Color,
        clip: Rect,
    );
    fn font_metrics(&self, text_size: f32) -> FontMetrics;
    fn end_frame(&mut self);
}

// ──────────────────────────────────────────────
// Trait: Tile
// ──────────────────────────────────────────────

/// Anything that can render itself into a slot rectangle.
pub trait Tile {
    fn render(&self, rect: Rect, surface: &mut dyn TileSurface);

    /// Upper bound on the drawn size, in pixels. The slot still reserves its full cell.
    fn requested_size(&self) -> (Option<u32>, Option<u32>) {
        (None, None)
    }
}

// ──────────────────────────────────────────────
// Trait: GridEngine
// ──────────────────────────────────────────────

/// The grid engine assigns slots to images and the overflow indicator.
/// It only knows how many images there are, never what they contain.
pub trait GridEngine {
    fn resize(&mut self, size: Size);
    fn insert_at(&mut self, index: usize) -> GridResult<SlotChange>;
    fn remove_at(&mut self, index: usize) -> GridResult<SlotChange>;
    fn column_count(&self) -> u32;
    fn placements(&self) -> Vec<SlotPlacement>;
}

/// Summary of a mutating engine call, so the host can mirror it on its own tile list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotChange {
    /// Image position that was inserted, if any.
    pub inserted: Option<usize>,
    /// Image position that was removed, if any.
    pub removed: Option<usize>,
    /// Number of images dropped from the end of the image list to honour the ceiling.
    pub evicted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_argb_round_trip_of_known_value() {
        let c = Color::from_argb(0xff111111);
        assert!(approx_eq(c.r, 17.0 / 255.0));
        assert!(approx_eq(c.a, 1.0));
        assert_eq!(c.to_argb(), 0xff111111);
    }

    #[test]
    fn test_contrast_black_white() {
        assert!(approx_eq(Color::BLACK.contrast_ratio(Color::WHITE), 21.0));
        assert!(approx_eq(Color::WHITE.contrast_ratio(Color::WHITE), 1.0));
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Color::rgb(1.0, 0.0, 0.0);
        let b = Color::rgb(0.0, 0.0, 1.0);
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
        let mid = a.blend(b, 0.4);
        assert!(approx_eq(mid.r, 0.6));
        assert!(approx_eq(mid.b, 0.4));
    }

    #[test]
    fn test_inset_clamps_to_zero() {
        let r = Rect::new(0.0, 0.0, 3.0, 10.0).inset(2.0);
        assert_eq!(r, Rect::new(2.0, 2.0, 0.0, 6.0));
    }

    #[test]
    fn test_clamp_size_keeps_corner() {
        let r = Rect::new(10.0, 20.0, 300.0, 200.0);
        assert_eq!(r.clamp_size(Some(100), None), Rect::new(10.0, 20.0, 100.0, 200.0));
        assert_eq!(r.clamp_size(Some(500), Some(50)), Rect::new(10.0, 20.0, 300.0, 50.0));
        assert_eq!(r.clamp_size(None, None), r);
    }

    #[test]
    fn test_error_messages() {
        let e = GridError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(e.to_string(), "index 5 out of range for 3 images");
        let e = GridError::InvalidArgument("width has to be greater than 1".into());
        assert_eq!(e.to_string(), "invalid argument: width has to be greater than 1");
    }
}
