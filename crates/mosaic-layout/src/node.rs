use std::fmt;

use mosaic_core::{CellSpec, Rect, Size, SlotIndex};

// ──────────────────────────────────────────────
// PartitionNode: one tile of the recursive bisection
// ──────────────────────────────────────────────

/// A tile covering `1/inverse_width` of the container width and
/// `1/inverse_height` of its height, with its top-left corner at the
/// fractional position `(position_x, position_y)`.
///
/// Divisors are always powers of two and positions are multiples of the
/// matching `1/inverse`, so every value here is exactly representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionNode {
    container: Size,
    position_x: f32,
    position_y: f32,
    inverse_width: u32,
    inverse_height: u32,
    index: SlotIndex,
}

impl PartitionNode {
    /// The root tile: the whole container.
    pub fn new(container: Size) -> Self {
        Self {
            container,
            position_x: 0.0,
            position_y: 0.0,
            inverse_width: 1,
            inverse_height: 1,
            index: 0,
        }
    }

    pub fn position_x(&self) -> f32 {
        self.position_x
    }

    pub fn position_y(&self) -> f32 {
        self.position_y
    }

    pub fn inverse_width(&self) -> u32 {
        self.inverse_width
    }

    pub fn inverse_height(&self) -> u32 {
        self.inverse_height
    }

    pub fn index(&self) -> SlotIndex {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: SlotIndex) {
        self.index = index;
    }

    /// Rendered width in whole pixels.
    pub fn width(&self) -> u32 {
        self.container.width / self.inverse_width
    }

    /// Rendered height in whole pixels.
    pub fn height(&self) -> u32 {
        self.container.height / self.inverse_height
    }

    /// Compute the bisection of this tile without touching it.
    ///
    /// Returns `(earlier_half, later_half)`. Tiles at least as tall as they
    /// are wide are cut horizontally (the later half goes below), wider tiles
    /// are cut vertically (the later half goes to the right). The later half
    /// inherits the receiver's index; callers assign it a fresh one.
    pub fn peek_split(&self) -> (PartitionNode, PartitionNode) {
        let mut earlier = *self;
        let mut later = *self;
        if self.height() >= self.width() {
            earlier.inverse_height *= 2;
            later.inverse_height = earlier.inverse_height;
            later.position_y = self.position_y + 1.0 / earlier.inverse_height as f32;
        } else {
            earlier.inverse_width *= 2;
            later.inverse_width = earlier.inverse_width;
            later.position_x = self.position_x + 1.0 / earlier.inverse_width as f32;
        }
        (earlier, later)
    }

    /// Halve this tile in place and return the other half.
    pub fn split(&mut self) -> PartitionNode {
        let (earlier, later) = self.peek_split();
        *self = earlier;
        later
    }

    /// True if `self` lies at or beyond `other` on both axes.
    pub fn dominates(&self, other: &PartitionNode) -> bool {
        self.position_x >= other.position_x && self.position_y >= other.position_y
    }

    /// Larger of the two divisors: the grid track count this tile needs.
    pub fn finest_divisor(&self) -> u32 {
        self.inverse_width.max(self.inverse_height)
    }

    /// Quantize onto a grid with `track_count` tracks along each axis.
    /// `track_count` must be a multiple of both divisors.
    pub fn cell_spec(&self, track_count: u32) -> CellSpec {
        CellSpec {
            column_start: (self.position_x * track_count as f32) as u32,
            column_span: track_count / self.inverse_width,
            row_start: (self.position_y * track_count as f32) as u32,
            row_span: track_count / self.inverse_height,
        }
    }

    /// Pixel box inside the container, before any margin.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position_x * self.container.width as f32,
            self.position_y * self.container.height as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }
}

impl fmt::Display for PartitionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} @({}, {}) 1/{}x1/{} [{}x{}px]",
            self.index,
            self.position_x,
            self.position_y,
            self.inverse_width,
            self.inverse_height,
            self.width(),
            self.height()
        )
    }
}
