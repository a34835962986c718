// Image grid host
// Owns the image tiles and the overflow indicator, keeps them in step with
// the partition engine, and turns slot geometry into margined pixel boxes.

mod style;

use mosaic_core::{
    CellSpec, Color, GridEngine, GridError, GridResult, Rect, Size, SlotChange, SlotIndex,
    SlotKind, Tile, TileSurface,
};
use mosaic_layout::{PartitionTracker, DEFAULT_MAX_SLOTS};
use mosaic_tile::TextTile;

pub use style::OverflowStyle;

/// Default inset around every tile, in pixels.
pub const DEFAULT_MARGIN: f32 = 1.0;

pub const DEFAULT_MAX_IMAGES: usize = DEFAULT_MAX_SLOTS;

/// Where one tile ends up after layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayout {
    pub index: SlotIndex,
    pub kind: SlotKind,
    pub cell: CellSpec,
    /// Pixel box with the margin already removed.
    pub rect: Rect,
}

pub struct ImageGrid<T> {
    engine: PartitionTracker,
    images: Vec<T>,
    overflow: TextTile,
    style: OverflowStyle,
    margin: f32,
}

impl<T: Tile> ImageGrid<T> {
    pub fn new() -> Self {
        let style = OverflowStyle::default();
        Self {
            engine: PartitionTracker::new(),
            images: Vec::new(),
            overflow: style.tile(0),
            style,
            margin: DEFAULT_MARGIN,
        }
    }

    pub fn with_max_images(max_images: usize) -> GridResult<Self> {
        let mut grid = Self::new();
        grid.engine = PartitionTracker::with_max_slots(max_images)?;
        Ok(grid)
    }

    // ── Images ──

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn images(&self) -> &[T] {
        &self.images
    }

    pub fn image(&self, index: usize) -> Option<&T> {
        self.images.get(index)
    }

    /// Append an image. Returns any images dropped to stay under the ceiling.
    pub fn add(&mut self, image: T) -> GridResult<Vec<T>> {
        self.insert(self.images.len(), image)
    }

    /// Insert an image at `index` (`0..=image_count`). Returns any images
    /// dropped from the end to stay under the ceiling.
    pub fn insert(&mut self, index: usize, image: T) -> GridResult<Vec<T>> {
        let change = self.engine.insert_at(index)?;
        self.images.insert(index, image);
        Ok(self.apply(change))
    }

    /// Remove and return the image at `index`.
    pub fn remove(&mut self, index: usize) -> GridResult<T> {
        self.engine.remove_at(index)?;
        let image = self.images.remove(index);
        self.sync_overflow();
        Ok(image)
    }

    // ── Overflow ──

    pub fn max_images(&self) -> usize {
        self.engine.max_slots()
    }

    /// Change the ceiling. Images beyond it are dropped from the end and returned.
    pub fn set_max_images(&mut self, max_images: usize) -> GridResult<Vec<T>> {
        let change = self.engine.set_max_slots(max_images)?;
        Ok(self.apply(change))
    }

    /// Number shown on the overflow indicator.
    pub fn extra_images(&self) -> usize {
        self.engine.extra_count()
    }

    /// Set the number shown on the overflow indicator; zero hides it. If
    /// the grid is below its ceiling, the ceiling drops to the image count.
    pub fn set_extra_images(&mut self, count: usize) -> GridResult<Vec<T>> {
        let change = self.engine.set_extra_count(count)?;
        Ok(self.apply(change))
    }

    pub fn has_overflow(&self) -> bool {
        self.engine.has_overflow()
    }

    pub fn overflow_tile(&self) -> &TextTile {
        &self.overflow
    }

    pub fn more_color(&self) -> Color {
        self.style.more_color()
    }

    /// Background of the overflow indicator; its text switches to whichever
    /// of black or white reads better.
    pub fn set_more_color(&mut self, color: Color) {
        self.style = OverflowStyle::new(color);
        self.sync_overflow();
    }

    pub fn style(&self) -> &OverflowStyle {
        &self.style
    }

    // ── Geometry ──

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: f32) -> GridResult<()> {
        if margin.is_nan() || margin < 0.0 {
            return Err(GridError::InvalidArgument(
                "margin cannot be negative".to_string(),
            ));
        }
        self.margin = margin;
        Ok(())
    }

    pub fn size(&self) -> Size {
        self.engine.container()
    }

    /// Size invalidation from the host's measure pass.
    pub fn resize(&mut self, size: Size) {
        if size != self.engine.container() {
            log::debug!("grid resized to {}x{}", size.width, size.height);
        }
        self.engine.resize(size);
    }

    pub fn column_count(&self) -> u32 {
        self.engine.column_count()
    }

    pub fn engine(&self) -> &PartitionTracker {
        &self.engine
    }

    /// Margined pixel boxes per slot. Images that request a smaller size are
    /// drawn at that size from the cell's top-left corner.
    pub fn layout(&self) -> Vec<TileLayout> {
        self.engine
            .placements()
            .into_iter()
            .map(|p| {
                let mut rect = p.rect.inset(self.margin);
                if let SlotKind::Image(i) = p.kind {
                    if let Some(image) = self.images.get(i) {
                        let (width, height) = image.requested_size();
                        rect = rect.clamp_size(width, height);
                    }
                }
                TileLayout {
                    index: p.index,
                    kind: p.kind,
                    cell: p.cell,
                    rect,
                }
            })
            .collect()
    }

    /// Draw every tile into `surface` as one frame.
    pub fn render(&self, surface: &mut dyn TileSurface) {
        surface.begin_frame(self.size());
        for tile in self.layout() {
            match tile.kind {
                SlotKind::Image(i) => {
                    if let Some(image) = self.images.get(i) {
                        image.render(tile.rect, surface);
                    }
                }
                SlotKind::Overflow => self.overflow.render(tile.rect, surface),
            }
        }
        surface.end_frame();
    }

    // ── Helpers ──

    /// Mirror an engine change on the image list and refresh the indicator.
    fn apply(&mut self, change: SlotChange) -> Vec<T> {
        let keep = self.images.len().saturating_sub(change.evicted);
        let evicted = self.images.split_off(keep);
        if !evicted.is_empty() {
            log::debug!("dropped {} images past the ceiling", evicted.len());
        }
        self.sync_overflow();
        evicted
    }

    fn sync_overflow(&mut self) {
        self.overflow = self.style.tile(self.engine.extra_count());
    }
}

impl<T: Tile> Default for ImageGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}
