// Character-cell TileSurface: each cell stands for CELL_WIDTH x CELL_HEIGHT pixels.

use std::fmt;

use mosaic_core::{Color, FontMetrics, Rect, Size, TileSurface};

pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

/// Backgrounds darker than this are shaded.
const SHADE_LUMINANCE: f32 = 0.05;

#[derive(Debug, Default)]
pub struct AsciiSurface {
    rows: Vec<Vec<char>>,
}

/// Cell range `[start, end)` covered by a pixel rect.
struct CellBox {
    col0: usize,
    col1: usize,
    row0: usize,
    row1: usize,
}

impl CellBox {
    fn of(rect: Rect) -> Self {
        let cell = |v: f32, unit: f32| (v / unit).round().max(0.0) as usize;
        Self {
            col0: cell(rect.x, CELL_WIDTH),
            col1: cell(rect.x + rect.width, CELL_WIDTH),
            row0: cell(rect.y, CELL_HEIGHT),
            row1: cell(rect.y + rect.height, CELL_HEIGHT),
        }
    }

    fn is_interior(&self, col: usize, row: usize) -> bool {
        col > self.col0 && col + 1 < self.col1 && row > self.row0 && row + 1 < self.row1
    }
}

impl AsciiSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, col: usize, row: usize, ch: char) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = ch;
        }
    }
}

impl TileSurface for AsciiSurface {
    fn begin_frame(&mut self, size: Size) {
        let cols = (size.width as f32 / CELL_WIDTH) as usize;
        let rows = (size.height as f32 / CELL_HEIGHT) as usize;
        self.rows = vec![vec![' '; cols]; rows];
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let cells = CellBox::of(rect);
        if cells.col1 <= cells.col0 || cells.row1 <= cells.row0 {
            return;
        }
        let shade = if color.relative_luminance() < SHADE_LUMINANCE { '#' } else { ' ' };
        let (last_col, last_row) = (cells.col1 - 1, cells.row1 - 1);

        for row in cells.row0..cells.row1 {
            for col in cells.col0..cells.col1 {
                let on_col_edge = col == cells.col0 || col == last_col;
                let on_row_edge = row == cells.row0 || row == last_row;
                let ch = match (on_col_edge, on_row_edge) {
                    (true, true) => '+',
                    (false, true) => '-',
                    (true, false) => '|',
                    (false, false) => shade,
                };
                self.put(col, row, ch);
            }
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        center_x: f32,
        baseline_y: f32,
        _text_size: f32,
        _color: Color,
        clip: Rect,
    ) {
        let cells = CellBox::of(clip);
        // Glyphs are one cell tall and sit just above the baseline.
        let row = ((baseline_y - CELL_HEIGHT) / CELL_HEIGHT).round().max(0.0) as usize;
        let len = text.chars().count() as isize;
        let start = (center_x / CELL_WIDTH).round() as isize - len / 2;

        for (i, ch) in text.chars().enumerate() {
            let Ok(col) = usize::try_from(start + i as isize) else {
                continue;
            };
            if cells.is_interior(col, row) {
                self.put(col, row, ch);
            }
        }
    }

    fn font_metrics(&self, _text_size: f32) -> FontMetrics {
        FontMetrics {
            ascent: -CELL_HEIGHT,
            descent: 0.0,
        }
    }

    fn end_frame(&mut self) {}
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_grid::ImageGrid;
    use mosaic_tile::TextTile;

    fn grid(max: usize, size: Size, labels: &[&str]) -> ImageGrid<TextTile> {
        let mut grid = ImageGrid::with_max_images(max).unwrap();
        grid.resize(size);
        for label in labels {
            grid.add(TextTile::with_text(*label)).unwrap();
        }
        grid
    }

    #[test]
    fn two_tiles_side_by_side() {
        let grid = grid(11, Size::new(160, 64), &["0", "1"]);
        let mut surface = AsciiSurface::new();
        grid.render(&mut surface);
        let expected = "\
+--------++--------+
|        ||        |
|    0   ||    1   |
+--------++--------+
";
        assert_eq!(surface.to_string(), expected);
    }

    #[test]
    fn dark_background_is_shaded() {
        let mut surface = AsciiSurface::new();
        surface.begin_frame(Size::new(32, 48));
        surface.fill_rect(Rect::new(0.0, 0.0, 32.0, 48.0), Color::BLACK);
        assert_eq!(surface.to_string(), "+--+\n|##|\n+--+\n");
    }

    #[test]
    fn text_is_clipped_to_the_tile() {
        let mut surface = AsciiSurface::new();
        surface.begin_frame(Size::new(48, 48));
        let rect = Rect::new(0.0, 0.0, 48.0, 48.0);
        surface.fill_rect(rect, Color::WHITE);
        surface.draw_text("overflow", 24.0, 32.0, 12.0, Color::BLACK, rect);
        assert_eq!(surface.to_string(), "+----+\n|erfl|\n+----+\n");
    }

    #[test]
    fn empty_frame_prints_nothing() {
        let mut surface = AsciiSurface::new();
        surface.begin_frame(Size::new(4, 4));
        assert_eq!(surface.to_string(), "");
    }
}
