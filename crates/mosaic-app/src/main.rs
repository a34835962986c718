// Mosaic command-line player
// Builds an image grid from settings and flags, replays scripted edits,
// then prints the slot table and an ASCII rendering of the result.

mod ascii;
mod command;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mosaic_core::{Color, Size, SlotKind};
use mosaic_grid::ImageGrid;
use mosaic_tile::TextTile;

use ascii::AsciiSurface;
use command::Command;
use settings::MosaicSettings;

/// Replays image grid edits and prints the resulting layout.
#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(about = "Replays image grid edits and prints the resulting layout")]
struct Args {
    /// Settings file (default: settings.json in the platform config dir).
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Ceiling on image slots before the "+N" indicator appears.
    #[arg(long)]
    max: Option<usize>,

    /// Container width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Container height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Inset around every tile, in pixels.
    #[arg(long)]
    margin: Option<f32>,

    /// Write the effective settings back to the settings file.
    #[arg(long)]
    save: bool,

    /// Edits to replay: add[:N] insert:I remove:I max:N extra:N
    /// resize:WxH margin:PX color:RRGGBB
    commands: Vec<String>,
}

impl Args {
    fn apply_overrides(&self, settings: &mut MosaicSettings) {
        if let Some(max) = self.max {
            settings.max_images = max;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(margin) = self.margin {
            settings.margin = margin;
        }
    }
}

fn build_grid(settings: &MosaicSettings) -> Result<ImageGrid<TextTile>> {
    let mut grid = ImageGrid::with_max_images(settings.max_images).context("Invalid max_images")?;
    grid.set_margin(settings.margin).context("Invalid margin")?;
    grid.set_more_color(Color::from_argb(settings.more_color));
    grid.resize(Size::new(settings.width, settings.height));
    Ok(grid)
}

fn print_layout(grid: &ImageGrid<TextTile>) {
    println!(
        "{} images, {} hidden, {} tracks",
        grid.image_count(),
        grid.extra_images(),
        grid.column_count()
    );
    for tile in grid.layout() {
        let what = match tile.kind {
            SlotKind::Image(i) => grid
                .image(i)
                .and_then(|image| image.text())
                .unwrap_or("?")
                .to_string(),
            SlotKind::Overflow => grid.overflow_tile().text().unwrap_or("+").to_string(),
        };
        println!(
            "  #{:<3} {:>5}  col {} span {}  row {} span {}  at {},{} {}x{}",
            tile.index,
            what,
            tile.cell.column_start,
            tile.cell.column_span,
            tile.cell.row_start,
            tile.cell.row_span,
            tile.rect.x,
            tile.rect.y,
            tile.rect.width,
            tile.rect.height
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let path = args.settings.clone().or_else(settings::settings_path);
    let mut settings = match &path {
        Some(path) => settings::load_settings(path),
        None => MosaicSettings::default(),
    };
    args.apply_overrides(&mut settings);

    if args.save {
        let path = path.as_deref().context("Cannot determine settings path")?;
        settings::save_settings(&settings, path)?;
    }

    let commands = args
        .commands
        .iter()
        .map(|raw| raw.parse::<Command>())
        .collect::<Result<Vec<_>>>()?;

    let mut grid = build_grid(&settings)?;
    let mut next_id = 0;
    for command in &commands {
        let gone = command
            .apply(&mut grid, &mut next_id)
            .with_context(|| format!("`{}` failed", command))?;
        if !gone.is_empty() {
            log::info!("{}: {} tiles left the grid", command, gone.len());
        }
    }

    print_layout(&grid);

    let mut surface = AsciiSurface::new();
    grid.render(&mut surface);
    print!("{}", surface);
    Ok(())
}
