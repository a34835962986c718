// Scripted grid edits, one per command-line argument.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use mosaic_core::{Color, GridResult, Size};
use mosaic_grid::ImageGrid;
use mosaic_tile::TextTile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Append `n` numbered tiles.
    Add(usize),
    /// Insert one numbered tile at an index.
    Insert(usize),
    Remove(usize),
    Max(usize),
    Extra(usize),
    Resize(Size),
    Margin(f32),
    /// Overflow indicator background, `0xAARRGGBB`.
    Color(u32),
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let need_arg = || arg.ok_or_else(|| anyhow!("`{}` needs an argument, e.g. `{}:2`", name, name));
        let count = || -> anyhow::Result<usize> {
            let raw = need_arg()?;
            raw.parse::<usize>()
                .with_context(|| format!("`{}` is not a valid count", raw))
        };

        let command = match name {
            "add" => match arg {
                Some(_) => Command::Add(count()?),
                None => Command::Add(1),
            },
            "insert" => Command::Insert(count()?),
            "remove" => Command::Remove(count()?),
            "max" => Command::Max(count()?),
            "extra" => Command::Extra(count()?),
            "resize" => {
                let raw = need_arg()?;
                let (w, h) = raw
                    .split_once('x')
                    .ok_or_else(|| anyhow!("size `{}` should look like 800x400", raw))?;
                let width = w.parse::<u32>().with_context(|| format!("bad width `{}`", w))?;
                let height = h.parse::<u32>().with_context(|| format!("bad height `{}`", h))?;
                Command::Resize(Size::new(width, height))
            }
            "margin" => {
                let raw = need_arg()?;
                Command::Margin(raw.parse::<f32>().with_context(|| format!("bad margin `{}`", raw))?)
            }
            "color" => {
                let raw = need_arg()?;
                let hex = raw.trim_start_matches("0x").trim_start_matches('#');
                let argb = u32::from_str_radix(hex, 16)
                    .with_context(|| format!("bad color `{}`", raw))?;
                // Six digits means opaque.
                Command::Color(if hex.len() <= 6 { argb | 0xff000000 } else { argb })
            }
            _ => bail!("unknown command `{}`", s),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Add(n) => write!(f, "add:{}", n),
            Command::Insert(i) => write!(f, "insert:{}", i),
            Command::Remove(i) => write!(f, "remove:{}", i),
            Command::Max(n) => write!(f, "max:{}", n),
            Command::Extra(n) => write!(f, "extra:{}", n),
            Command::Resize(size) => write!(f, "resize:{}x{}", size.width, size.height),
            Command::Margin(m) => write!(f, "margin:{}", m),
            Command::Color(argb) => write!(f, "color:{:08x}", argb),
        }
    }
}

impl Command {
    /// Apply to `grid`, numbering new tiles from `next_id`. Returns the tiles
    /// that left the grid, either removed or dropped past the ceiling.
    pub fn apply(&self, grid: &mut ImageGrid<TextTile>, next_id: &mut usize) -> GridResult<Vec<TextTile>> {
        let mut next_tile = || {
            let tile = TextTile::with_text(next_id.to_string());
            *next_id += 1;
            tile
        };

        match *self {
            Command::Add(n) => {
                let mut dropped = Vec::new();
                for _ in 0..n {
                    dropped.extend(grid.add(next_tile())?);
                }
                Ok(dropped)
            }
            Command::Insert(index) => grid.insert(index, next_tile()),
            Command::Remove(index) => grid.remove(index).map(|tile| vec![tile]),
            Command::Max(n) => grid.set_max_images(n),
            Command::Extra(n) => grid.set_extra_images(n),
            Command::Resize(size) => {
                grid.resize(size);
                Ok(Vec::new())
            }
            Command::Margin(margin) => grid.set_margin(margin).map(|()| Vec::new()),
            Command::Color(argb) => {
                grid.set_more_color(Color::from_argb(argb));
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::GridError;

    fn parse(s: &str) -> Command {
        s.parse().unwrap()
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(parse("add"), Command::Add(1));
        assert_eq!(parse("add:4"), Command::Add(4));
        assert_eq!(parse("insert:0"), Command::Insert(0));
        assert_eq!(parse("remove:2"), Command::Remove(2));
        assert_eq!(parse("max:3"), Command::Max(3));
        assert_eq!(parse("extra:12"), Command::Extra(12));
        assert_eq!(parse("resize:640x480"), Command::Resize(Size::new(640, 480)));
        assert_eq!(parse("margin:2.5"), Command::Margin(2.5));
        assert_eq!(parse("color:#eeeeee"), Command::Color(0xffeeeeee));
        assert_eq!(parse("color:0x80112233"), Command::Color(0x80112233));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!("shuffle".parse::<Command>().is_err());
        assert!("remove".parse::<Command>().is_err());
        assert!("max:-1".parse::<Command>().is_err());
        assert!("resize:640".parse::<Command>().is_err());
        assert!("color:zz".parse::<Command>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for text in ["add:2", "remove:0", "resize:800x400", "color:ff111111"] {
            assert_eq!(parse(text).to_string(), text);
        }
    }

    #[test]
    fn apply_numbers_tiles_and_reports_drops() {
        let mut grid = ImageGrid::with_max_images(2).unwrap();
        let mut next_id = 0;
        Command::Resize(Size::new(800, 400)).apply(&mut grid, &mut next_id).unwrap();

        let dropped = Command::Add(3).apply(&mut grid, &mut next_id).unwrap();
        assert_eq!(next_id, 3);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].text(), Some("2"));
        assert_eq!(grid.overflow_tile().text(), Some("+1"));

        let removed = Command::Remove(0).apply(&mut grid, &mut next_id).unwrap();
        assert_eq!(removed[0].text(), Some("0"));
        assert!(!grid.has_overflow());
    }

    #[test]
    fn apply_surfaces_grid_errors() {
        let mut grid: ImageGrid<TextTile> = ImageGrid::new();
        let mut next_id = 0;
        let err = Command::Remove(0).apply(&mut grid, &mut next_id).unwrap_err();
        assert_eq!(err, GridError::IndexOutOfRange { index: 0, len: 0 });
        assert!(Command::Extra(1).apply(&mut grid, &mut next_id).is_err());
    }
}
