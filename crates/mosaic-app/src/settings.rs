// Settings persistence for the mosaic binary.
// Uses platform-native config dir: e.g. ~/Library/Application Support/mosaic/settings.json
// on macOS, ~/.config/mosaic/settings.json on Linux.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicSettings {
    /// Ceiling on real image slots before the "+N" indicator appears.
    pub max_images: usize,
    /// Overflow indicator background as packed `0xAARRGGBB`.
    pub more_color: u32,
    /// Inset around every tile, in pixels.
    pub margin: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for MosaicSettings {
    fn default() -> Self {
        Self {
            max_images: 11,
            more_color: 0xff111111,
            margin: 1.0,
            width: 800,
            height: 400,
        }
    }
}

pub fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("mosaic").join("settings.json"))
}

/// Read settings from `path`. A missing file yields the defaults; a file
/// that fails to parse is reported and also yields the defaults.
pub fn load_settings(path: &Path) -> MosaicSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                MosaicSettings::default()
            }
        },
        Err(_) => MosaicSettings::default(),
    }
}

pub fn save_settings(settings: &MosaicSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("saved settings to {}", path.display());
    Ok(())
}
