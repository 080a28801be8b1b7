use std::fs;
use std::path::{Path, PathBuf};

use autocrop_core::cropping::domain::cropper::CropExtent;
use autocrop_core::shared::constants::DEFAULT_MULTIPLIER;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    Legacy,
    Inclusive,
}

impl From<Extent> for CropExtent {
    fn from(extent: Extent) -> Self {
        match extent {
            Extent::Legacy => CropExtent::Legacy,
            Extent::Inclusive => CropExtent::Inclusive,
        }
    }
}

impl From<CropExtent> for Extent {
    fn from(extent: CropExtent) -> Self {
        match extent {
            CropExtent::Legacy => Extent::Legacy,
            CropExtent::Inclusive => Extent::Inclusive,
        }
    }
}

/// Persistent defaults for the command line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub square: bool,
    pub extent: Extent,
    pub multiplier: f32,
    pub output_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            square: false,
            extent: Extent::Legacy,
            multiplier: DEFAULT_MULTIPLIER,
            output_dir: None,
            jobs: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Autocrop").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("Could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
