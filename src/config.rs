//! Configuration for the command-line front end.
//!
//! Values come from an optional JSON file; anything missing falls back to
//! defaults so the tool works without any configuration at all.
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::audiogram::plot::MAX_IMAGE_EDGE;
use crate::audiogram::PlotStyle;
/// File name of the calibration resource shipped next to the executable.
pub const DEFAULT_CALIBRATION_FILE: &str = "calib.json";
/// Environment variable naming the calibration resource.
pub const CALIBRATION_ENV: &str = "AUDIOGRAM_CALIBRATION";
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    pub calibration_path: Option<PathBuf>,
    pub plot: PlotSettings,
}
/// Output image size in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
}
impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}
impl PlotSettings {
    pub fn style(&self) -> PlotStyle {
        PlotStyle::with_size(
            self.width.clamp(200, MAX_IMAGE_EDGE),
            self.height.clamp(150, MAX_IMAGE_EDGE),
        )
    }
}
impl PlotterConfig {
    /// Load configuration from a JSON file, falling back to defaults if the
    /// file is missing or invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
    /// Calibration resource, in priority order:
    /// 1. command-line flag or `AUDIOGRAM_CALIBRATION`
    /// 2. config file
    /// 3. `calib.json` next to the executable
    /// 4. `calib.json` in the working directory
    pub fn resolve_calibration_path(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }
        if let Some(path) = &self.calibration_path {
            return path.clone();
        }
        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CALIBRATION_FILE)));
        match beside_exe {
            Some(path) if path.exists() => path,
            _ => PathBuf::from(DEFAULT_CALIBRATION_FILE),
        }
    }
}
