use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{FingertipError, Result};

const MIN_RENDER_SCALE: f64 = 0.5;
const MAX_RENDER_SCALE: f64 = 6.0;
/// One centimetre at 96 dpi, for monitors that do not report their physical size
const DEFAULT_MARKER_SIZE: i32 = 38;
const MM_PER_CM: f64 = 10.0;

/// Reader settings, read from `settings.json` in the user config directory.
/// Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rasterization scale applied to page points
    pub render_scale: f64,
    /// Marker edge length in pixels; one centimetre on the monitor when unset
    pub marker_size: Option<i32>,
    /// Marker glide duration
    pub animation_ms: u64,
    /// Distance from the viewport edge that triggers a line-wise scroll
    pub scroll_margin: f64,
    /// Explicit libpdfium location
    pub pdfium_library: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            marker_size: None,
            animation_ms: 150,
            scroll_margin: 20.0,
            pdfium_library: None,
        }
    }
}

impl Settings {
    /// Load settings from the default location, using defaults on any problem
    pub fn load() -> Self {
        let Some(path) = get_settings_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| FingertipError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw)
            .map_err(|source| FingertipError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })
    }

    fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(raw)?;
        Ok(settings.sanitized())
    }

    /// Clamp values into ranges the renderer can use
    pub fn sanitized(mut self) -> Self {
        if !self.render_scale.is_finite() {
            self.render_scale = Self::default().render_scale;
        }
        self.render_scale = self.render_scale.clamp(MIN_RENDER_SCALE, MAX_RENDER_SCALE);
        self.marker_size = self.marker_size.map(|size| size.max(1));
        self.animation_ms = self.animation_ms.max(1);
        if !self.scroll_margin.is_finite() || self.scroll_margin < 0.0 {
            self.scroll_margin = 0.0;
        }
        self
    }

    /// Marker size in pixels. `monitor` is the monitor's width in logical pixels
    /// and in millimetres.
    pub fn marker_size_px(&self, monitor: Option<(i32, i32)>) -> i32 {
        self.marker_size
            .or_else(|| {
                monitor.and_then(|(width_px, width_mm)| centimetre_in_pixels(width_px, width_mm))
            })
            .unwrap_or(DEFAULT_MARKER_SIZE)
    }
}

/// Pixels spanning one centimetre, None when the physical width is unknown
fn centimetre_in_pixels(width_px: i32, width_mm: i32) -> Option<i32> {
    if width_px <= 0 || width_mm <= 0 {
        return None;
    }
    let size = (width_px as f64 / width_mm as f64 * MM_PER_CM).round() as i32;
    Some(size.max(1))
}

/// Returns the path to the settings file
fn get_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fingertip").join("settings.json"))
}
