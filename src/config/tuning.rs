use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Language of the loading screen text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize tuning: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// All tunable demo parameters, loaded from tuning.ron.
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed movement tick, seconds.
    pub dt: f32,
    /// Forward displacement per tick, in source units.
    pub run_step: f32,
    /// Backward displacement per tick, in source units.
    pub back_step: f32,
    /// Source units per world meter.
    pub units_per_meter: f32,
    /// Field of view in degrees when the window is wider than tall.
    pub landscape_fov_deg: f32,
    /// Field of view in degrees otherwise.
    pub portrait_fov_deg: f32,
    pub map_scale: f32,
    pub camera_distance: f32,
    pub camera_height: f32,
    /// Radians per pixel of mouse drag.
    pub look_sensitivity: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub joystick_radius_px: f32,
    pub joystick_margin_px: f32,
    pub locale: Locale,
    /// Font for the loading text, relative to the asset folder.
    pub font_path: Option<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            run_step: 20.0,
            back_step: 10.0,
            units_per_meter: 100.0,
            landscape_fov_deg: 75.0,
            portrait_fov_deg: 90.0,
            map_scale: 8.0,
            camera_distance: 3.5,
            camera_height: 1.6,
            look_sensitivity: 0.005,
            pitch_min: -1.2,
            pitch_max: 0.6,
            joystick_radius_px: 60.0,
            joystick_margin_px: 40.0,
            locale: Locale::En,
            font_path: None,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("campus_walk")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Step sizes converted to world meters.
    pub fn run_step_m(&self) -> f32 {
        self.run_step / self.units_per_meter.max(f32::EPSILON)
    }

    pub fn back_step_m(&self) -> f32 {
        self.back_step / self.units_per_meter.max(f32::EPSILON)
    }

    pub fn try_load(path: &Path) -> Result<Self, TuningError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| TuningError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn try_save(&self, path: &Path) -> Result<(), TuningError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TuningError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let s = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, s).map_err(|source| TuningError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        Self::load_or_default_at(&Self::file_path())
    }

    /// Only a missing file is created; an unreadable or malformed one is left
    /// untouched so the user's edits survive.
    pub fn load_or_default_at(path: &Path) -> Self {
        if !path.exists() {
            let tuning = Self::default();
            if let Err(e) = tuning.try_save(path) {
                warn!("{e}");
            }
            return tuning;
        }
        match Self::try_load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        if let Err(e) = self.try_save(&Self::file_path()) {
            warn!("{e}");
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }
}
