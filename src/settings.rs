//! Shot tuning settings
//!
//! Loaded from JSON so a host can retune the board without recompiling.
//! Every field falls back to the constants in [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ShotError;

/// How a contact speed at the hole counts as "sunk"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SinkRule {
    /// Only a speed exactly equal to the threshold sinks
    #[default]
    Exact,
    /// Speeds within `velocity_margin` of the threshold sink
    Tolerance,
}

impl SinkRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkRule::Exact => "Exact",
            SinkRule::Tolerance => "Tolerance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "exact" => Some(SinkRule::Exact),
            "tolerance" | "tol" | "margin" => Some(SinkRule::Tolerance),
            _ => None,
        }
    }
}

/// Shot tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Prediction ===
    /// Reflective casts per coin path
    pub max_bounces: usize,
    /// Range of each coin path cast
    pub cast_range: f32,
    /// Gap past the coin edge where the path starts
    pub path_start_margin: f32,
    /// Step off each bounce point
    pub bounce_offset: f32,

    // === Readout ===
    /// World units to meters
    pub distance_scale: f32,

    // === Striker ===
    pub grab_radius: f32,
    pub striker_baseline_y: f32,
    pub striker_min_x: f32,
    pub striker_max_x: f32,

    // === Hole ===
    /// Gravity magnitude for the derived sink threshold
    pub gravity: f32,
    /// Fixed sink threshold; derived from coin/hole distance when absent
    pub sink_threshold_override: Option<f32>,
    pub sink_rule: SinkRule,
    pub velocity_margin: f32,
    /// Speed kept by a body that rolls over the hole too fast
    pub overshoot_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_bounces: MAX_BOUNCES,
            cast_range: CAST_RANGE,
            path_start_margin: PATH_START_MARGIN,
            bounce_offset: BOUNCE_OFFSET,

            distance_scale: DISTANCE_SCALE,

            grab_radius: GRAB_RADIUS,
            striker_baseline_y: STRIKER_BASELINE_Y,
            striker_min_x: STRIKER_MIN_X,
            striker_max_x: STRIKER_MAX_X,

            gravity: GRAVITY,
            sink_threshold_override: None,
            sink_rule: SinkRule::Exact,
            velocity_margin: VELOCITY_MARGIN,
            overshoot_speed: OVERSHOOT_SPEED,
        }
    }
}

impl Settings {
    /// Half-width of the speed band that counts as sunk
    pub fn sink_band(&self) -> f32 {
        match self.sink_rule {
            SinkRule::Exact => 0.0,
            SinkRule::Tolerance => self.velocity_margin,
        }
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<(), ShotError> {
        fn positive(name: &str, value: f32) -> Result<(), ShotError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ShotError::Settings(format!("{} must be positive, got {}", name, value)))
            }
        }

        if self.max_bounces == 0 {
            return Err(ShotError::Settings("max_bounces must be at least 1".to_string()));
        }
        positive("cast_range", self.cast_range)?;
        positive("path_start_margin", self.path_start_margin)?;
        positive("bounce_offset", self.bounce_offset)?;
        positive("distance_scale", self.distance_scale)?;
        positive("grab_radius", self.grab_radius)?;
        positive("gravity", self.gravity)?;
        positive("overshoot_speed", self.overshoot_speed)?;
        if let Some(threshold) = self.sink_threshold_override {
            positive("sink_threshold_override", threshold)?;
        }
        if !(self.velocity_margin.is_finite() && self.velocity_margin >= 0.0) {
            return Err(ShotError::Settings(format!(
                "velocity_margin must be non-negative, got {}",
                self.velocity_margin
            )));
        }
        if !(self.striker_min_x < self.striker_max_x) {
            return Err(ShotError::Settings(format!(
                "striker slider range is empty: {}..{}",
                self.striker_min_x, self.striker_max_x
            )));
        }
        if !self.striker_baseline_y.is_finite() {
            return Err(ShotError::Settings("striker_baseline_y must be finite".to_string()));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ShotError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ShotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShotError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ShotError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
