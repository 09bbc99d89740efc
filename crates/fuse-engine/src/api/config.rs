use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("preview rank range is empty")]
    EmptyPreviewRange,
    #[error("boundary line {boundary} lies outside the container height {height}")]
    BoundaryOutsideWorld { boundary: f32, height: f32 },
}

/// Radius as a function of rank: `base + linear * rank + quadratic * rank^2`,
/// capped at `world_width / 2 - cap_margin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusCurve {
    pub base: f32,
    pub linear: f32,
    pub quadratic: f32,
    /// Distance kept between the largest tile and the walls.
    pub cap_margin: f32,
}

impl Default for RadiusCurve {
    fn default() -> Self {
        Self {
            base: 10.0,
            linear: 7.5,
            quadratic: 0.2,
            cap_margin: 10.0,
        }
    }
}

/// Physical material shared by every tile collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for TileMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.1,
            friction: 0.1,
            density: 1.0,
        }
    }
}

/// Configuration for the simulation core.
///
/// Every field has a default, so a host may send a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Container width in world units.
    pub world_width: f32,
    /// Container height in world units.
    pub world_height: f32,
    /// Thickness of the floor and side walls.
    pub wall_thickness: f32,
    /// Height of the boundary line measured from the container top (Y-down).
    pub boundary_y: f32,
    /// Continuous time above the boundary line that ends the game.
    pub overflow_threshold_ms: f32,
    /// Gravity in world units per second squared. Positive Y is down.
    pub gravity: [f32; 2],
    /// Upper bound on a single integration step.
    pub max_step_ms: f32,
    /// Correction ratios above this shorten the step to `previous * max_correction`.
    pub max_correction: f32,
    /// Spawn height for committed tiles.
    pub spawn_y: f32,
    /// Height at which the preview tile is drawn.
    pub preview_y: f32,
    /// Preview ranks are drawn uniformly from `0..preview_ranks`.
    pub preview_ranks: u32,
    /// Seed for the preview RNG.
    pub seed: u64,
    pub radius: RadiusCurve,
    pub material: TileMaterial,
    /// Initial capacity of the tile render buffer.
    pub max_tiles: usize,
    /// Initial capacity of the per-frame event buffer.
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 300.0,
            world_height: 500.0,
            wall_thickness: 20.0,
            boundary_y: 20.0,
            overflow_threshold_ms: 3000.0,
            gravity: [0.0, 1000.0],
            max_step_ms: 1000.0 / 30.0,
            max_correction: 2.0,
            spawn_y: 0.0,
            preview_y: 10.0,
            preview_ranks: 4,
            seed: 42,
            radius: RadiusCurve::default(),
            material: TileMaterial::default(),
            max_tiles: 256,
            max_events: 32,
        }
    }
}

impl GameConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("wall_thickness", self.wall_thickness),
            ("overflow_threshold_ms", self.overflow_threshold_ms),
            ("max_step_ms", self.max_step_ms),
            ("max_correction", self.max_correction),
            ("radius.base", self.radius.base),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        // A non-negative curve keeps radius non-decreasing in rank.
        let non_negative = [
            ("radius.linear", self.radius.linear),
            ("radius.quadratic", self.radius.quadratic),
            ("radius.cap_margin", self.radius.cap_margin),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.preview_ranks == 0 {
            return Err(ConfigError::EmptyPreviewRange);
        }
        if self.boundary_y < 0.0 || self.boundary_y >= self.world_height {
            return Err(ConfigError::BoundaryOutsideWorld {
                boundary: self.boundary_y,
                height: self.world_height,
            });
        }
        Ok(())
    }

    /// Largest radius any tile may have.
    pub fn radius_cap(&self) -> f32 {
        (self.world_width * 0.5 - self.radius.cap_margin).max(self.radius.base)
    }
}
