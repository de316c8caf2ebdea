//! Tunable constants and the static level layout.
//!
//! Defaults reproduce the reference feel of the game: a 1200px wide world, five
//! floating strands, and per-frame (not per-second) physics constants.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::PlatformKind;
use crate::error::GameError;

/// One platform in the level layout. Platforms never move during a session.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlatformSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: PlatformKind,
}

impl PlatformSpec {
    pub const fn new(x: f64, y: f64, width: f64, kind: PlatformKind) -> Self {
        Self { x, y, width, height: 20.0, kind }
    }
}

const REFERENCE_LAYOUT: [PlatformSpec; 5] = [
    PlatformSpec::new(0.0, 450.0, 200.0, PlatformKind::Plain),
    PlatformSpec::new(250.0, 400.0, 150.0, PlatformKind::Plain),
    PlatformSpec::new(450.0, 350.0, 180.0, PlatformKind::Interactive),
    PlatformSpec::new(680.0, 300.0, 200.0, PlatformKind::Plain),
    PlatformSpec::new(920.0, 250.0, 150.0, PlatformKind::Interactive),
];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    // --- Physics (units per frame) ---
    pub gravity: f64,
    pub jump_force: f64, // negative = upward
    pub base_speed: f64,
    pub friction: f64,
    // --- World ---
    pub world_width: f64,
    /// Player y beyond this is a fall-death.
    pub death_y: f64,
    pub camera_lead: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub spawn: (f64, f64),
    pub player_size: (f64, f64),
    pub platforms: Vec<PlatformSpec>,
    // --- Particles ---
    pub particle_life: u32,
    pub jump_burst: usize,
    // --- Session ---
    pub storage_key: String,
    pub game_over_delay_ms: u32,
    pub score_tick_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_force: -15.0,
            base_speed: 5.0,
            friction: 0.8,
            world_width: 1200.0,
            death_y: 600.0,
            camera_lead: 400.0,
            canvas_width: 800,
            canvas_height: 500,
            spawn: (100.0, 300.0),
            player_size: (30.0, 40.0),
            platforms: REFERENCE_LAYOUT.to_vec(),
            particle_life: 60,
            jump_burst: 5,
            storage_key: "geneJumperHighScore".to_string(),
            game_over_delay_ms: 3_000,
            score_tick_ms: 1_000,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        let cfg: GameConfig =
            serde_json::from_str(raw).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.world_width <= 0.0 {
            return Err(GameError::InvalidConfig("world_width must be positive".into()));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(GameError::InvalidConfig("canvas size must be non-zero".into()));
        }
        if self.jump_force >= 0.0 {
            return Err(GameError::InvalidConfig("jump_force must be negative (upward)".into()));
        }
        if self.platforms.is_empty() {
            return Err(GameError::InvalidConfig("level needs at least one platform".into()));
        }
        Ok(())
    }
}
