//! Simulation configuration
//!
//! One immutable [`SimConfig`] is handed to the encounter at construction.
//! Every field has a compiled default from [`crate::consts`], so a JSON file
//! only needs the keys it wants to override.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// How far from a target's centre a spear connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionReach {
    /// `target.radius + spear.length / 2`
    #[default]
    LengthBased,
    /// `target.radius + spear.speed`
    SpeedBased,
}

/// Flight physics for thrown spears
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum FlightModel {
    /// Launch at `speed * impulse`, bleed `decel_rate` of velocity per tick
    /// until back at the charged speed, then cruise.
    Decelerating { decel_rate: f64 },
    /// Launch at `speed * impulse` and fall under constant per-tick gravity
    Ballistic { gravity: f64 },
}

impl Default for FlightModel {
    fn default() -> Self {
        FlightModel::Decelerating {
            decel_rate: DECEL_RATE,
        }
    }
}

/// How projectile position integration relates to frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionScale {
    /// `position += velocity` once per tick
    #[default]
    PerTick,
    /// `position += velocity * dt * tick_rate`
    DeltaTime,
}

/// Complete, validated simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Playfield ===
    pub width: f64,
    pub height: f64,

    // === Avatar ===
    pub avatar_start: DVec2,
    /// Pixels per second
    pub avatar_speed: f64,
    /// Where new spears appear relative to the avatar
    pub spear_anchor_offset: DVec2,

    // === Spear ===
    pub min_speed: f64,
    pub max_speed: f64,
    pub impulse: f64,
    pub base_length: f64,
    pub base_width: f64,
    /// Seconds to full charge
    pub charge_time: f64,
    pub flight: FlightModel,
    pub motion: MotionScale,
    /// Nominal ticks per second, used by [`MotionScale::DeltaTime`]
    pub tick_rate: f64,
    /// Seconds a destroyed spear lingers before removal
    pub grace_window: f64,

    // === Targets ===
    pub num_targets: usize,
    pub target_radius: f64,
    pub min_hp: u32,
    pub max_hp: u32,
    pub spawn_margin: f64,
    pub collision_reach: CollisionReach,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,

            avatar_start: DVec2::new(AVATAR_START.0, AVATAR_START.1),
            avatar_speed: AVATAR_SPEED,
            spear_anchor_offset: DVec2::new(SPEAR_ANCHOR_OFFSET.0, SPEAR_ANCHOR_OFFSET.1),

            min_speed: SPEAR_MIN_SPEED,
            max_speed: SPEAR_MAX_SPEED,
            impulse: SPEAR_IMPULSE,
            base_length: SPEAR_LENGTH,
            base_width: SPEAR_WIDTH,
            charge_time: CHARGE_TIME,
            flight: FlightModel::default(),
            motion: MotionScale::default(),
            tick_rate: 1.0 / SIM_DT,
            grace_window: GRACE_WINDOW,

            num_targets: NUM_TARGETS,
            target_radius: TARGET_RADIUS,
            min_hp: TARGET_MIN_HP,
            max_hp: TARGET_MAX_HP,
            spawn_margin: SPAWN_MARGIN,
            collision_reach: CollisionReach::default(),
        }
    }
}

fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            allowed: "[0, inf)",
        })
    }
}

fn finite(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            allowed: "finite",
        })
    }
}

impl SimConfig {
    /// Every target dies to any hit (hit points fixed at 1)
    pub fn one_shot() -> Self {
        Self {
            min_hp: 1,
            max_hp: 1,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject anything that would break the simulation (division by zero,
    /// empty spawn area, never-clearing waves).
    pub fn validate(&self) -> ConfigResult<()> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        finite("avatar_start.x", self.avatar_start.x)?;
        finite("avatar_start.y", self.avatar_start.y)?;
        non_negative("avatar_speed", self.avatar_speed)?;
        finite("spear_anchor_offset.x", self.spear_anchor_offset.x)?;
        finite("spear_anchor_offset.y", self.spear_anchor_offset.y)?;

        positive("min_speed", self.min_speed)?;
        positive("max_speed", self.max_speed)?;
        if self.min_speed > self.max_speed {
            return Err(ConfigError::InvalidRange {
                name: "speed",
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        positive("impulse", self.impulse)?;
        positive("base_length", self.base_length)?;
        positive("base_width", self.base_width)?;
        positive("charge_time", self.charge_time)?;
        positive("tick_rate", self.tick_rate)?;
        non_negative("grace_window", self.grace_window)?;
        match self.flight {
            FlightModel::Decelerating { decel_rate } => {
                if !(decel_rate > 0.0 && decel_rate < 1.0) {
                    return Err(ConfigError::OutOfRange {
                        name: "decel_rate",
                        value: decel_rate,
                        allowed: "(0, 1)",
                    });
                }
            }
            FlightModel::Ballistic { gravity } => finite("gravity", gravity)?,
        }

        if self.num_targets == 0 {
            return Err(ConfigError::OutOfRange {
                name: "num_targets",
                value: 0.0,
                allowed: "[1, inf)",
            });
        }
        positive("target_radius", self.target_radius)?;
        if self.min_hp == 0 || self.min_hp > self.max_hp {
            return Err(ConfigError::InvalidRange {
                name: "hit_points",
                min: self.min_hp as f64,
                max: self.max_hp as f64,
            });
        }
        non_negative("spawn_margin", self.spawn_margin)?;
        if 2.0 * self.spawn_margin >= self.width || 2.0 * self.spawn_margin >= self.height {
            return Err(ConfigError::OutOfRange {
                name: "spawn_margin",
                value: self.spawn_margin,
                allowed: "[0, min(width, height) / 2)",
            });
        }

        Ok(())
    }

    /// Playfield size as a vector
    pub fn bounds(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}
