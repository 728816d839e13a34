//! Spear lifecycle: charge, throw, flight, destruction
//!
//! A spear is created at the avatar's anchor point and walks a one-way state
//! machine:
//!
//! ```text
//! Idle -> Charging -> Thrown -> Destroyed
//! ```
//!
//! While idle or charging it keeps pointing at the cursor. Charging grows its
//! speed, length and damage with held time and throws it automatically once
//! the charge saturates. Once thrown the heading is frozen.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::{FlightModel, SimConfig};
use crate::consts::DAMAGE_MAX;
use crate::{heading_degrees, heading_to_dir, lerp};

/// Why a spear stopped flying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    Hit,
    LeftBounds,
}

/// Spear state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpearState {
    /// Created, not yet charging
    Idle,
    /// Charge input held since `started_at` (sim seconds)
    Charging { started_at: f64 },
    /// In flight
    Thrown,
    /// Spent; kept around until the grace window runs out
    Destroyed { at: f64, cause: DestroyCause },
}

/// Everything derived from how long the charge was held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeStats {
    /// `clamp(elapsed / charge_time, 0, 1)`
    pub fraction: f64,
    pub speed: f64,
    pub length: f64,
    pub damage: u32,
}

impl ChargeStats {
    /// Stats after holding the charge for `elapsed` seconds
    pub fn at(elapsed: f64, config: &SimConfig) -> Self {
        Self::from_fraction((elapsed / config.charge_time).clamp(0.0, 1.0), config)
    }

    pub fn from_fraction(fraction: f64, config: &SimConfig) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        Self {
            fraction,
            speed: lerp(config.min_speed, config.max_speed, fraction)
                .clamp(config.min_speed, config.max_speed),
            length: config.base_length * (1.0 + 3.0 * fraction),
            damage: ((DAMAGE_MAX as f64 * fraction).round() as u32).min(DAMAGE_MAX),
        }
    }
}

/// A thrown (or about to be thrown) spear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spear {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Screen-space heading in degrees (0 = right, 90 = up)
    pub angle: f64,
    pub state: SpearState,
    pub charge: f64,
    /// Steady cruise speed (pixels per tick)
    pub speed: f64,
    pub length: f64,
    pub width: f64,
    /// Hit points removed from a target on impact
    pub damage: u32,
}

impl Spear {
    /// New idle spear at `pos`, pointing at `pointer`
    pub fn new(id: u32, pos: DVec2, pointer: DVec2, config: &SimConfig) -> Self {
        let stats = ChargeStats::from_fraction(0.0, config);
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            angle: heading_degrees(pos, pointer),
            state: SpearState::Idle,
            charge: stats.fraction,
            speed: stats.speed,
            length: stats.length,
            width: config.base_width,
            damage: stats.damage,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SpearState::Idle)
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.state, SpearState::Charging { .. })
    }

    /// Flying and able to hit something
    pub fn is_thrown(&self) -> bool {
        matches!(self.state, SpearState::Thrown)
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, SpearState::Destroyed { .. })
    }

    /// Unit vector of the frozen (or tracked) heading
    pub fn direction(&self) -> DVec2 {
        heading_to_dir(self.angle)
    }

    /// Idle -> Charging. Returns false if the spear was not idle.
    pub fn begin_charge(&mut self, now: f64) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = SpearState::Charging { started_at: now };
        true
    }

    /// Track the pointer while the spear is still in hand
    pub fn aim(&mut self, pointer: DVec2) {
        if self.is_idle() || self.is_charging() {
            self.angle = heading_degrees(self.pos, pointer);
        }
    }

    /// Refresh charge-derived stats. Throws automatically at full charge;
    /// returns true if that happened.
    pub fn charge(&mut self, now: f64, config: &SimConfig) -> bool {
        let SpearState::Charging { started_at } = self.state else {
            return false;
        };
        let elapsed = now - started_at;
        self.apply(ChargeStats::at(elapsed, config));
        if elapsed >= config.charge_time {
            self.launch(config);
            return true;
        }
        false
    }

    /// Release the charge: Charging -> Thrown. Returns false otherwise.
    pub fn release(&mut self, now: f64, config: &SimConfig) -> bool {
        if !self.is_charging() {
            return false;
        }
        if self.charge(now, config) {
            return true;
        }
        self.launch(config);
        true
    }

    fn apply(&mut self, stats: ChargeStats) {
        self.charge = stats.fraction;
        self.speed = stats.speed;
        self.length = stats.length;
        self.damage = stats.damage;
    }

    fn launch(&mut self, config: &SimConfig) {
        self.vel = self.direction() * self.speed * config.impulse;
        self.state = SpearState::Thrown;
    }

    /// One flight step. `scale` is 1.0 for per-tick integration.
    ///
    /// Deceleration is a fixed fraction per call, independent of `scale`.
    pub fn advance(&mut self, config: &SimConfig, scale: f64) {
        if !self.is_thrown() {
            return;
        }
        match config.flight {
            FlightModel::Decelerating { decel_rate } => {
                if self.vel.length() > self.speed {
                    self.vel *= 1.0 - decel_rate;
                } else {
                    self.vel = self.direction() * self.speed;
                }
                self.pos += self.vel * scale;
            }
            FlightModel::Ballistic { gravity } => {
                self.pos += self.vel * scale;
                self.vel.y += gravity * scale;
            }
        }
    }

    /// Thrown -> Destroyed. Returns false if the spear was not flying.
    pub fn destroy(&mut self, now: f64, cause: DestroyCause) -> bool {
        if !self.is_thrown() {
            return false;
        }
        self.state = SpearState::Destroyed { at: now, cause };
        true
    }

    /// Destroyed and past its grace window
    pub fn is_expired(&self, now: f64, grace_window: f64) -> bool {
        match self.state {
            SpearState::Destroyed { at, .. } => now - at >= grace_window,
            _ => false,
        }
    }

    /// Progress through the grace window (0 fresh, 1 gone); 0 if not destroyed
    pub fn decay(&self, now: f64, grace_window: f64) -> f64 {
        match self.state {
            SpearState::Destroyed { at, .. } if grace_window > 0.0 => {
                ((now - at) / grace_window).clamp(0.0, 1.0)
            }
            SpearState::Destroyed { .. } => 1.0,
            _ => 0.0,
        }
    }
}
