//! Stationary targets

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A target dummy. Alive while it has hit points left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: DVec2,
    pub radius: f64,
    pub hp: u32,
    /// Hit points at spawn (for health display)
    pub max_hp: u32,
}

/// Outcome of a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    pub remaining: u32,
    /// This hit brought the target to zero
    pub killed: bool,
}

impl Target {
    pub fn new(id: u32, pos: DVec2, radius: f64, hp: u32) -> Self {
        Self {
            id,
            pos,
            radius,
            hp,
            max_hp: hp,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtract `damage`, saturating at zero
    pub fn take_damage(&mut self, damage: u32) -> DamageResult {
        let was_alive = self.is_alive();
        self.hp = self.hp.saturating_sub(damage);
        DamageResult {
            remaining: self.hp,
            killed: was_alive && !self.is_alive(),
        }
    }
}
