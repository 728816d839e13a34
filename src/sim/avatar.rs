//! Player avatar

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Held movement directions for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAxes {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveAxes {
    /// Per-axis direction in screen space (Y down). Opposing keys cancel.
    pub fn direction(&self) -> DVec2 {
        let x = (self.right as i8 - self.left as i8) as f64;
        let y = (self.down as i8 - self.up as i8) as f64;
        DVec2::new(x, y)
    }
}

/// The player character. Open world: position is never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: DVec2,
}

impl Avatar {
    pub fn new(pos: DVec2) -> Self {
        Self { pos }
    }

    /// Move by held axes, scaled by frame time
    pub fn step(&mut self, axes: MoveAxes, speed: f64, dt: f64) {
        self.pos += axes.direction() * speed * dt;
    }

    /// Where a freshly drawn spear appears
    pub fn anchor(&self, offset: DVec2) -> DVec2 {
        self.pos + offset
    }
}
