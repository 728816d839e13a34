//! Flying Spear - charge-and-throw target practice
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spear lifecycle, collisions, waves)
//! - `config`: Immutable simulation configuration and validation
//! - `error`: Configuration errors
//! - `renderer`: Stateless render adapter (snapshot -> vertices)

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{CollisionReach, FlightModel, MotionScale, SimConfig};
pub use error::{ConfigError, ConfigResult};

use glam::DVec2;

/// Game configuration defaults
pub mod consts {
    /// Fixed simulation timestep (the shipped game capped at 144 FPS)
    pub const SIM_DT: f64 = 1.0 / 144.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f64 = 1600.0;
    pub const SCREEN_HEIGHT: f64 = 900.0;

    /// Avatar defaults
    pub const AVATAR_START: (f64, f64) = (100.0, SCREEN_HEIGHT - 100.0);
    pub const AVATAR_RADIUS: f64 = 15.0;
    /// Pixels per second
    pub const AVATAR_SPEED: f64 = 1000.0;
    /// Spears spawn at this offset from the avatar
    pub const SPEAR_ANCHOR_OFFSET: (f64, f64) = (30.0, -30.0);

    /// Spear defaults
    pub const SPEAR_MIN_SPEED: f64 = 1.0;
    pub const SPEAR_MAX_SPEED: f64 = 60.0;
    pub const SPEAR_IMPULSE: f64 = 4.5;
    pub const SPEAR_LENGTH: f64 = 50.0;
    pub const SPEAR_WIDTH: f64 = 5.0;
    /// Seconds to reach full charge
    pub const CHARGE_TIME: f64 = 1.5;
    pub const DAMAGE_MAX: u32 = 100;
    /// Velocity decay per tick while faster than the steady speed
    pub const DECEL_RATE: f64 = 0.1;
    /// Seconds a destroyed spear lingers for its decay effect
    pub const GRACE_WINDOW: f64 = 1.0;

    /// Target defaults
    pub const NUM_TARGETS: usize = 10;
    pub const TARGET_RADIUS: f64 = 23.0;
    pub const TARGET_MIN_HP: u32 = 5;
    pub const TARGET_MAX_HP: u32 = 150;
    pub const SPAWN_MARGIN: f64 = 50.0;
}

/// Screen-space angle (degrees) from `origin` toward `target`, Y pointing down
#[inline]
pub fn heading_degrees(origin: DVec2, target: DVec2) -> f64 {
    (origin.y - target.y).atan2(target.x - origin.x).to_degrees()
}

/// Unit direction for a screen-space heading (degrees), Y pointing down
#[inline]
pub fn heading_to_dir(degrees: f64) -> DVec2 {
    let rad = degrees.to_radians();
    DVec2::new(rad.cos(), -rad.sin())
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
