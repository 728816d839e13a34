//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock advanced only by `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod avatar;
pub mod clock;
pub mod collision;
pub mod spear;
pub mod state;
pub mod target;
pub mod tick;
pub mod view;

pub use avatar::{Avatar, MoveAxes};
pub use clock::FixedStepper;
pub use collision::{CollisionResult, HitRecord, resolve_hits, spear_target_collision};
pub use spear::{ChargeStats, DestroyCause, Spear, SpearState};
pub use state::{EncounterState, GameEvent};
pub use target::Target;
pub use tick::{TickInput, TickReport, generate_wave, tick};
pub use view::{FrameView, SpearView, TargetView};
