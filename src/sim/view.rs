//! Read-only snapshot of the encounter for renderers and HUDs
//!
//! Built after a tick completes; nothing here can mutate the simulation.

use glam::DVec2;
use serde::Serialize;

use super::spear::SpearState;
use super::state::EncounterState;

#[derive(Debug, Clone, Serialize)]
pub struct SpearView {
    pub id: u32,
    pub pos: DVec2,
    /// Degrees, screen-space (0 = right, 90 = up)
    pub angle: f64,
    pub length: f64,
    pub width: f64,
    pub state: SpearState,
    pub destroyed: bool,
    /// Progress through the post-destruction grace window (0..=1)
    pub decay: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub pos: DVec2,
    pub radius: f64,
    pub hp: u32,
    pub max_hp: u32,
    pub dead: bool,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub avatar: DVec2,
    pub spears: Vec<SpearView>,
    pub targets: Vec<TargetView>,
    pub score: u64,
    pub wave: u32,
    /// Charge level of the spear in hand, for the charge bar
    pub charge: f64,
    pub width: f64,
    pub height: f64,
}

impl EncounterState {
    pub fn view(&self) -> FrameView {
        let grace = self.config().grace_window;
        FrameView {
            avatar: self.avatar.pos,
            spears: self
                .spears
                .iter()
                .map(|s| SpearView {
                    id: s.id,
                    pos: s.pos,
                    angle: s.angle,
                    length: s.length,
                    width: s.width,
                    state: s.state,
                    destroyed: s.is_destroyed(),
                    decay: s.decay(self.clock, grace),
                })
                .collect(),
            targets: self
                .targets
                .iter()
                .map(|t| TargetView {
                    id: t.id,
                    pos: t.pos,
                    radius: t.radius,
                    hp: t.hp,
                    max_hp: t.max_hp,
                    dead: !t.is_alive(),
                })
                .collect(),
            score: self.score,
            wave: self.wave_index,
            charge: self.charge_fraction(),
            width: self.config().width,
            height: self.config().height,
        }
    }
}
