//! Encounter state and core simulation types
//!
//! The encounter owns the avatar, every spear in play and the current wave of
//! targets. It is the only mutator of those lists.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::spear::Spear;
use super::target::Target;
use super::tick::generate_wave;
use crate::config::SimConfig;
use crate::error::ConfigResult;

/// Something that happened during a tick, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new spear started charging
    SpearCharged { spear_id: u32 },
    /// A spear left the avatar's hand
    SpearThrown {
        spear_id: u32,
        speed: f64,
        damage: u32,
    },
    /// A spear connected; `remaining` is the target's hit points afterwards
    TargetHit {
        target_id: u32,
        spear_id: u32,
        damage: u32,
        remaining: u32,
    },
    TargetKilled { target_id: u32 },
    SpearLeftBounds { spear_id: u32 },
    /// A destroyed spear's grace window ran out and it was removed
    SpearExpired { spear_id: u32 },
    WaveCleared { wave: u32 },
    WaveSpawned { wave: u32, count: usize },
}

/// Complete encounter state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct EncounterState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    config: SimConfig,
    /// Simulation clock in seconds; charge and grace timers read this
    pub clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current wave index (0-based)
    pub wave_index: u32,
    /// Targets killed so far
    pub score: u64,
    pub avatar: Avatar,
    /// Last known pointer position
    pub pointer: DVec2,
    /// Spears in play (sorted by id)
    pub spears: Vec<Spear>,
    /// Current wave (sorted by id)
    pub targets: Vec<Target>,
    /// Next entity ID
    next_id: u32,
}

impl EncounterState {
    /// Validate `config` and start a session with the first wave spawned
    pub fn new(config: SimConfig, seed: u64) -> ConfigResult<Self> {
        config.validate()?;
        let avatar = Avatar::new(config.avatar_start);
        let pointer = avatar.anchor(config.spear_anchor_offset) + DVec2::X;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            clock: 0.0,
            time_ticks: 0,
            wave_index: 0,
            score: 0,
            avatar,
            pointer,
            spears: Vec::new(),
            targets: Vec::new(),
            next_id: 1,
        };
        generate_wave(&mut state);
        Ok(state)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The spear currently being charged, if any
    pub fn charging_spear(&self) -> Option<&Spear> {
        self.spears.iter().rev().find(|s| s.is_charging())
    }

    pub(crate) fn charging_spear_mut(&mut self) -> Option<&mut Spear> {
        self.spears.iter_mut().rev().find(|s| s.is_charging())
    }

    /// Charge level of the spear in hand, 0 when nothing is charging
    pub fn charge_fraction(&self) -> f64 {
        self.charging_spear().map_or(0.0, |s| s.charge)
    }

    pub fn alive_targets(&self) -> usize {
        self.targets.iter().filter(|t| t.is_alive()).count()
    }

    /// Every target in the wave is down
    pub fn wave_cleared(&self) -> bool {
        self.targets.iter().all(|t| !t.is_alive())
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.spears.sort_by_key(|s| s.id);
        self.targets.sort_by_key(|t| t.id);
    }
}
