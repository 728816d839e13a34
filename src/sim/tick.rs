//! Fixed timestep simulation tick
//!
//! Per tick: move the avatar, handle charge input, aim and charge spears in
//! hand, fly thrown spears, resolve hits, retire spent spears, and respawn
//! the wave once every target is down.

use glam::DVec2;
use rand::Rng;

use super::avatar::MoveAxes;
use super::collision::{out_of_bounds, resolve_hits};
use super::spear::{DestroyCause, Spear};
use super::state::{EncounterState, GameEvent};
use super::target::Target;
use crate::config::MotionScale;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in playfield coordinates (None = unchanged)
    pub pointer: Option<DVec2>,
    /// Start charging a new spear at the avatar's anchor
    pub begin_charge: bool,
    /// Throw the spear being charged
    pub release_charge: bool,
    /// Held movement keys
    pub movement: MoveAxes,
}

impl TickInput {
    /// Drop one-shot triggers so they apply to a single tick only
    pub fn clear_triggers(&mut self) {
        self.begin_charge = false;
        self.release_charge = false;
    }
}

/// What a tick produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// Score after the tick
    pub score: u64,
    /// A wave was cleared (and respawned) during the tick
    pub wave_cleared: bool,
}

impl TickReport {
    /// Fold a later report into this one
    pub fn merge(&mut self, later: TickReport) {
        self.events.extend(later.events);
        self.score = later.score;
        self.wave_cleared |= later.wave_cleared;
    }

    pub fn kills(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::TargetKilled { .. }))
            .count()
    }
}

/// Advance the encounter by one tick of `dt` seconds
pub fn tick(state: &mut EncounterState, input: &TickInput, dt: f64) -> TickReport {
    let mut events = Vec::new();

    state.time_ticks += 1;
    state.clock += dt;
    let now = state.clock;

    // Avatar
    let avatar_speed = state.config().avatar_speed;
    state.avatar.step(input.movement, avatar_speed, dt);

    // Aim
    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }
    let pointer = state.pointer;
    for spear in &mut state.spears {
        spear.aim(pointer);
    }

    // Charge input
    if input.begin_charge {
        if state.charging_spear().is_some() {
            log::trace!("begin charge ignored: a spear is already charging");
        } else {
            let id = state.next_entity_id();
            let anchor = state.avatar.anchor(state.config().spear_anchor_offset);
            let mut spear = Spear::new(id, anchor, pointer, state.config());
            spear.begin_charge(now);
            state.spears.push(spear);
            events.push(GameEvent::SpearCharged { spear_id: id });
        }
    }

    let config = state.config().clone();

    if input.release_charge {
        match state.charging_spear_mut() {
            Some(spear) => {
                spear.release(now, &config);
                events.push(thrown_event(spear));
            }
            None => log::trace!("release ignored: nothing charging"),
        }
    }

    // Charge and fly
    let scale = match config.motion {
        MotionScale::PerTick => 1.0,
        MotionScale::DeltaTime => dt * config.tick_rate,
    };
    for spear in &mut state.spears {
        if spear.charge(now, &config) {
            events.push(thrown_event(spear));
        }
        spear.advance(&config, scale);
    }

    // Hits
    let hits = resolve_hits(
        &mut state.spears,
        &mut state.targets,
        config.collision_reach,
        now,
    );
    for hit in hits {
        events.push(GameEvent::TargetHit {
            target_id: hit.target_id,
            spear_id: hit.spear_id,
            damage: hit.damage,
            remaining: hit.remaining,
        });
        if hit.killed {
            state.score += 1;
            log::info!("Target {} killed (score {})", hit.target_id, state.score);
            events.push(GameEvent::TargetKilled {
                target_id: hit.target_id,
            });
        }
    }

    // Bounds
    let bounds = config.bounds();
    for spear in &mut state.spears {
        if spear.is_thrown() && out_of_bounds(spear.pos, bounds) {
            spear.destroy(now, DestroyCause::LeftBounds);
            log::debug!("Spear {} left the playfield at {:?}", spear.id, spear.pos);
            events.push(GameEvent::SpearLeftBounds { spear_id: spear.id });
        }
    }

    // Retire spent spears
    state.spears.retain(|spear| {
        if spear.is_expired(now, config.grace_window) {
            events.push(GameEvent::SpearExpired { spear_id: spear.id });
            false
        } else {
            true
        }
    });

    // Wave
    let wave_cleared = state.wave_cleared();
    if wave_cleared {
        log::info!("Wave {} cleared", state.wave_index);
        events.push(GameEvent::WaveCleared {
            wave: state.wave_index,
        });
        state.wave_index += 1;
        generate_wave(state);
        events.push(GameEvent::WaveSpawned {
            wave: state.wave_index,
            count: state.targets.len(),
        });
    }

    // Ensure deterministic ordering
    state.normalize_order();

    TickReport {
        events,
        score: state.score,
        wave_cleared,
    }
}

fn thrown_event(spear: &Spear) -> GameEvent {
    log::debug!(
        "Spear {} thrown: speed={:.1} damage={} angle={:.1}",
        spear.id,
        spear.speed,
        spear.damage,
        spear.angle
    );
    GameEvent::SpearThrown {
        spear_id: spear.id,
        speed: spear.speed,
        damage: spear.damage,
    }
}

/// Replace the current targets with a fresh wave at random positions
pub fn generate_wave(state: &mut EncounterState) {
    let config = state.config().clone();
    let (x_min, x_max) = (config.spawn_margin, config.width - config.spawn_margin);
    let (y_min, y_max) = (config.spawn_margin, config.height - config.spawn_margin);

    state.targets.clear();
    for _ in 0..config.num_targets {
        let pos = DVec2::new(
            state.rng.random_range(x_min..=x_max),
            state.rng.random_range(y_min..=y_max),
        );
        let hp = state.rng.random_range(config.min_hp..=config.max_hp);
        let id = state.next_entity_id();
        state
            .targets
            .push(Target::new(id, pos, config.target_radius, hp));
    }

    log::info!(
        "Wave {}: {} targets, hp {}..={}",
        state.wave_index,
        state.targets.len(),
        config.min_hp,
        config.max_hp
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;
    use crate::config::CollisionReach;
    use crate::consts::SIM_DT;
    use crate::sim::spear::SpearState;
    use proptest::prelude::*;

    fn press() -> TickInput {
        TickInput {
            begin_charge: true,
            ..Default::default()
        }
    }

    fn release() -> TickInput {
        TickInput {
            release_charge: true,
            ..Default::default()
        }
    }

    /// Encounter with a single target parked well away from any test spear
    fn quiet_state(config: SimConfig) -> EncounterState {
        let mut state = EncounterState::new(config, 12345).unwrap();
        let id = state.next_entity_id();
        state.targets = vec![Target::new(id, DVec2::new(1500.0, 100.0), 23.0, 1000)];
        state
    }

    #[test]
    fn test_press_and_release() {
        let mut state = quiet_state(SimConfig::default());
        let report = tick(&mut state, &press(), SIM_DT);
        assert!(matches!(report.events[0], GameEvent::SpearCharged { .. }));
        assert_eq!(state.spears.len(), 1);
        assert!(state.spears[0].is_charging());

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.charge_fraction() > 0.0);

        let report = tick(&mut state, &release(), SIM_DT);
        assert!(
            report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::SpearThrown { .. }))
        );
        assert!(state.spears[0].is_thrown());
        assert_eq!(state.charge_fraction(), 0.0);
    }

    #[test]
    fn test_auto_throw_without_release() {
        let mut state = quiet_state(SimConfig::default());
        tick(&mut state, &press(), SIM_DT);
        let ticks = (state.config().charge_time / SIM_DT).ceil() as usize + 1;
        let mut thrown = 0;
        for _ in 0..ticks {
            let report = tick(&mut state, &TickInput::default(), SIM_DT);
            thrown += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::SpearThrown { .. }))
                .count();
        }
        assert_eq!(thrown, 1);
        let spear = &state.spears[0];
        assert!(spear.is_thrown());
        assert_eq!(spear.damage, 100);
        assert_eq!(spear.speed, state.config().max_speed);
    }

    #[test]
    fn test_input_races_ignored() {
        let mut state = quiet_state(SimConfig::default());
        // Release with nothing in hand
        let report = tick(&mut state, &release(), SIM_DT);
        assert!(report.events.is_empty());
        assert!(state.spears.is_empty());

        // Second press while charging
        tick(&mut state, &press(), SIM_DT);
        tick(&mut state, &press(), SIM_DT);
        assert_eq!(state.spears.len(), 1);

        // Second release after the throw
        tick(&mut state, &release(), SIM_DT);
        let report = tick(&mut state, &release(), SIM_DT);
        assert!(
            !report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::SpearThrown { .. }))
        );
    }

    #[test]
    fn test_spear_aims_at_pointer_until_thrown() {
        let mut state = quiet_state(SimConfig::default());
        tick(&mut state, &press(), SIM_DT);
        let anchor = state.spears[0].pos;
        let up = TickInput {
            pointer: Some(anchor - DVec2::new(0.0, 100.0)),
            release_charge: true,
            ..Default::default()
        };
        tick(&mut state, &up, SIM_DT);
        assert!((state.spears[0].angle - 90.0).abs() < 1e-9);
        let aside = TickInput {
            pointer: Some(anchor + DVec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &aside, SIM_DT);
        assert!((state.spears[0].angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_spear_leaves_bounds() {
        let mut state = quiet_state(SimConfig::default());
        // Aim straight down from near the bottom edge
        let input = TickInput {
            pointer: Some(DVec2::new(130.0, 2000.0)),
            begin_charge: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &release(), SIM_DT);
        let mut left = false;
        for _ in 0..200 {
            let report = tick(&mut state, &TickInput::default(), SIM_DT);
            if report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::SpearLeftBounds { .. }))
            {
                left = true;
                let spear = &state.spears[0];
                assert!(matches!(
                    spear.state,
                    SpearState::Destroyed {
                        cause: DestroyCause::LeftBounds,
                        ..
                    }
                ));
                assert!(spear.pos.y > state.config().height);
                break;
            }
        }
        assert!(left);
    }

    #[test]
    fn test_destroyed_spear_removed_after_grace_window() {
        let config = SimConfig {
            grace_window: 0.5,
            ..Default::default()
        };
        let mut state = quiet_state(config);
        let input = TickInput {
            pointer: Some(DVec2::new(130.0, 2000.0)),
            begin_charge: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &release(), SIM_DT);
        while !state.spears[0].is_destroyed() {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let SpearState::Destroyed { at, .. } = state.spears[0].state else {
            unreachable!()
        };
        let mut expired_at = None;
        for _ in 0..200 {
            let report = tick(&mut state, &TickInput::default(), SIM_DT);
            if report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::SpearExpired { .. }))
            {
                expired_at = Some(state.clock);
                break;
            }
            assert_eq!(state.spears.len(), 1);
        }
        let expired_at = expired_at.unwrap();
        assert!(expired_at - at >= 0.5);
        assert!(expired_at - at < 0.5 + 2.0 * SIM_DT);
        assert!(state.spears.is_empty());
    }

    #[test]
    fn test_hit_kills_and_scores() {
        let mut state = quiet_state(SimConfig::default());
        let id = state.targets[0].id;
        let anchor = state.avatar.anchor(state.config().spear_anchor_offset);
        // Park a 30 hp target right in front of the spear
        state.targets[0].pos = anchor + DVec2::new(120.0, 0.0);
        state.targets[0].hp = 30;
        state.targets[0].max_hp = 30;
        let input = TickInput {
            pointer: Some(anchor + DVec2::new(500.0, 0.0)),
            begin_charge: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        // Hold for ~40% charge
        let hold = (0.4 * state.config().charge_time / SIM_DT).round() as usize;
        for _ in 0..hold {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let mut killed = false;
        let mut cleared = false;
        let mut report = tick(&mut state, &release(), SIM_DT);
        for _ in 0..20 {
            killed |= report
                .events
                .contains(&GameEvent::TargetKilled { target_id: id });
            cleared |= report.wave_cleared;
            if killed {
                break;
            }
            report = tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(killed);
        assert_eq!(state.score, 1);
        assert_eq!(report.score, 1);
        // That was the only target: the wave respawned in the same tick
        assert!(cleared);
        assert_eq!(state.wave_index, 1);
        assert_eq!(state.alive_targets(), state.config().num_targets);
    }

    #[test]
    fn test_partial_hit_destroys_spear_only() {
        let mut state = quiet_state(SimConfig::default());
        let anchor = state.avatar.anchor(state.config().spear_anchor_offset);
        state.targets[0].pos = anchor + DVec2::new(150.0, 0.0);
        state.targets[0].hp = 500;
        let input = TickInput {
            pointer: Some(anchor + DVec2::new(500.0, 0.0)),
            begin_charge: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        // Hold for half charge
        let hold = (0.5 * state.config().charge_time / SIM_DT).round() as usize;
        for _ in 0..hold {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        tick(&mut state, &release(), SIM_DT);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let spear = &state.spears[0];
        assert!(spear.damage > 0);
        assert!(matches!(
            spear.state,
            SpearState::Destroyed {
                cause: DestroyCause::Hit,
                ..
            }
        ));
        assert_eq!(state.targets[0].hp, 500 - spear.damage);
        assert_eq!(state.score, 0);
        assert_eq!(state.wave_index, 0);
    }

    #[test]
    fn test_wave_respawns_when_all_dead() {
        let mut state = EncounterState::new(SimConfig::default(), 99).unwrap();
        for target in &mut state.targets {
            target.hp = 0;
        }
        let report = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(report.wave_cleared);
        assert!(report.events.contains(&GameEvent::WaveCleared { wave: 0 }));
        assert_eq!(state.wave_index, 1);
        assert_eq!(state.targets.len(), state.config().num_targets);
        assert_eq!(state.alive_targets(), state.config().num_targets);
        // Killing targets by hand does not score
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_one_shot_targets() {
        let state = EncounterState::new(SimConfig::one_shot(), 3).unwrap();
        assert!(state.targets.iter().all(|t| t.hp == 1));
    }

    #[test]
    fn test_avatar_moves_with_dt() {
        let mut state = quiet_state(SimConfig::default());
        let start = state.avatar.pos;
        let input = TickInput {
            movement: MoveAxes {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, 0.01);
        assert!((state.avatar.pos.x - (start.x + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_delta_time_motion_scales_flight() {
        let config = SimConfig {
            motion: MotionScale::DeltaTime,
            ..Default::default()
        };
        let mut per_tick = quiet_state(SimConfig::default());
        let mut scaled = quiet_state(config);
        for state in [&mut per_tick, &mut scaled] {
            tick(state, &press(), SIM_DT);
            tick(state, &release(), SIM_DT);
        }
        let a = per_tick.spears[0].pos;
        let b = scaled.spears[0].pos;
        tick(&mut per_tick, &TickInput::default(), SIM_DT);
        tick(&mut scaled, &TickInput::default(), SIM_DT * 2.0);
        let step_a = per_tick.spears[0].pos - a;
        let step_b = scaled.spears[0].pos - b;
        assert!((step_b.length() - 2.0 * step_a.length()).abs() < 1e-6);
    }

    #[test]
    fn test_reach_policy_decides_near_miss() {
        fn full_throw_past_target(policy: CollisionReach) -> u32 {
            let config = SimConfig {
                collision_reach: policy,
                ..Default::default()
            };
            let mut state = quiet_state(config);
            let anchor = state.avatar.anchor(state.config().spear_anchor_offset);
            // 100 px beside where the spear lands on its first flight step
            // (270 px/tick launch, decelerated once to 243)
            state.targets[0].pos = anchor + DVec2::new(243.0, -100.0);
            let input = TickInput {
                pointer: Some(anchor + DVec2::new(500.0, 0.0)),
                begin_charge: true,
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);
            for _ in 0..300 {
                tick(&mut state, &TickInput::default(), SIM_DT);
            }
            state.targets[0].hp
        }

        // Full charge: length reach 23 + 200 / 2 = 123, speed reach 23 + 60 = 83
        assert!(full_throw_past_target(CollisionReach::LengthBased) < 1000);
        assert_eq!(full_throw_past_target(CollisionReach::SpeedBased), 1000);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = EncounterState::new(SimConfig::default(), 99999).unwrap();
        let mut state2 = EncounterState::new(SimConfig::default(), 99999).unwrap();

        let inputs = [
            TickInput {
                pointer: Some(DVec2::new(800.0, 400.0)),
                begin_charge: true,
                ..Default::default()
            },
            TickInput::default(),
            release(),
            TickInput::default(),
        ];

        for input in inputs.iter().cycle().take(400) {
            let r1 = tick(&mut state1, input, SIM_DT);
            let r2 = tick(&mut state2, input, SIM_DT);
            assert_eq!(r1, r2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.spears.len(), state2.spears.len());
    }

    proptest! {
        #[test]
        fn waves_spawn_inside_margins(seed in any::<u64>()) {
            let mut state = EncounterState::new(SimConfig::default(), seed).unwrap();
            for target in &mut state.targets {
                target.hp = 0;
            }
            tick(&mut state, &TickInput::default(), SIM_DT);
            let config = state.config();
            prop_assert_eq!(state.targets.len(), config.num_targets);
            for target in &state.targets {
                prop_assert!(target.is_alive());
                prop_assert!(target.pos.x >= config.spawn_margin);
                prop_assert!(target.pos.x <= config.width - config.spawn_margin);
                prop_assert!(target.pos.y >= config.spawn_margin);
                prop_assert!(target.pos.y <= config.height - config.spawn_margin);
                prop_assert!(target.hp >= config.min_hp && target.hp <= config.max_hp);
            }
        }
    }
}
