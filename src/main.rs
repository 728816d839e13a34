//! Flying Spear entry point
//!
//! Runs a scripted headless session and prints the final frame as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flying_spear::SimConfig;
use flying_spear::sim::{EncounterState, FixedStepper, GameEvent, TickInput, TickReport};

/// Host frame rate the script pretends to run at
const FRAME_DT: f64 = 1.0 / 60.0;
/// Share of the full charge time each throw is held for; cycles
const HOLD_FRACTIONS: [f64; 4] = [0.2, 0.5, 0.8, 0.95];
/// Frames between a throw and the next charge
const COOLDOWN_FRAMES: u32 = 10;

#[derive(Debug, Parser)]
#[command(name = "flying-spear")]
#[command(about = "Headless charge-and-throw session that prints the final frame as JSON")]
struct CliArgs {
    /// JSON simulation config (defaults when omitted)
    config: Option<PathBuf>,
    /// Simulation ticks to run
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// RNG seed for target waves
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::SpearThrown {
            spear_id,
            speed,
            damage,
        } => log::debug!("Spear {spear_id} thrown at {speed:.1} for {damage} damage"),
        GameEvent::TargetHit {
            target_id,
            damage,
            remaining,
            ..
        } => log::debug!("Target {target_id} took {damage}, {remaining} hp left"),
        GameEvent::TargetKilled { target_id } => log::info!("Target {target_id} killed"),
        GameEvent::WaveCleared { wave } => log::info!("Wave {} cleared", wave + 1),
        other => log::trace!("{other:?}"),
    }
}

/// Aims at the first live target, charges, releases, repeats
#[derive(Debug)]
struct Script {
    /// Frames to hold each charge, below the auto-throw point
    holds: Vec<u32>,
    frame: u32,
    held: u32,
    cooldown: u32,
    throws: usize,
    kills: usize,
}

impl Script {
    fn new(config: &SimConfig) -> Self {
        let full = config.charge_time / FRAME_DT;
        Self {
            holds: HOLD_FRACTIONS
                .iter()
                .map(|f| ((full * f).floor() as u32).max(1))
                .collect(),
            frame: 0,
            held: 0,
            cooldown: 0,
            throws: 0,
            kills: 0,
        }
    }

    fn next_input(&mut self, state: &EncounterState, input: &mut TickInput) {
        self.frame += 1;
        if let Some(target) = state.targets.iter().find(|t| t.is_alive()) {
            input.pointer = Some(target.pos);
        }

        if state.charging_spear().is_some() {
            self.held += 1;
            if self.held >= self.holds[self.throws % self.holds.len()] {
                input.release_charge = true;
            }
        } else if self.cooldown > 0 {
            self.cooldown -= 1;
        } else {
            input.begin_charge = true;
            self.held = 0;
        }
    }

    /// Track throws from the simulation, including automatic full-charge throws
    fn observe(&mut self, report: &TickReport) {
        for event in &report.events {
            if matches!(event, GameEvent::SpearThrown { .. }) {
                self.throws += 1;
                self.held = 0;
                self.cooldown = COOLDOWN_FRAMES;
            }
        }
        self.kills += report.kills();
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => match SimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Rejected config {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    let mut script = Script::new(&config);
    let mut state = match EncounterState::new(config, args.seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Rejected config: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Flying Spear starting with seed: {}", args.seed);

    let mut stepper = FixedStepper::default();
    let mut input = TickInput::default();
    while state.time_ticks < args.ticks {
        script.next_input(&state, &mut input);
        let report = stepper.advance(&mut state, &mut input, FRAME_DT);
        report.events.iter().for_each(log_event);
        script.observe(&report);
    }

    log::info!(
        "Session over after {} ticks ({} frames): {} throws, {} kills, score {}, wave {}",
        state.time_ticks,
        script.frame,
        script.throws,
        script.kills,
        state.score,
        state.wave_index + 1
    );

    match serde_json::to_string_pretty(&state.view()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize frame: {e}");
            ExitCode::FAILURE
        }
    }
}
