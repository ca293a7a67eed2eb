//! Headless archery session
//!
//! Runs the simulation without a renderer: a scripted archer draws the bow and
//! shoots at the oldest live target every few ticks. Useful for checking balance
//! numbers and determinism (same seed → same summary).

use std::path::PathBuf;

use archery_simulation::logger::{set_log_level, LogLevel};
use archery_simulation::{
    create_headless_app, ArcheryConfig, ArcheryPlugin, ComboState, ConfigError, Difficulty,
    DrawState, FireArrow, ScoreBoard, SpawnDirector, StartSession, SIMULATION_STEP,
};
use bevy::prelude::*;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Bow hand height above the floor.
const SHOULDER: Vec3 = Vec3::new(0.0, 1.6, 0.0);

#[derive(Parser, Debug)]
#[command(name = "archery_simulation", about = "Headless VR archery session")]
struct Args {
    /// RNG seed for spawns and the scripted archer
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of 64 Hz ticks to simulate
    #[arg(long, default_value_t = 3_840)]
    ticks: u32,

    /// Override the configured difficulty (easy, normal, hard)
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// RON config file (defaults are used if missing or invalid)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks between shots
    #[arg(long, default_value_t = 48)]
    fire_every: u32,

    /// Only log Info and above
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), ConfigError> {
    let args = Args::parse();
    if args.quiet {
        set_log_level(LogLevel::Info);
    }

    let mut config = match &args.config {
        Some(path) => ArcheryConfig::load_or_default(path),
        None => ArcheryConfig::default(),
    };
    if let Some(difficulty) = args.difficulty {
        config.spawn.difficulty = difficulty;
    }

    println!(
        "Starting archery headless session (seed: {}, difficulty: {}, ticks: {})",
        args.seed, config.spawn.difficulty, args.ticks
    );

    let plugin = ArcheryPlugin::new(config.clone())?;
    let mut app = create_headless_app(args.seed);
    app.add_plugins(plugin);
    app.world_mut().send_event(StartSession);

    let mut archer = ScriptedArcher::new(args.seed);
    let fire_every = args.fire_every.max(1);

    // first update only initializes the clock
    app.update();
    for tick in 1..=args.ticks {
        if tick % fire_every == 0 {
            if let Some(fire) = archer.aim_and_release(app.world(), &config) {
                app.world_mut().send_event(fire);
            }
        }

        app.update();

        if tick % 640 == 0 {
            let board = app.world().resource::<ScoreBoard>();
            println!(
                "Tick {}: score {} ({} hits / {} shots)",
                tick, board.score, board.hits, board.arrows_shot
            );
        }
    }

    print_summary(app.world(), args.ticks);
    Ok(())
}

/// Aims at the oldest live target with gravity compensation and some hand jitter.
struct ScriptedArcher {
    draw: DrawState,
    rng: ChaCha8Rng,
}

impl ScriptedArcher {
    fn new(seed: u64) -> Self {
        Self {
            draw: DrawState::default(),
            // separate stream: the simulation RNG must only see simulation draws
            rng: ChaCha8Rng::seed_from_u64(seed.rotate_left(17) ^ 0x5EED),
        }
    }

    fn aim_and_release(&mut self, world: &World, config: &ArcheryConfig) -> Option<FireArrow> {
        let target = *world.resource::<SpawnDirector>().active_targets().first()?;
        let target_position = world.get::<Transform>(target)?.translation;

        let draw_distance = self.rng.gen_range(0.35..=0.6);
        self.draw.begin_draw();
        let tension = self.draw.update(
            SHOULDER,
            SHOULDER + Vec3::new(0.0, 0.0, draw_distance),
            &config.bow,
        );

        let speed = config.projectile.speed * tension;
        let jitter = Vec3::new(
            self.rng.gen_range(-0.15..=0.15),
            self.rng.gen_range(-0.15..=0.15),
            0.0,
        );
        let aim_point = if speed > 0.0 {
            let flight_time = SHOULDER.distance(target_position) / speed;
            target_position - 0.5 * config.projectile.acceleration() * flight_time * flight_time
        } else {
            target_position
        };

        self.draw
            .release(SHOULDER, aim_point + jitter - SHOULDER, &config.bow)
    }
}

fn print_summary(world: &World, ticks: u32) {
    let board = world.resource::<ScoreBoard>();
    let combo = world.resource::<ComboState>();
    let director = world.resource::<SpawnDirector>();
    let seconds = ticks as f32 * SIMULATION_STEP.as_secs_f32();

    println!("Session complete after {:.1}s", seconds);
    println!("  score:             {}", board.score);
    println!("  arrows shot:       {}", board.arrows_shot);
    println!("  arrows rejected:   {}", board.arrows_rejected);
    println!("  hits:              {} ({:.0}% accuracy)", board.hits, board.accuracy() * 100.0);
    println!("  targets destroyed: {}", board.targets_destroyed);
    println!("  bonus points:      {}", board.bonus_points);
    println!("  best combo:        x{}", combo.max_combo);
    println!(
        "  targets spawned:   {} ({} still up)",
        director.spawned_total(),
        director.len()
    );
}
