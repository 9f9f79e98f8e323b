//! Neon Shmup headless runner
//!
//! Steps a session at a fixed timestep with no window, no renderer and no
//! speakers. Useful for soak runs, determinism checks and profiling. Stage
//! transitions go to the log; pass `--summary` to get the whole run as JSON.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use neon_shmup::consts;
use neon_shmup::{CueRecorder, Faction, Game, PlayerInput};

#[derive(Parser, Debug)]
#[command(name = "neon-shmup", version, about = "Headless shmup session driver")]
struct Args {
    /// World width in world units
    #[arg(long, default_value_t = consts::WORLD_WIDTH)]
    width: f32,

    /// World height in world units
    #[arg(long, default_value_t = consts::WORLD_HEIGHT)]
    height: f32,

    /// Session seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = consts::FRAME_DT)]
    dt: f32,

    /// Fly the ship with a built-in pilot instead of leaving it idle
    #[arg(long)]
    demo_pilot: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// Everything worth keeping from a headless run.
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    frames: u32,
    sim_time: f32,
    stages_entered: Vec<String>,
    cue_counts: BTreeMap<String, usize>,
    deaths: u32,
    final_ship_count: usize,
    final_player_pos: Option<[f32; 2]>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut game = Game::new(args.width, args.height, args.seed)?;
    let mut cues = CueRecorder::new();

    let mut cue_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut stages_entered: Vec<String> = Vec::new();
    let mut deaths: u32 = 0;
    let mut last_stage: Option<&'static str> = None;

    log::info!(
        "session start: seed {}, {} frames at {} s",
        args.seed,
        args.frames,
        args.dt
    );

    for frame in 0..args.frames {
        let input = if args.demo_pilot {
            demo_input(&game)
        } else {
            PlayerInput::default()
        };
        game.update(args.dt, input, &mut cues);

        let stage = game.stage_name();
        if stage != last_stage {
            if let Some(name) = stage {
                log::info!("frame {frame}: stage {name}");
                stages_entered.push(name.to_string());
                if name == "death" {
                    deaths += 1;
                }
            }
            last_stage = stage;
        }

        for cue in cues.take() {
            *cue_counts.entry(cue.label).or_default() += 1;
        }
    }

    let sim_time = args.frames as f32 * args.dt;
    let shots: usize = cue_counts
        .iter()
        .filter(|(label, _)| label.starts_with("shoot"))
        .map(|(_, count)| count)
        .sum();
    log::info!(
        "session end: {:.1} s simulated, {} stage entries, {} shots, {} deaths",
        sim_time,
        stages_entered.len(),
        shots,
        deaths
    );

    let summary = RunSummary {
        seed: args.seed,
        frames: args.frames,
        sim_time,
        stages_entered,
        cue_counts,
        deaths,
        final_ship_count: game.world().ship_count(),
        final_player_pos: game
            .world()
            .ship(game.player_id())
            .map(|s| [s.pos.x, s.pos.y]),
    };

    if let Some(path) = &args.summary {
        fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        log::info!("summary written to {}", path.display());
    }

    Ok(())
}

/// Keeps a lane on the left, tracks the nearest hostile vertically and
/// never lets go of the trigger.
fn demo_input(game: &Game) -> PlayerInput {
    let world = game.world();
    let Some(ship) = world.ship(game.player_id()) else {
        return PlayerInput::default();
    };

    let size = world.size();
    let hold_x = size.x * 0.2;
    let mut thrust = Vec2::new(((hold_x - ship.pos.x) / 200.0).clamp(-0.4, 0.4), 0.0);

    let nearest = world
        .ships()
        .iter()
        .filter(|s| s.faction == Faction::Hostile)
        .min_by(|a, b| {
            (a.pos.y - ship.pos.y)
                .abs()
                .total_cmp(&(b.pos.y - ship.pos.y).abs())
        });
    if let Some(target) = nearest {
        thrust.y = ((target.pos.y - ship.pos.y) / 200.0).clamp(-0.6, 0.6);
    }

    PlayerInput { thrust, fire: true }
}
