//! galaxy-probe: generate and fly through Voidsail worlds from the command line.
//!
//! Usage:
//!   galaxy-probe galaxy --seed 42 --systems 2
//!   galaxy-probe fly --seed 42 --ticks 600 --save-dir saves --slot run1
//!   galaxy-probe resume --save-dir saves --slot run1 --ticks 600
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process;

use glam::Vec2;
use tracing::{error, info};

use voidsail_core::catalog::builtin_registry;
use voidsail_core::random::SeededRandom;
use voidsail_procgen::GalaxyBuilder;
use voidsail_sim::save::{load_from_file, save_to_file};
use voidsail_sim::{SimConfig, SimulationEngine};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "galaxy" => cmd_galaxy(&args[2..]),
        "fly" => cmd_fly(&args[2..]),
        "resume" => cmd_resume(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_usage() {
    eprintln!(
        "galaxy-probe: Voidsail world inspection tool\n\
         \n\
         Commands:\n\
         \n\
         galaxy    Generate a galaxy and print its layout\n\
         \n\
           --seed <N>         World seed (default: 42)\n\
           --systems <N>      Star systems to generate (default: 2)\n\
         \n\
         fly       Run the simulation with the camera circling the first planet\n\
         \n\
           --seed <N>         World seed (default: 42)\n\
           --systems <N>      Star systems to generate (default: 2)\n\
           --ticks <N>        Ticks to run (default: 600)\n\
           --save-dir <path>  Write a save here when done (optional)\n\
           --slot <name>      Save slot name (default: probe)\n\
         \n\
         resume    Load a save and keep flying\n\
         \n\
           --save-dir <path>  Directory holding the save\n\
           --slot <name>      Save slot name (default: probe)\n\
           --ticks <N>        Ticks to run (default: 600)\n"
    );
}

// --- Argument helpers ---

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match flag_value(args, flag) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Error: {flag} expects a number, got '{raw}'");
            process::exit(1);
        }),
    }
}

fn sim_config(args: &[String]) -> SimConfig {
    SimConfig {
        seed: parse_number(args, "--seed", 42),
        system_count: parse_number(args, "--systems", 2),
        ..Default::default()
    }
}

// --- Galaxy command ---

fn cmd_galaxy(args: &[String]) {
    let config = sim_config(args);
    let registry = builtin_registry();
    let mut rng = SeededRandom::new(config.seed);
    let galaxy = match GalaxyBuilder::new(&registry, &mut rng).build(config.system_count) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error generating galaxy: {e}");
            process::exit(1);
        }
    };

    println!("seed {}", galaxy.seed);
    for system in &galaxy.systems {
        println!(
            "system {:<12} config={:<10} hard={:<5} at ({:.0}, {:.0}) r={:.0}",
            system.name,
            system.config.name,
            system.hard,
            system.position.x,
            system.position.y,
            system.radius
        );
        for id in &system.planets {
            if let Some(p) = galaxy.planet(*id) {
                println!(
                    "  planet {:<10} config={:<8} dist={:>6.1} ground={:>5.1} grav={:>7.1}",
                    p.name, p.config.name, p.distance, p.ground_height, p.grav_const
                );
            }
        }
        for id in &system.belts {
            if let Some(b) = galaxy.belts.get(id.0 as usize) {
                println!(
                    "  belt   config={:<8} dist={:>6.1} half_width={:.1}",
                    b.config.name, b.distance, b.half_width
                );
            }
        }
    }
    for maze in &galaxy.mazes {
        println!(
            "maze   config={:<10} at ({:.0}, {:.0}) r={:.1}",
            maze.config.name, maze.position.x, maze.position.y, maze.radius
        );
    }
}

// --- Fly / resume commands ---

fn cmd_fly(args: &[String]) {
    let engine = match SimulationEngine::new_game(sim_config(args), builtin_registry()) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error starting simulation: {e}");
            process::exit(1);
        }
    };
    fly(engine, args);
}

fn cmd_resume(args: &[String]) {
    let Some(dir) = flag_value(args, "--save-dir").map(PathBuf::from) else {
        eprintln!("Error: --save-dir <path> is required");
        process::exit(1);
    };
    let slot = flag_value(args, "--slot").unwrap_or("probe");
    let save = match load_from_file(&dir, slot) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading save: {e}");
            process::exit(1);
        }
    };
    let engine = match SimulationEngine::resume(&save, builtin_registry(), SimConfig::default()) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error resuming save: {e}");
            process::exit(1);
        }
    };
    fly(engine, args);
}

/// Circle the camera around the planet nearest to its start and report as it goes.
fn fly(mut engine: SimulationEngine, args: &[String]) {
    let ticks: u64 = parse_number(args, "--ticks", 600);
    let start = engine.camera().position;
    let Some(planet) = engine.galaxy().nearest_planet(start) else {
        eprintln!("Error: galaxy has no planets");
        process::exit(1);
    };
    let planet_id = planet.id;
    let orbit = planet.full_height();

    for i in 0..ticks {
        if let Some(p) = engine.galaxy().planet(planet_id) {
            let angle = i as f32 / ticks.max(1) as f32 * std::f32::consts::TAU;
            let pos = p.position + Vec2::from_angle(angle) * orbit;
            engine.set_camera_position(pos);
        }
        if engine.tick().is_err() {
            break;
        }
        if i % 60 == 0 {
            let stream = engine.stream();
            info!(
                tick = engine.time().tick,
                live = stream.live_count(),
                far = stream.far_count(),
                bodies = engine.physics().body_count(),
                "stream"
            );
        }
    }

    if let Some(report) = engine.fatal_report() {
        error!(tick = report.tick, "run halted, report follows");
        match serde_json::to_string_pretty(report) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{report:?}"),
        }
        process::exit(2);
    }

    let stats = engine.stream().stats();
    info!(
        ticks = engine.time().tick,
        promotions = stats.promotions,
        demotions = stats.demotions,
        removals = stats.removals,
        "done"
    );

    if let Some(dir) = flag_value(args, "--save-dir").map(PathBuf::from) {
        let slot = flag_value(args, "--slot").unwrap_or("probe");
        match save_to_file(&dir, slot, &engine.to_save()) {
            Ok(path) => info!(path = %path.display(), "saved"),
            Err(e) => {
                eprintln!("Error writing save: {e}");
                process::exit(1);
            }
        }
    }
}
