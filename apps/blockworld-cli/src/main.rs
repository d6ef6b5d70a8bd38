use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use blockworld_common::{BlockKind, SandboxConfig, VoxelCoord};
use blockworld_kernel::World;
use blockworld_player::{HeldInputs, MoveIntent, Player, Session};
use blockworld_tools::{WorldInspector, WorldSummary};

/// Wall-clock time assumed per simulated frame.
const FRAME_TIME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "blockworld-cli", about = "Headless driver for the blockworld sandbox")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a world and run it for a number of frames
    Simulate {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Override the configured world seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Hold the forward key for the whole run
        #[arg(long)]
        walk: bool,
        /// Press jump every N frames
        #[arg(long)]
        jump_every: Option<u64>,
        /// Run twice and check both runs end in the same state
        #[arg(long)]
        verify: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Cast the player's probes from a given eye position and view
    Probe {
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: f32,
        #[arg(long, default_value = "2.3", allow_hyphen_values = true)]
        y: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        z: f32,
        /// View yaw in degrees; 0 looks down -z
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        yaw: f32,
        /// View pitch in degrees; negative looks down
        #[arg(long, default_value = "-45", allow_hyphen_values = true)]
        pitch: f32,
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    Config {
        /// YAML configuration file to validate and print
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("blockworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", blockworld_kernel::crate_info());
            println!("query: {}", blockworld_query::crate_info());
            println!("player: {}", blockworld_player::crate_info());
            println!("worldgen: {}", blockworld_worldgen::crate_info());
            println!("tools: {}", blockworld_tools::crate_info());
        }
        Commands::Simulate {
            ticks,
            seed,
            config,
            walk,
            jump_every,
            verify,
            json,
        } => {
            let config = load_config(config.as_deref(), seed)?;
            let script = Script { walk, jump_every };
            let session = simulate(&config, ticks, script)?;
            let report = SimulationReport::new(&session);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.summary);
                println!(
                    "Player: eye=({:.2}, {:.2}, {:.2}) on_ground={}",
                    report.player_eye[0], report.player_eye[1], report.player_eye[2], report.on_ground
                );
            }

            if verify {
                let again = simulate(&config, ticks, script)?;
                let (a, b) = (session.world.state_hash(), again.world.state_hash());
                println!(
                    "Replay: {}",
                    if a == b { "OK" } else { "MISMATCH" }
                );
                if a != b {
                    anyhow::bail!("replay diverged: {a:#x} != {b:#x}");
                }
            }
        }
        Commands::Probe {
            x,
            y,
            z,
            yaw,
            pitch,
            seed,
            config,
            json,
        } => {
            let config = load_config(config.as_deref(), seed)?;
            let world = build_world(&config)?;
            let mut player = Player::new(Vec3::new(x, y, z));
            player.look(yaw.to_radians(), pitch.to_radians());
            let report = ProbeReport::new(&world, &player);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }
        Commands::Config { path } => {
            let config = load_config(path.as_deref(), None)?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<SandboxConfig> {
    let mut config = match path {
        Some(path) => SandboxConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SandboxConfig::default(),
    };
    if let Some(seed) = seed {
        config.world.seed = seed;
    }
    Ok(config)
}

fn build_world(config: &SandboxConfig) -> anyhow::Result<World> {
    let mut world = World::new(config.clone());
    let report = blockworld_worldgen::populate_seeded(&mut world).context("generating world")?;
    tracing::info!(
        blocks = report.blocks_created,
        trees = report.trees.len(),
        creatures = report.creatures.len(),
        seed = config.world.seed,
        "world generated"
    );
    Ok(world)
}

/// Scripted input for a headless run.
#[derive(Debug, Clone, Copy)]
struct Script {
    walk: bool,
    jump_every: Option<u64>,
}

fn simulate(config: &SandboxConfig, ticks: u64, script: Script) -> anyhow::Result<Session> {
    let mut session = Session::new(build_world(config)?);
    for frame in 0..ticks {
        let jump = script.jump_every.is_some_and(|n| n > 0 && frame % n == 0);
        session.set_held_inputs(HeldInputs {
            forward: script.walk,
            jump,
            ..HeldInputs::default()
        });
        session.frame(FRAME_TIME);
    }
    Ok(session)
}

#[derive(Serialize)]
struct SimulationReport {
    summary: WorldSummary,
    player_eye: [f32; 3],
    on_ground: bool,
    active_effects: usize,
}

impl SimulationReport {
    fn new(session: &Session) -> Self {
        Self {
            summary: WorldInspector::summary(&session.world),
            player_eye: session.player.eye.to_array(),
            on_ground: session.player.on_ground,
            active_effects: session.effects.len(),
        }
    }
}

#[derive(Serialize)]
struct TargetReport {
    coord: VoxelCoord,
    kind: BlockKind,
    distance: f32,
    normal: [i32; 3],
    place_at: VoxelCoord,
}

#[derive(Serialize)]
struct ProbeReport {
    eye: [f32; 3],
    view: [f32; 3],
    target: Option<TargetReport>,
    ground_colliding: bool,
    ground_distance: Option<f32>,
    ceiling: bool,
    walls: BTreeMap<&'static str, bool>,
}

impl ProbeReport {
    fn new(world: &World, player: &Player) -> Self {
        let registry = world.registry();
        let physics = &world.config().physics;
        let target = blockworld_player::target(registry, player, physics).map(|hit| TargetReport {
            coord: hit.coord,
            kind: hit.kind,
            distance: hit.distance,
            normal: hit.normal.to_array(),
            place_at: hit.adjacent(),
        });
        let ground = blockworld_query::ground(registry, player.eye, physics);
        let walls = MoveIntent::ALL
            .into_iter()
            .map(|intent| {
                let name = match intent {
                    MoveIntent::Forward => "forward",
                    MoveIntent::Back => "back",
                    MoveIntent::Left => "left",
                    MoveIntent::Right => "right",
                };
                let direction = player.movement_direction(intent);
                (name, blockworld_query::wall(registry, player.eye, direction, physics))
            })
            .collect();
        Self {
            eye: player.eye.to_array(),
            view: player.view_direction().to_array(),
            target,
            ground_colliding: ground.colliding,
            ground_distance: ground.hit.map(|h| h.distance),
            ceiling: blockworld_query::ceiling(registry, player.eye, physics),
            walls,
        }
    }

    fn print(&self) {
        println!(
            "Eye: ({:.2}, {:.2}, {:.2}) view=({:.2}, {:.2}, {:.2})",
            self.eye[0], self.eye[1], self.eye[2], self.view[0], self.view[1], self.view[2]
        );
        match &self.target {
            Some(t) => println!(
                "Target: {} at {} distance={:.2} normal={:?} place_at={}",
                t.kind, t.coord, t.distance, t.normal, t.place_at
            ),
            None => println!("Target: none in reach"),
        }
        match self.ground_distance {
            Some(d) => println!("Ground: colliding={} distance={d:.2}", self.ground_colliding),
            None => println!("Ground: nothing below"),
        }
        println!("Ceiling: {}", self.ceiling);
        for (name, blocked) in &self.walls {
            println!("Wall {name}: {}", if *blocked { "blocked" } else { "clear" });
        }
    }
}
