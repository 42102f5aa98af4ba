// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! BroadPhase CLI entrypoint.
//!
//! Drives the collision demo without a window:
//!
//! - `broadphase run` simulates frames and summarizes broad-phase work.
//! - `broadphase query` prints the BVH traversal for one shape.
//! - `broadphase tree` dumps the BVH arena.
//! - `broadphase prefs` shows or resets the saved demo prefs.
//!
//! # Usage
//! ```text
//! broadphase <command> [options]
//! ```
//!
//! Results go to stdout (a table, or JSON with `--json`); logs go to stderr.
//! The CLI exits with code `0` on success and non-zero on error.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use broadphase_app_core::config::ConfigService;
use broadphase_app_core::prefs::{DemoPrefs, PREFS_KEY};
use broadphase_config_fs::FsConfigStore;
use broadphase_geom::{trace_candidates, TraceCounts};
use broadphase_sim::{BroadPhaseMode, FrameReport, Scene, SimConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::render::RunSummary;

#[derive(Parser, Debug)]
#[command(
    name = "broadphase",
    version,
    about = "BroadPhase collision demo: headless runs, traces, tree dumps",
    disable_help_subcommand = true
)]
struct Cli {
    /// Log per-frame detail (debug level) unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Directory holding saved prefs (defaults to the platform config dir).
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate frames and summarize broad-phase work.
    Run(RunArgs),
    /// Print the traversal trace of one shape's query.
    Query(QueryArgs),
    /// Dump the BVH built on the last simulated frame.
    Tree(TreeArgs),
    /// Inspect or reset the saved demo prefs.
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

/// Overrides applied on top of the saved prefs.
#[derive(Args, Debug)]
struct SimArgs {
    /// Seed for shape spawning.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of shapes (5..=200).
    #[arg(long)]
    count: Option<usize>,

    /// Speed multiplier (0..=3).
    #[arg(long)]
    speed: Option<f32>,

    /// Broad-phase strategy.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Also run brute force every frame and flag disagreements.
    #[arg(long)]
    compare: bool,

    /// Seconds per simulated frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

impl SimArgs {
    fn apply(&self, mut config: SimConfig) -> SimConfig {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(count) = self.count {
            config.target_count = count;
        }
        if let Some(speed) = self.speed {
            config.speed_mult = speed;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if self.compare {
            config.compare_brute_force = true;
        }
        config
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Bvh,
    BruteForce,
}

impl From<ModeArg> for BroadPhaseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Bvh => Self::Bvh,
            ModeArg::BruteForce => Self::BruteForce,
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    sim: SimArgs,

    /// Frames to simulate.
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// Emit the summary and per-frame stats as JSON.
    #[arg(long)]
    json: bool,

    /// Persist the effective settings as the new prefs.
    #[arg(long)]
    save_prefs: bool,
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[command(flatten)]
    sim: SimArgs,

    /// Index of the shape whose box is queried.
    #[arg(long)]
    shape: usize,

    /// Frames to simulate before recording the trace.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// Emit the trace as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TreeArgs {
    #[command(flatten)]
    sim: SimArgs,

    /// Frames to simulate before dumping the tree.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// Emit the arena as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Print the effective prefs as JSON.
    Show,
    /// Forget the saved prefs.
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = open_config(cli.config_dir.as_deref())?;
    match cli.command {
        Commands::Run(args) => cmd_run(&config, &args),
        Commands::Query(args) => cmd_query(&config, &args),
        Commands::Tree(args) => cmd_tree(&config, &args),
        Commands::Prefs(cmd) => cmd_prefs(&config, &cmd),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_config(dir: Option<&Path>) -> Result<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }
    .context("failed to open config store")?;
    Ok(ConfigService::new(store))
}

fn load_prefs(config: &ConfigService<FsConfigStore>) -> Result<DemoPrefs> {
    DemoPrefs::load(config).with_context(|| {
        format!(
            "failed to load prefs from {}",
            config.store().path_for(PREFS_KEY).display()
        )
    })
}

fn build_scene(config: &ConfigService<FsConfigStore>, sim: &SimArgs) -> Result<(Scene, DemoPrefs)> {
    let mut prefs = load_prefs(config)?;
    prefs.sim = sim.apply(prefs.sim);
    let scene = Scene::new(prefs.sim.clone()).context("invalid simulation settings")?;
    Ok((scene, prefs))
}

/// Runs `frames` frames and returns the last report.
fn simulate(
    scene: &mut Scene,
    frames: u64,
    dt: f32,
    mut each: impl FnMut(&FrameReport),
) -> Option<FrameReport> {
    let mut last = None;
    for _ in 0..frames {
        let report = scene.frame(dt);
        each(&report);
        last = Some(report);
    }
    last
}

fn cmd_run(config: &ConfigService<FsConfigStore>, args: &RunArgs) -> Result<()> {
    let (mut scene, prefs) = build_scene(config, &args.sim)?;
    let mut summary = RunSummary::new(scene.config().mode);
    let mut per_frame = Vec::new();
    simulate(&mut scene, args.frames, args.sim.dt, |report| {
        summary.record(&report.stats);
        if args.json {
            per_frame.push(report.stats);
        }
    });
    info!(frames = summary.frames, mismatches = summary.mismatches, "run finished");

    if args.save_prefs {
        prefs.save(config).context("failed to save prefs")?;
    }

    if args.json {
        #[derive(Serialize)]
        struct RunOutput<'a> {
            summary: &'a RunSummary,
            frames: &'a [broadphase_sim::FrameStats],
        }
        let out = RunOutput {
            summary: &summary,
            frames: &per_frame,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", render::summary_table(&summary));
    }
    Ok(())
}

fn cmd_query(config: &ConfigService<FsConfigStore>, args: &QueryArgs) -> Result<()> {
    let (mut scene, _) = build_scene(config, &args.sim)?;
    scene
        .select(Some(args.shape))
        .with_context(|| format!("cannot query shape {}", args.shape))?;
    let report = simulate(&mut scene, args.frames, args.sim.dt, |_| {})
        .context("no frames simulated")?;

    let counts = TraceCounts::of(&report.query_steps);
    let candidates = trace_candidates(&report.query_steps);
    if args.json {
        #[derive(Serialize)]
        struct QueryOutput<'a> {
            shape: usize,
            frame: u64,
            counts: TraceCounts,
            candidates: &'a [usize],
            steps: &'a [broadphase_geom::TraversalStep],
        }
        let out = QueryOutput {
            shape: args.shape,
            frame: report.frame,
            counts,
            candidates: &candidates,
            steps: &report.query_steps,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", render::trace_table(&report.query_steps));
        println!(
            "shape {} (frame {}): {} visits, {} prunes, {} leaf tests; candidates {:?}",
            args.shape, report.frame, counts.visits, counts.prunes, counts.leaf_tests, candidates
        );
    }
    Ok(())
}

fn cmd_tree(config: &ConfigService<FsConfigStore>, args: &TreeArgs) -> Result<()> {
    let (mut scene, _) = build_scene(config, &args.sim)?;
    simulate(&mut scene, args.frames, args.sim.dt, |_| {});
    let bvh = scene.bvh();
    if args.json {
        println!("{}", serde_json::to_string_pretty(bvh.nodes())?);
    } else {
        println!("{}", render::tree_table(bvh));
        println!("nodes: {}, max depth: {}", bvh.len(), bvh.max_depth());
    }
    Ok(())
}

fn cmd_prefs(config: &ConfigService<FsConfigStore>, cmd: &PrefsCommand) -> Result<()> {
    match cmd {
        PrefsCommand::Show => {
            let prefs = load_prefs(config)?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        PrefsCommand::Reset => {
            config.reset(PREFS_KEY).context("failed to reset prefs")?;
            eprintln!(
                "removed {}",
                config.store().path_for(PREFS_KEY).display()
            );
        }
    }
    Ok(())
}
