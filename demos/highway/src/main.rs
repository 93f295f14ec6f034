//! highway: vehicles on a 200 m four-lane road choosing between DSRC, WIFI
//! and LTE, with one access-selection policy shared by the whole fleet.
//!
//! ```text
//! highway --vehicles 6 --ticks 3000 --layout towers
//! highway --compare                      # learned vs. fixed baselines
//! highway --catalog radios.json --output out/
//! RUST_LOG=rat_sim=debug highway         # log every handover
//! ```

mod policy;
mod road;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use rat_core::{SimRng, SimTime};
use rat_net::{CatalogSpec, InfrastructureLayout, NetworkCatalog};
use rat_output::{CsvWriter, SimOutputObserver};
use rat_policy::{LearningConfig, Rewards};
use rat_sim::{BatchJob, Sim, SimBuilder, SimConfig, SimObserver, StatsSnapshot, run_batch};

use policy::{DemoPolicy, Strategy};
use road::Highway;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// One road-side unit at mid-road serving every technology.
    Shared,
    /// Dedicated towers per technology along the shoulder.
    Towers,
}

#[derive(Parser)]
#[command(name = "highway")]
#[command(about = "Radio access selection for vehicles on a straight road")]
struct Cli {
    /// Number of vehicles
    #[arg(short, long, default_value_t = 6)]
    vehicles: usize,

    /// Number of simulation ticks
    #[arg(short, long, default_value_t = 3_000)]
    ticks: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Minimum time between two packets from one vehicle
    #[arg(long, default_value_t = 500)]
    packet_interval_ms: u64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Layout::Shared)]
    layout: Layout,

    /// Selection strategy for a single run
    #[arg(long, value_enum, default_value_t = Strategy::Learned)]
    policy: Strategy,

    /// Run every strategy on identical traffic and compare
    #[arg(long, conflicts_with = "output")]
    compare: bool,

    /// JSON technology catalog (defaults to DSRC/WIFI/LTE)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Directory for transmissions.csv and update_summaries.csv
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Write output.db instead of CSV files
    #[cfg(feature = "sqlite")]
    #[arg(long, requires = "output")]
    sqlite: bool,

    /// Reward charged when a vehicle changes technology
    #[arg(long, default_value_t = 0.0)]
    switching_cost: f64,
}

// ── Progress logging ──────────────────────────────────────────────────────────

/// Logs cumulative counters every `every` updates.
struct Progress {
    every:   u64,
    updates: u64,
}

impl SimObserver for Progress {
    fn on_update_end(&mut self, now: SimTime, stats: &StatsSnapshot) {
        self.updates += 1;
        if self.updates.is_multiple_of(self.every) {
            info!(
                time = %now,
                sent = stats.packets_sent,
                prr = stats.packet_reception_ratio(),
                handovers = stats.handover_count,
                "progress",
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let catalog = load_catalog(cli.catalog.as_deref())?;
    info!(
        technologies = catalog.len(),
        max_total_range = catalog.max_total_range(),
        "catalog loaded",
    );

    let config = SimConfig {
        seed:               cli.seed,
        tick_ms:            cli.tick_ms,
        packet_interval_ms: cli.packet_interval_ms,
        ..SimConfig::default()
    };
    let rewards = Rewards { switching_cost: cli.switching_cost, ..Rewards::default() };

    println!("=== highway: radio access selection ===");
    println!(
        "Vehicles: {}  |  Ticks: {} × {} ms  |  Layout: {:?}  |  Seed: {}",
        cli.vehicles, cli.ticks, cli.tick_ms, cli.layout, cli.seed
    );
    println!();

    let strategies: Vec<Strategy> = if cli.compare { Strategy::ALL.to_vec() } else { vec![cli.policy] };
    let mut jobs = Vec::with_capacity(strategies.len());
    for &strategy in &strategies {
        let layout = build_layout(cli.layout, &catalog)?;
        let policy = DemoPolicy::new(strategy, LearningConfig::default(), catalog.len())?;
        let sim = SimBuilder::new(config.clone(), catalog.clone(), layout, policy)
            .rewards(rewards)
            .build()?;
        // same seed, same traffic for every strategy
        let traffic = Highway::new(cli.vehicles, &mut SimRng::new(cli.seed));
        jobs.push(BatchJob::new(sim, traffic));
    }

    let t0 = Instant::now();
    let finished: Vec<Sim<DemoPolicy>> = if cli.compare {
        run_batch(jobs, cli.ticks).into_iter().map(|job| job.sim).collect()
    } else {
        let mut job = jobs.remove(0);
        let mut progress = Progress { every: (cli.ticks / 10).max(1), updates: 0 };
        match &cli.output {
            Some(dir) => run_with_output(&mut job, cli.ticks, progress, dir, &cli)?,
            None => job.sim.run(&mut job.trajectory, cli.ticks, &mut progress),
        }
        vec![job.sim]
    };
    println!("Simulation complete in {:.3} s", t0.elapsed().as_secs_f64());
    println!();

    if cli.compare {
        print_comparison(&strategies, &finished);
    } else {
        print_summary(&finished[0]);
    }
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<NetworkCatalog> {
    let Some(path) = path else {
        return Ok(NetworkCatalog::default_v2x());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let spec: CatalogSpec = serde_json::from_str(&text)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(NetworkCatalog::try_from(spec)?)
}

fn build_layout(layout: Layout, catalog: &NetworkCatalog) -> Result<InfrastructureLayout> {
    Ok(match layout {
        Layout::Shared => road::shared_rsu(catalog)?,
        Layout::Towers => road::per_tech_towers(catalog)?,
    })
}

fn run_with_output(
    job:      &mut BatchJob<DemoPolicy, Highway>,
    ticks:    u64,
    progress: Progress,
    dir:      &Path,
    cli:      &Cli,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    #[cfg(feature = "sqlite")]
    if cli.sqlite {
        let writer = rat_output::SqliteWriter::new(dir)?;
        let mut obs = (progress, SimOutputObserver::new(writer));
        job.sim.run(&mut job.trajectory, ticks, &mut obs);
        if let Some(e) = obs.1.take_error() {
            eprintln!("output error: {e}");
        }
        println!("Wrote {}", dir.join("output.db").display());
        return Ok(());
    }
    #[cfg(not(feature = "sqlite"))]
    let _ = cli;

    let writer = CsvWriter::new(dir)?;
    let mut obs = (progress, SimOutputObserver::new(writer));
    job.sim.run(&mut job.trajectory, ticks, &mut obs);
    if let Some(e) = obs.1.take_error() {
        eprintln!("output error: {e}");
    }
    println!("Wrote {}/{{transmissions,update_summaries}}.csv", dir.display());
    Ok(())
}

// ── Reports ───────────────────────────────────────────────────────────────────

fn print_summary(sim: &Sim<DemoPolicy>) {
    let stats = sim.stats();
    println!("{:<8} {:>8} {:>9} {:>7} {:>7}", "Radio", "Sent", "Received", "Lost", "PRR");
    println!("{}", "-".repeat(43));
    for profile in sim.catalog().iter() {
        let c = stats.tech(profile.id);
        println!(
            "{:<8} {:>8} {:>9} {:>7} {:>7.3}",
            profile.name,
            c.sent,
            c.received,
            c.lost,
            c.reception_ratio(),
        );
    }
    println!("{}", "-".repeat(43));
    println!(
        "{:<8} {:>8} {:>9} {:>7} {:>7.3}",
        "total",
        stats.packets_sent,
        stats.packets_received,
        stats.packets_lost,
        stats.packet_reception_ratio(),
    );
    println!();
    println!("Handovers        : {}", stats.handover_count);
    println!("Average latency  : {:.1} ms", stats.average_latency_ms);
    println!("Data delivered   : {:.1} KB", stats.total_data_kb);
    println!("Exploration rate : {:.3}", sim.epsilon());
    if let Some(states) = sim.policy().learned_states() {
        println!("Learned states   : {states}");
    }
}

fn print_comparison(strategies: &[Strategy], sims: &[Sim<DemoPolicy>]) {
    println!(
        "{:<10} {:>8} {:>7} {:>10} {:>10} {:>9}",
        "Policy", "Sent", "PRR", "Latency", "Handovers", "Data KB"
    );
    println!("{}", "-".repeat(59));
    for (strategy, sim) in strategies.iter().zip(sims) {
        let s = sim.stats();
        println!(
            "{:<10} {:>8} {:>7.3} {:>8.1}ms {:>10} {:>9.1}",
            strategy.label(),
            s.packets_sent,
            s.packet_reception_ratio(),
            s.average_latency_ms,
            s.handover_count,
            s.total_data_kb,
        );
    }
}
