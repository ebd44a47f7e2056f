//! two_line — the reference configuration of the rust_drc simulator.
//!
//! Two production lines of three stations each, four products (two per
//! line), six skills, six workers.  Compare dispatch strategies and
//! workforce presets:
//!
//! ```text
//! two_line --strategy mlsf --workforce chain --utilization 0.9
//! two_line --config my_run.json --out output/run1
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use drc_output::{CsvWriter, RunRecorder};
use drc_sim::{
    DispatchStrategy, NoopObserver, PlantConfig, RunConfig, RunSummary, Simulation, StationSpec,
};

// ── Reference configuration constants ─────────────────────────────────────────

const LINES:              u16 = 2;
const STATIONS_PER_LINE:  u16 = 3;
const PRODUCTS_PER_LINE:  u16 = 2;
const WORKERS:            usize = 6;

const PROCESSING_TIME:    f64 = 10.0;
const ORDER_AMOUNT:       f64 = 1.0;
const WORKER_RATIO:       f64 = 0.9;
const CHANGE_RATIO:       f64 = 0.2;
const LINE_CHANGE_FACTOR: f64 = 2.0;
const DUE_DATE_FIXED:     f64 = 150.0;
const DUE_DATE_VARIABLE:  f64 = 50.0;
const CV_DUE_DATE:        f64 = 0.5;
const CV_PROCESSING:      f64 = 0.25;
const CV_ARRIVAL:         f64 = 0.25;
const OBSERVATION:        f64 = 20_000.0;
const WARMUP:             f64 = 2_000.0;
const SAMPLE_INTERVAL:    f64 = 100.0;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "two_line", about = "Two-line cross-training study, one replication")]
struct Args {
    /// Dispatch strategy: fcfs, lsf, or mlsf.
    #[arg(long, default_value = "lsf")]
    strategy: String,

    /// Workforce preset: dedicated, chain, or full.
    #[arg(long, default_value = "chain")]
    workforce: String,

    /// Target bottleneck utilization.
    #[arg(long, default_value_t = 0.85)]
    utilization: f64,

    /// Base random seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Load the full run + plant configuration from a JSON file instead of
    /// building the reference configuration from the flags above.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write gauge time series and the summary as CSV into this directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// On-disk shape of `--config` files.
#[derive(serde::Serialize, serde::Deserialize)]
struct FileConfig {
    run:   RunConfig,
    plant: PlantConfig,
}

// ── Workforce presets ─────────────────────────────────────────────────────────

/// Worker `i` holds exactly skill `i` — no cross-training at all.
fn dedicated_workforce(skills: usize) -> Vec<bool> {
    let mut v = vec![false; skills * skills];
    for i in 0..skills {
        v[i * skills + i] = true;
    }
    v
}

/// Worker `i` holds skills `i` and `i+1 mod Q` — a closed two-skill chain.
fn chained_workforce(skills: usize) -> Vec<bool> {
    let mut v = vec![false; skills * skills];
    for i in 0..skills {
        v[i * skills + i] = true;
        v[i * skills + (i + 1) % skills] = true;
    }
    v
}

/// Every worker holds every skill.
fn full_workforce(skills: usize, workers: usize) -> Vec<bool> {
    vec![true; skills * workers]
}

// ── Reference plant ───────────────────────────────────────────────────────────

/// Two lines of three stations; each station has its own skill; two products
/// per line walk that line's stations in order.
fn reference_plant() -> PlantConfig {
    let mut stations = Vec::new();
    let mut routes = Vec::new();
    for line in 0..LINES {
        let first = line * STATIONS_PER_LINE;
        for s in 0..STATIONS_PER_LINE {
            stations.push(StationSpec {
                line,
                skill: first + s,
                nominal_slots: 1,
            });
        }
        let route: Vec<u16> = (first..first + STATIONS_PER_LINE).collect();
        for _ in 0..PRODUCTS_PER_LINE {
            routes.push(route.clone());
        }
    }
    PlantConfig { stations, routes, processing_time: PROCESSING_TIME }
}

fn reference_run(args: &Args) -> Result<RunConfig> {
    let skills = (LINES * STATIONS_PER_LINE) as usize;
    let qualification = match args.workforce.as_str() {
        "dedicated" => dedicated_workforce(skills),
        "chain"     => chained_workforce(skills),
        "full"      => full_workforce(skills, WORKERS),
        other       => bail!("unknown workforce preset `{other}` (expected dedicated, chain, or full)"),
    };
    let strategy: DispatchStrategy = args.strategy.parse()?;

    Ok(RunConfig {
        utilization: args.utilization,
        order_amount: ORDER_AMOUNT,
        worker_ratio: WORKER_RATIO,
        change_ratio: CHANGE_RATIO,
        line_change_factor: LINE_CHANGE_FACTOR,
        due_date_fixed: DUE_DATE_FIXED,
        due_date_variable: DUE_DATE_VARIABLE,
        cv_due_date: CV_DUE_DATE,
        cv_processing: CV_PROCESSING,
        cv_arrival: CV_ARRIVAL,
        observation: OBSERVATION,
        warmup: WARMUP,
        sample_interval: SAMPLE_INTERVAL,
        qualification,
        strategy,
        seed: args.seed,
    })
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Assemble the configuration.
    let (run, plant) = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let file: FileConfig = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            (file.run, file.plant)
        }
        None => (reference_run(&args)?, reference_plant()),
    };

    println!("=== two_line — rust_drc cross-training study ===");
    println!(
        "Strategy: {}  |  Utilization target: {:.2}  |  Seed: {}",
        run.strategy, run.utilization, run.seed
    );
    println!(
        "Stations: {}  |  Routes: {}  |  Workers: {}",
        plant.stations.len(),
        plant.routes.len(),
        run.qualification.len() / plant.stations.iter().map(|s| s.skill + 1).max().unwrap_or(1) as usize,
    );
    println!(
        "Window: warm-up {} + observation {} time units",
        run.warmup, run.observation
    );
    println!();

    // 2. Build and run one replication.
    let mut sim = Simulation::new(&run, &plant)?;
    let summary = match &args.out {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let writer = CsvWriter::new(dir)?;
            let mut recorder = RunRecorder::new(writer);
            let summary = sim.run(&mut recorder)?;
            if let Some(e) = recorder.take_error() {
                eprintln!("output error: {e}");
            }
            println!("CSV series written to {}", dir.display());
            println!();
            summary
        }
        None => sim.run(&mut NoopObserver)?,
    };

    // 3. Report.
    print_summary(&summary);
    Ok(())
}

fn print_summary(s: &RunSummary) {
    println!("Jobs measured      : {} ({} unfinished)", s.jobs_measured, s.jobs_unfinished);
    println!("Service level      : {:.4}", s.service_level);
    println!("Lead time          : mean {:.2}, max {:.2}", s.lead_time_mean, s.lead_time_max);
    println!("Tardiness          : mean {:.2}, max {:.2}", s.tardiness_mean, s.tardiness_max);
    println!("FGI dwell          : mean {:.2}", s.fgi_dwell_mean);
    println!("WIP                : mean {:.2}, max {:.0}", s.wip_mean, s.wip_max);
    println!("Backorders         : mean {:.2}, max {:.0}", s.backorders_mean, s.backorders_max);
    println!("System utilization : {:.4}", s.system_utilization);
    println!("Worker utilization : {:.4}", s.worker_utilization);
    println!();

    println!("{:<10} {:<12}", "Station", "Utilization");
    println!("{}", "-".repeat(24));
    for (i, u) in s.station_utilization.iter().enumerate() {
        println!("{:<10} {:<12.4}", i, u);
    }
    println!();

    println!("{:<10} {:<12}", "Worker", "Utilization");
    println!("{}", "-".repeat(24));
    for (i, u) in s.per_worker_utilization.iter().enumerate() {
        println!("{:<10} {:<12.4}", i, u);
    }
}
