//! Headless QA harness: batch-run simulated nights under scripted defense
//! policies and report aggregate playability, or drive one night in real
//! time through the async runner.
mod policy;
mod report;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::debug;

use nightshift_game::{
    NightCommand, NightConfig, NightRng, NightRunner, NightSim, NightSummary,
};

use policy::DefensePolicy;
use report::{CellAggregate, RunRecord, aggregate, print_console};

#[derive(Debug, Parser)]
#[command(name = "nightshift-tester", version)]
#[command(about = "Automated QA for the Nightshift engine - headless batch nights and reports")]
struct Args {
    /// Nights to run (comma-separated)
    #[arg(long, default_value = "1,2")]
    nights: String,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per (night, policy, seed) cell
    #[arg(long, default_value_t = 20)]
    iterations: u64,

    /// Defense policy standing in for the player
    #[arg(long, value_enum, default_value_t = DefensePolicy::Reactive)]
    policy: DefensePolicy,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Drive a single night in real time through the async runner instead
    /// of batch mode (uses the first night and seed)
    #[arg(long)]
    realtime: bool,
}

fn split_csv<T: std::str::FromStr>(raw: &str) -> Result<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse()
                .map_err(|_| anyhow::anyhow!("invalid list entry: {part}"))
        })
        .collect()
}

/// Run one night to its terminal status, applying the policy before every
/// tick the way a player would act between ticks.
fn run_night(night: u32, seed: u64, policy: DefensePolicy) -> Result<NightSummary> {
    let mut sim = NightSim::start(night, NightConfig::default(), NightRng::from_user_seed(seed))
        .context("engine rejected the night")?;

    loop {
        policy.apply(&mut sim);
        let outcome = sim.step();
        // Batch mode collapses the wall-clock timers: resolve any armed
        // deferred work immediately, in schedule order.
        for directive in &outcome.directives {
            debug!("night {night} seed {seed}: directive {directive:?}");
        }
        if !outcome.directives.is_empty() {
            sim.resolve_power_out_attack();
            sim.settle_game_over();
        }
        if sim.status().is_terminal() {
            break;
        }
    }
    sim.summary().context("terminal night without summary")
}

async fn run_realtime(night: u32, seed: u64) -> Result<NightSummary> {
    let cfg = NightConfig {
        // Compressed cadence so a realtime check finishes in seconds.
        tick_interval_ms: 20,
        ..NightConfig::default()
    };
    let sim = NightSim::start(night, cfg, NightRng::from_user_seed(seed))
        .context("engine rejected the night")?;
    let runner = NightRunner::spawn(sim);
    let commands = runner.commands();

    // Hold both doors for the whole night; enough to verify the loop and
    // the terminal handoff end to end.
    commands.send(NightCommand::ToggleDoor(nightshift_game::Side::Left)).await?;
    commands.send(NightCommand::ToggleDoor(nightshift_game::Side::Right)).await?;

    runner
        .finished()
        .await
        .context("night abandoned before a terminal status")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let nights: Vec<u32> = split_csv(&args.nights)?;
    let seeds: Vec<u64> = split_csv(&args.seeds)?;
    if nights.is_empty() || seeds.is_empty() {
        bail!("need at least one night and one seed");
    }

    if args.realtime {
        let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
        let summary = runtime.block_on(run_realtime(nights[0], seeds[0]))?;
        println!(
            "realtime night {}: {} at hour {} with {:.1}% power",
            summary.night, summary.outcome, summary.hour_reached, summary.power_remaining
        );
        return Ok(());
    }

    let mut cells: Vec<CellAggregate> = Vec::new();
    for &night in &nights {
        let mut records = Vec::new();
        for &seed in &seeds {
            for iteration in 0..args.iterations {
                let run_seed = seed.wrapping_add(iteration);
                let summary = run_night(night, run_seed, args.policy)?;
                records.push(RunRecord::new(run_seed, args.policy, &summary));
            }
        }
        cells.push(aggregate(night, args.policy, &records));
    }

    match args.report.as_str() {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&cells).context("render json report")?
        ),
        _ => print_console(&cells),
    }
    Ok(())
}
