use clap::{Parser, Subcommand};
use sched_sim::{
    PolicyKind, SimConfig, SimError,
    sim::{replicate, sweep_arrival_rates},
};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

/// Single-CPU scheduling simulator (HRRN and round robin)
#[derive(Parser, Debug)]
#[command(name = "sched-sim", about = "Discrete-event CPU scheduling simulator.")]
struct Cli {
    /// TOML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of processes to complete
    #[arg(short = 'n', long)]
    processes: Option<usize>,

    /// Mean arrivals per unit time
    #[arg(short = 'l', long)]
    arrival_rate: Option<f64>,

    /// Mean CPU burst per process
    #[arg(short = 's', long)]
    service_time: Option<f64>,

    /// Ready-queue sampling interval
    #[arg(short = 'q', long)]
    query_interval: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Independent runs (consecutive seeds) to average
    #[arg(short, long, default_value_t = 1)]
    replications: u32,

    /// Run every integer arrival rate in START:END
    #[arg(long, value_parser = parse_range)]
    sweep_rates: Option<(u32, u32)>,

    #[command(subcommand)]
    policy: PolicyCmd,
}

#[derive(Subcommand, Debug)]
enum PolicyCmd {
    /// Highest response ratio next
    Hrrn,
    /// Round robin
    Rr {
        /// Time slice
        #[arg(long)]
        quantum: Option<f64>,
    },
}

fn parse_range(s: &str) -> Result<(u32, u32), String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid range '{s}': expected START:END"))?;
    let start = start.parse().map_err(|e| format!("Invalid start '{start}': {e}"))?;
    let end = end.parse().map_err(|e| format!("Invalid end '{end}': {e}"))?;
    Ok((start, end))
}

fn build_config(cli: &Cli) -> Result<SimConfig, SimError> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    if let Some(n) = cli.processes {
        config.num_processes = n;
    }
    if let Some(rate) = cli.arrival_rate {
        config.arrival_rate = rate;
    }
    if let Some(service) = cli.service_time {
        config.mean_service_time = service;
    }
    if let Some(interval) = cli.query_interval {
        config.query_interval = interval;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let PolicyCmd::Rr {
        quantum: Some(quantum),
    } = cli.policy
    {
        config.quantum = Some(quantum);
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let config = build_config(cli)?;
    let kind = match cli.policy {
        PolicyCmd::Hrrn => PolicyKind::Hrrn,
        PolicyCmd::Rr { .. } => PolicyKind::RoundRobin,
    };

    match cli.sweep_rates {
        Some((start, end)) => {
            let rows = sweep_arrival_rates(kind, &config, start, end, cli.replications)?;
            println!("rate,avg_turnaround,throughput,cpu_utilization,avg_ready_queue");
            for (rate, stats) in rows {
                println!(
                    "{rate},{:.6},{:.6},{:.4},{:.6}",
                    stats.avg_turnaround,
                    stats.throughput,
                    stats.avg_cpu_utilization,
                    stats.avg_ready_queue_length
                );
            }
        }
        None => {
            let stats = replicate(kind, &config, cli.replications)?;
            println!("Policy: {kind}");
            println!("{stats}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
