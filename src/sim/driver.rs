use super::{config::SimConfig, sampler::RandSampler, stats::Stats};
use crate::{
    core::{CpuSwitch, Process, ProcessFactory, Sampler, SimCore, Time},
    error::{Result, SimError},
    scheduler::{Hrrn, Policy, RoundRobin},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Hrrn,
    RoundRobin,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hrrn => f.write_str(Hrrn::NAME),
            Self::RoundRobin => f.write_str(RoundRobin::NAME),
        }
    }
}

/// A configured single-CPU simulation under policy `P`.
pub struct Sim<P: Policy> {
    core: SimCore<P>,
    config: SimConfig,
    stats: Option<Stats>,
}

impl Sim<Hrrn> {
    pub fn hrrn(config: SimConfig, sampler: impl Sampler + 'static) -> Result<Self> {
        Self::with_policy(Hrrn, config, sampler)
    }
}

impl Sim<RoundRobin> {
    pub fn round_robin(config: SimConfig, sampler: impl Sampler + 'static) -> Result<Self> {
        let quantum = config.require_quantum()?;
        Self::with_policy(RoundRobin::new(quantum), config, sampler)
    }
}

impl<P: Policy> Sim<P> {
    /// Validates `config` and prepares a run; nothing is simulated until [`Sim::run_simulation`].
    pub fn with_policy(policy: P, config: SimConfig, sampler: impl Sampler + 'static) -> Result<Self> {
        config.validate()?;
        let factory = ProcessFactory::new(
            Box::new(sampler),
            config.arrival_rate,
            config.mean_service_time,
        );
        let core = SimCore::new(policy, factory, config.query_interval, config.num_processes);
        Ok(Self {
            core,
            config,
            stats: None,
        })
    }

    /// Runs to completion (target count reached or no events left) and reports. Later calls
    /// return the same report.
    pub fn run_simulation(&mut self) -> Stats {
        if let Some(stats) = self.stats {
            return stats;
        }

        tracing::info!(
            policy = P::NAME,
            processes = self.config.num_processes,
            arrival_rate = self.config.arrival_rate,
            mean_service_time = self.config.mean_service_time,
            query_interval = self.config.query_interval,
            "simulation starting"
        );
        self.core.run();

        let stats = Stats::from_run(&self.core.ctx, self.config.num_processes);
        if self.core.ctx.completed < self.config.num_processes {
            tracing::warn!(
                completed = self.core.ctx.completed,
                target = self.config.num_processes,
                "event queue exhausted before the target count"
            );
        }
        tracing::info!(
            policy = P::NAME,
            clock = self.core.now(),
            completed = self.core.ctx.completed,
            avg_turnaround = stats.avg_turnaround,
            throughput = stats.throughput,
            cpu_utilization = stats.avg_cpu_utilization,
            ready_queue = stats.avg_ready_queue_length,
            "simulation finished"
        );

        self.stats = Some(stats);
        stats
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn processes(&self) -> &[Process] {
        &self.core.ctx.processes
    }

    pub fn switches(&self) -> &[CpuSwitch] {
        &self.core.ctx.switches
    }

    pub fn clock(&self) -> Time {
        self.core.now()
    }

    pub fn completed(&self) -> usize {
        self.core.ctx.completed
    }

    pub fn idle_time(&self) -> Time {
        self.core.ctx.idle_time
    }

    pub fn busy_time(&self) -> Time {
        self.core.ctx.busy_time
    }
}

/// Runs `kind` once with a pseudo-random sampler seeded from `config.seed`.
pub fn simulate(kind: PolicyKind, config: &SimConfig) -> Result<Stats> {
    let sampler = RandSampler::seeded(config.seed);
    let stats = match kind {
        PolicyKind::Hrrn => Sim::hrrn(config.clone(), sampler)?.run_simulation(),
        PolicyKind::RoundRobin => Sim::round_robin(config.clone(), sampler)?.run_simulation(),
    };
    Ok(stats)
}

/// Runs `replications` seeds starting at `config.seed` and averages the reports.
pub fn replicate(kind: PolicyKind, config: &SimConfig, replications: u32) -> Result<Stats> {
    let runs = (0..u64::from(replications.max(1)))
        .map(|offset| {
            let config = SimConfig {
                seed: config.seed.wrapping_add(offset),
                ..config.clone()
            };
            simulate(kind, &config)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Stats::mean_of(&runs))
}

/// One averaged report per integer arrival rate in `start..=end`.
pub fn sweep_arrival_rates(
    kind: PolicyKind,
    config: &SimConfig,
    start: u32,
    end: u32,
    replications: u32,
) -> Result<Vec<(u32, Stats)>> {
    if start == 0 || start > end {
        return Err(SimError::InvalidSweep { start, end });
    }
    (start..=end)
        .map(|rate| {
            let config = SimConfig {
                arrival_rate: f64::from(rate),
                ..config.clone()
            };
            replicate(kind, &config, replications).map(|stats| (rate, stats))
        })
        .collect()
}
