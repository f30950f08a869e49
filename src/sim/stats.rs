use crate::core::RunState;
use average::{Estimate, Mean};
use serde::Serialize;
use std::fmt;

/// Aggregate results of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stats {
    pub avg_turnaround: f64,
    pub throughput: f64,
    /// Percentage of the run the CPU spent busy.
    pub avg_cpu_utilization: f64,
    pub avg_ready_queue_length: f64,
}

impl Stats {
    /// Computes the report over the whole process table.
    ///
    /// Turnaround is averaged over the configured `target` count rather than the number of
    /// processes that actually completed. Any statistic whose denominator is zero reports 0.
    pub fn from_run(ctx: &RunState, target: usize) -> Self {
        let clock = ctx.now;
        let total_turnaround: f64 = ctx.processes.iter().filter_map(|p| p.turnaround()).sum();

        let avg_cpu_utilization = if clock > 0.0 {
            (1.0 - ctx.idle_time / clock) * 100.0
        } else {
            0.0
        };

        Self {
            avg_turnaround: safe_div(total_turnaround, target as f64),
            throughput: safe_div(ctx.completed as f64, clock),
            avg_cpu_utilization,
            avg_ready_queue_length: safe_div(
                ctx.ready_queue_samples as f64,
                clock / ctx.query_interval,
            ),
        }
    }

    /// Field-wise mean over several runs, e.g. replications with different seeds.
    pub fn mean_of(runs: &[Stats]) -> Stats {
        if runs.is_empty() {
            return Stats::default();
        }
        let avg = |field: fn(&Stats) -> f64| runs.iter().map(field).collect::<Mean>().estimate();

        Stats {
            avg_turnaround: avg(|s| s.avg_turnaround),
            throughput: avg(|s| s.throughput),
            avg_cpu_utilization: avg(|s| s.avg_cpu_utilization),
            avg_ready_queue_length: avg(|s| s.avg_ready_queue_length),
        }
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average turnaround time: {:.4}", self.avg_turnaround)?;
        writeln!(f, "Throughput:              {:.4} processes/unit", self.throughput)?;
        writeln!(f, "Average CPU utilization: {:.2}%", self.avg_cpu_utilization)?;
        write!(f, "Average ready queue:     {:.4}", self.avg_ready_queue_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProcessFactory, ReadyQueue};
    use crate::sim::sampler::ScriptedSampler;

    fn empty_run() -> RunState {
        let factory = ProcessFactory::new(Box::new(ScriptedSampler::default()), 1.0, 1.0);
        RunState::new(factory, ReadyQueue::new_fifo(), 0.5)
    }

    #[test]
    fn zero_clock_reports_zeros() {
        let stats = Stats::from_run(&empty_run(), 10);
        assert_eq!(stats, Stats::default());
        assert!(!stats.throughput.is_nan());
    }

    #[test]
    fn formulas_over_a_finished_table() {
        let mut ctx = empty_run();
        ctx.processes = vec![
            crate::core::Process::new(0, 0.0, 2.0),
            crate::core::Process::new(1, 1.0, 2.0),
            crate::core::Process::new(2, 3.0, 1.0),
        ];
        ctx.processes[0].completion_time = Some(2.0);
        ctx.processes[1].completion_time = Some(4.0);
        ctx.now = 4.0;
        ctx.completed = 2;
        ctx.idle_time = 1.0;
        ctx.ready_queue_samples = 4;

        let stats = Stats::from_run(&ctx, 4);
        // (2 + 3) / 4
        assert_eq!(stats.avg_turnaround, 1.25);
        assert_eq!(stats.throughput, 0.5);
        assert_eq!(stats.avg_cpu_utilization, 75.0);
        // 4 samples over 8 sampling periods
        assert_eq!(stats.avg_ready_queue_length, 0.5);
    }

    #[test]
    fn mean_of_replications() {
        let a = Stats {
            avg_turnaround: 1.0,
            throughput: 2.0,
            avg_cpu_utilization: 50.0,
            avg_ready_queue_length: 0.0,
        };
        let b = Stats {
            avg_turnaround: 3.0,
            throughput: 4.0,
            avg_cpu_utilization: 70.0,
            avg_ready_queue_length: 1.0,
        };
        let mean = Stats::mean_of(&[a, b]);
        assert_eq!(mean.avg_turnaround, 2.0);
        assert_eq!(mean.throughput, 3.0);
        assert_eq!(mean.avg_cpu_utilization, 60.0);
        assert_eq!(mean.avg_ready_queue_length, 0.5);
        assert_eq!(Stats::mean_of(&[]), Stats::default());
    }
}
