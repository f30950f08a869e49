use super::state::RunState;

// Tolerance for accumulated floating-point time sums
const EPSILON: f64 = 1e-9;

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &RunState) {
        self.step += 1;

        if let Some(pid) = ctx.on_cpu {
            let process = ctx.process(pid);
            debug_assert!(
                !ctx.ready.contains(pid),
                "Process {pid} on CPU must not be in the ready queue"
            );
            debug_assert!(
                process.completion_time.is_none(),
                "Completed process {pid} still on CPU"
            );
            debug_assert!(
                process.last_time_on_cpu.is_some(),
                "Process {pid} on CPU without an assignment time"
            );
            debug_assert!(
                process.remaining_burst >= 0.0,
                "Process {pid} has negative remaining burst"
            );
        }

        for pid in ctx.ready.iter() {
            let process = ctx.process(pid);
            debug_assert!(
                process.completion_time.is_none(),
                "Completed process {pid} still in the ready queue"
            );
            debug_assert!(
                process.arrival_time <= ctx.now,
                "Process {pid} queued before its arrival"
            );
            debug_assert!(
                process.remaining_burst >= 0.0,
                "Process {pid} has negative remaining burst"
            );
        }

        debug_assert!(
            ctx.idle_time + ctx.busy_time <= ctx.now + EPSILON,
            "Accounted CPU time exceeds the clock at step {}",
            self.step
        );
    }
}
