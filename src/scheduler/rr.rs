use super::{Policy, ProcessId, ReadyQueue, RunState};
use crate::core::{EventKind, SwitchReason, state::Time};

/// Round robin over a FIFO ready queue with a fixed quantum.
///
/// Exactly one TIMEOUT is outstanding while a process holds the CPU; it is tagged with that
/// process so a stale one can be cancelled by id.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: Time,
}

impl RoundRobin {
    pub fn new(quantum: Time) -> Self {
        Self { quantum }
    }

    fn dispatch(&self, ctx: &mut RunState, pid: ProcessId, reason: SwitchReason) {
        ctx.assign(pid, reason);
        ctx.events.cancel(pid, EventKind::Timeout);
        ctx.events
            .schedule(ctx.now + self.quantum, Some(pid), EventKind::Timeout);
    }
}

impl Policy for RoundRobin {
    const NAME: &'static str = "rr";

    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_fifo()
    }

    fn on_arrival(&mut self, ctx: &mut RunState, pid: ProcessId) {
        if ctx.cpu_is_idle() {
            self.dispatch(ctx, pid, SwitchReason::Arrival);
        } else {
            ctx.ready_push(pid);
        }
        ctx.spawn_next_arrival();
    }

    fn on_departure(&mut self, ctx: &mut RunState, pid: ProcessId) {
        ctx.complete(pid);
        ctx.events.cancel(pid, EventKind::Timeout);
        match ctx.ready_pop() {
            Some(next) => self.dispatch(ctx, next, SwitchReason::Departure),
            None => ctx.go_idle(),
        }
    }

    fn on_timeout(&mut self, ctx: &mut RunState, pid: Option<ProcessId>) {
        if ctx.cpu_is_idle() || (pid.is_some() && pid != ctx.on_cpu) {
            tracing::debug!(time = ctx.now, ?pid, "stale timeout ignored");
            return;
        }

        let Some(preempted) = ctx.preempt() else {
            return;
        };
        ctx.ready_push(preempted);
        // The tail insert guarantees a non-empty queue
        if let Some(next) = ctx.ready_pop() {
            self.dispatch(ctx, next, SwitchReason::Timeout);
        }
    }
}
