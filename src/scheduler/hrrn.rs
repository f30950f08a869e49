use super::{Policy, ProcessId, ReadyQueue, RunState};
use crate::core::SwitchReason;

/// Highest Response Ratio Next: non-preemptive, picks the waiting process with the largest
/// `(waited + service) / service` whenever the CPU frees up.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hrrn;

impl Policy for Hrrn {
    const NAME: &'static str = "hrrn";

    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_response_ratio()
    }

    fn on_arrival(&mut self, ctx: &mut RunState, pid: ProcessId) {
        if ctx.cpu_is_idle() {
            ctx.assign(pid, SwitchReason::Arrival);
        } else {
            ctx.ready_push(pid);
        }
        ctx.spawn_next_arrival();
    }

    fn on_departure(&mut self, ctx: &mut RunState, pid: ProcessId) {
        ctx.complete(pid);
        match ctx.ready_pop() {
            Some(next) => ctx.assign(next, SwitchReason::Departure),
            None => ctx.go_idle(),
        }
    }
}
