pub mod hrrn;
pub mod rr;

use crate::core::{
    EventKind,
    state::{ProcessId, ReadyQueue, RunState},
};
pub use hrrn::Hrrn;
pub use rr::RoundRobin;

/// Event handlers of a single-CPU scheduling discipline.
///
/// The driver owns the [`RunState`] and hands it to exactly one handler per dequeued event.
pub trait Policy {
    const NAME: &'static str;

    /// The ready-queue ordering this policy selects from.
    fn ready_queue(&self) -> ReadyQueue;

    fn on_arrival(&mut self, ctx: &mut RunState, pid: ProcessId);

    fn on_departure(&mut self, ctx: &mut RunState, pid: ProcessId);

    /// Samples the ready-queue length and re-arms the next sample while anything else is pending.
    fn on_query(&mut self, ctx: &mut RunState) {
        ctx.sample_ready_queue();
        if ctx.events.has_pending_work() {
            let next = ctx.now + ctx.query_interval;
            ctx.events.schedule(next, None, EventKind::Query);
        }
    }

    fn on_timeout(&mut self, _ctx: &mut RunState, _pid: Option<ProcessId>) {}
}
