use super::{
    event::EventKind,
    factory::ProcessFactory,
    observer::Observer,
    state::{RunState, Time},
};
use crate::scheduler::Policy;

/// Discrete-event loop: owns the run state and feeds each dequeued event to the policy.
pub struct SimCore<P: Policy> {
    pub ctx: RunState,
    pub policy: P,
    observer: Observer,
    target: usize,
}

impl<P: Policy> SimCore<P> {
    pub fn new(policy: P, factory: ProcessFactory, query_interval: Time, target: usize) -> Self {
        let ctx = RunState::new(factory, policy.ready_queue(), query_interval);
        Self {
            ctx,
            policy,
            observer: Observer::new(),
            target,
        }
    }

    /// Creates the first process and the first QUERY sample.
    pub fn seed(&mut self) {
        self.ctx.spawn_seed();
        let first_query = self.ctx.now + self.ctx.query_interval;
        self.ctx.events.schedule(first_query, None, EventKind::Query);
    }

    /// Handles the earliest pending event. Returns its kind, or None on an empty queue.
    pub fn step(&mut self) -> Option<EventKind> {
        let event = self.ctx.events.pop_earliest()?;
        self.ctx.advance_to(event.time);
        tracing::debug!(time = event.time, kind = ?event.kind, process = ?event.process, "event");

        match (event.kind, event.process) {
            (EventKind::Arrival, Some(pid)) => self.policy.on_arrival(&mut self.ctx, pid),
            (EventKind::Departure, Some(pid)) => self.policy.on_departure(&mut self.ctx, pid),
            (EventKind::Query, _) => self.policy.on_query(&mut self.ctx),
            (EventKind::Timeout, pid) => self.policy.on_timeout(&mut self.ctx, pid),
            (kind, None) => {
                debug_assert!(false, "{kind:?} event without a process");
                tracing::warn!(?kind, "event without a process dropped");
            }
        }

        self.observer.observe(&self.ctx);
        Some(event.kind)
    }

    pub fn finished(&self) -> bool {
        self.ctx.completed >= self.target || self.ctx.events.is_empty()
    }

    pub fn run(&mut self) {
        self.seed();
        while !self.finished() {
            self.step();
        }
        self.ctx.close_intervals();

        tracing::debug!(
            policy = P::NAME,
            steps = self.observer.steps(),
            clock = self.ctx.now,
            completed = self.ctx.completed,
            "run loop finished"
        );
    }

    pub fn now(&self) -> Time {
        self.ctx.now
    }
}
